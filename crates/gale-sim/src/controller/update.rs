//! Pre-physics steps of a frame, run in the order `GameplayController::update` lists them.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::{player_parts, GameplayController};
use crate::api::types::{ObjectId, SimEvent};
use crate::components::obstacle::{Behavior, Obstacle};
use crate::input::intent::InputIntent;
use crate::level::nested_bird;
use crate::model::HitOutcome;

impl GameplayController {
    /// Kill the player once they drop below the world. Returns `true` when
    /// the rest of the frame should be skipped.
    pub(super) fn check_fall(&mut self, player: ObjectId) -> bool {
        if self.failed {
            return false;
        }
        let Some(obstacle) = self.objects.get_mut(player) else {
            return false;
        };
        if obstacle.position.y >= self.config.fall_limit {
            return false;
        }
        if let Some(model) = obstacle.player_mut() {
            model.set_health(0);
            model.set_i_frames(self.config.i_frames);
        }
        log::info!("player fell out of the world");
        self.events.push(SimEvent::PlayerKilled);
        self.set_failed();
        true
    }

    /// Open/close and aim the umbrella, then pin it to the player.
    pub(super) fn steer_umbrella(&mut self, intent: &InputIntent, player: ObjectId, umbrella: ObjectId) {
        let Some((anchor, face_right)) = self
            .objects
            .get(player)
            .and_then(|p| p.player().map(|model| (p.position, model.is_facing_right())))
        else {
            return;
        };
        let Some(Obstacle {
            position,
            angle,
            body: Some(body),
            behavior: Behavior::Umbrella(model),
            ..
        }) = self.objects.get_mut(umbrella)
        else {
            return;
        };

        let mut momentum = None;
        if intent.pressed.toggle_umbrella {
            let open = model.toggle();
            self.events.push(SimEvent::UmbrellaToggled { open });
            if !open {
                momentum = Some(model.closed_momentum());
            }
        }
        model.turn(intent.pointer_delta.x);
        model.set_facing_right(face_right);

        let aim = model.aim();
        self.physics.set_pose(body, anchor, aim);
        *position = anchor;
        *angle = aim;

        // Folding the canopy mid-air bleeds off speed.
        if let Some(scale) = momentum {
            if let Some((_, body, _)) = player_parts(&mut self.objects, player) {
                let vel = self.physics.velocity(body);
                self.physics.set_velocity(body, vel * scale);
            }
        }
    }

    /// Wind, walking, gliding, and the lighter, resolved into one velocity
    /// write and one force.
    pub(super) fn drive_player(&mut self, intent: &InputIntent, player: ObjectId, umbrella: ObjectId) {
        let Some(canopy) = self.objects.get(umbrella).and_then(Obstacle::umbrella) else {
            return;
        };
        let open = canopy.is_open();
        let rotation = canopy.rotation();
        let axis = canopy.direction();

        let mut push = Vec2::ZERO;
        let mut winds = 0;
        if open {
            for id in self.contacts.winds.keys() {
                if let Some(Behavior::Wind(wind)) = self.objects.get(id).map(|o| &o.behavior) {
                    push += axis * wind.wind_force(rotation);
                    winds += 1;
                }
            }
        }

        let drag_scale = self.config.umbrella.drag_scale;
        let Some((_, body, model)) = player_parts(&mut self.objects, player) else {
            return;
        };
        let mut vel = self.physics.velocity(body);
        let mut force = Vec2::ZERO;

        if winds > 0 {
            force += model.wind_force(push / winds as f32, &mut vel);
        }
        if model.is_grounded() {
            model.set_movement(intent.horizontal * model.tuning().force);
            force += model.walking_force(&mut vel);
        } else {
            model.set_movement(0.0);
        }
        if winds == 0 && open && vel.y < 0.0 {
            let tilt = rotation.rem_euclid(TAU);
            if tilt < PI {
                force += model.drag_force(drag_scale * (2.0 * tilt).sin(), vel);
            }
        }
        model.clamp_fall(open, &mut vel);

        if intent.pressed.lighter && open {
            if let Some(boosted) = model.lighter_boost(rotation, vel) {
                vel = boosted;
                self.events.push(SimEvent::LighterFired);
            }
        }
        if model.is_grounded() {
            model.refill_lighter();
        }

        self.physics.set_velocity(body, vel);
        self.physics.apply_force(body, force);
    }

    /// Hazards still overlapping land again once the player's i-frames run out.
    pub(super) fn linger_hazards(&mut self) {
        let touching: Vec<ObjectId> = self.contacts.hazards.keys().collect();
        for hazard in touching {
            self.strike_player(hazard);
        }
    }

    /// Apply one hit from `source` to the player.
    pub(super) fn strike_player(&mut self, source: ObjectId) {
        if self.completed || self.failed {
            return;
        }
        let Some(player) = self.player else {
            return;
        };
        let Some((hazard, center, heading)) = self
            .objects
            .get(source)
            .and_then(|o| o.armed_hazard().map(|h| (*h, o.center(), o.heading())))
        else {
            return;
        };
        let i_frames = self.config.i_frames;
        let Some((position, body, model)) = player_parts(&mut self.objects, player) else {
            return;
        };

        match model.take_hit(hazard.damage, i_frames) {
            HitOutcome::Ignored => {}
            HitOutcome::Damaged => {
                let health = model.health();
                let dir = hazard.direction(center, heading, position);
                self.physics.apply_impulse(body, hazard.impulse(dir));
                self.events.push(SimEvent::PlayerDamaged { health });
                log::debug!("player hit, health {health}");
            }
            HitOutcome::Killed => {
                self.events.push(SimEvent::PlayerKilled);
                self.set_failed();
            }
        }
    }

    pub(super) fn advance_platforms(&mut self) {
        let step_scale = self.config.step_scale;
        for (_, obstacle) in self.objects.iter_mut() {
            let Obstacle {
                position,
                angle,
                body: Some(body),
                behavior: Behavior::MovingPlatform(model),
                ..
            } = obstacle
            else {
                continue;
            };
            let next = model.step(*position, step_scale);
            self.physics.set_kinematic_position(body, next, *angle);
        }
    }

    /// Patrol, spot, and dive. Birds that leave the world are flagged for removal.
    pub(super) fn advance_birds(&mut self, player: ObjectId) {
        let Some((target, target_vel)) = self.objects.get(player).map(|p| (p.position, p.velocity)) else {
            return;
        };
        let bounds = self.level.bounds();

        for (id, obstacle) in self.objects.iter_mut() {
            if obstacle.is_removed() {
                continue;
            }
            let (lo, hi) = obstacle.world_bounds();
            let pos = obstacle.position;
            let angle = obstacle.angle;
            let (Some(body), Behavior::Bird(bird)) = (obstacle.body.as_ref(), &mut obstacle.behavior) else {
                continue;
            };

            let next = bird.tick(pos, target, target_vel);
            self.physics.set_kinematic_position(body, next, angle);

            let shift = next - pos;
            let (lo, hi) = (lo + shift, hi + shift);
            if hi.x < 0.0 || lo.x > bounds.x || hi.y < 0.0 || lo.y > bounds.y {
                log::debug!("{} left the world", obstacle.name);
                obstacle.mark_removed();
                continue;
            }

            if self.contacts.sight.contains(&id) && !bird.sees_target() {
                if self.physics.first_hit(next, target, body) == Some(player) {
                    bird.spot(next, target);
                    if bird.sees_target() {
                        self.events.push(SimEvent::BirdSpotted { bird: id });
                    }
                }
            }
            obstacle.sync_hitboxes(&mut self.physics);
        }
    }

    pub(super) fn advance_lightning(&mut self) {
        for (_, obstacle) in self.objects.iter_mut() {
            if obstacle.advance_strike(&mut self.physics) {
                log::trace!("{} striking: {}", obstacle.name, obstacle.armed_hazard().is_some());
            }
        }
    }

    pub(super) fn tick_nests(&mut self) {
        for (id, obstacle) in self.objects.iter_mut() {
            let position = obstacle.position;
            let Behavior::Nest(nest) = &mut obstacle.behavior else {
                continue;
            };
            if !nest.tick() {
                continue;
            }
            let name = format!("hatchling{}", self.hatched);
            self.hatched += 1;
            log::debug!("{} hatched {name}", obstacle.name);
            self.add_queue.push_back(nested_bird(name, position, nest, &self.config));
            self.events.push(SimEvent::BirdHatched { nest: id });
        }
    }
}
