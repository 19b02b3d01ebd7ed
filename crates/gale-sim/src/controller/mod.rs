//! The frame pipeline: pre-physics update, deferred insertion, physics step,
//! contact dispatch, then the sweep that evicts removed objects and updates
//! the rest.

pub mod contact;
mod update;

use std::collections::VecDeque;

use glam::Vec2;

use crate::api::types::{FixtureId, FixtureRole, ObjectId, SimEvent};
use crate::components::obstacle::{Behavior, Obstacle, ObstacleKind};
use crate::config::SimConfig;
use crate::core::arena::Arena;
use crate::core::physics::{ContactEvent, PhysicsBody, PhysicsWorld};
use crate::error::{InsertError, LevelError, PhysicsError};
use crate::input::intent::InputIntent;
use crate::level::LevelData;
use crate::model::{PlayerModel, UmbrellaModel};

use self::contact::ContactTracker;

/// Owns the physics world, every live object, and the contact bookkeeping
/// for one level.
pub struct GameplayController {
    config: SimConfig,
    level: LevelData,
    physics: PhysicsWorld,
    objects: Arena<Obstacle>,
    add_queue: VecDeque<Obstacle>,
    contacts: ContactTracker,
    contact_events: Vec<ContactEvent>,
    player: Option<ObjectId>,
    umbrella: Option<ObjectId>,
    completed: bool,
    failed: bool,
    /// Ticks left before a decided outcome is reported.
    countdown: u32,
    hatched: u32,
    events: Vec<SimEvent>,
}

impl GameplayController {
    /// Build the world and populate it from `level`.
    pub fn new(config: SimConfig, level: LevelData) -> Result<Self, LevelError> {
        let physics = Self::make_world(&config, &level);
        let mut controller = Self {
            config,
            level,
            physics,
            objects: Arena::new(),
            add_queue: VecDeque::new(),
            contacts: ContactTracker::default(),
            contact_events: Vec::new(),
            player: None,
            umbrella: None,
            completed: false,
            failed: false,
            countdown: 0,
            hatched: 0,
            events: Vec::new(),
        };
        controller.populate_level()?;
        Ok(controller)
    }

    fn make_world(config: &SimConfig, level: &LevelData) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, level.gravity));
        world.set_dt(config.fixed_dt);
        world.set_solver_iterations(config.velocity_iterations, config.position_iterations);
        world
    }

    /// Activate and insert every object the level describes.
    pub fn populate_level(&mut self) -> Result<(), LevelError> {
        let objects = self
            .level
            .build_objects(&self.config)
            .inspect_err(|err| log::warn!("rejected level records: {err}"))?;
        for obstacle in objects {
            let name = obstacle.name.clone();
            let kind = obstacle.kind();
            let id = self
                .add_object(obstacle)
                .map_err(|source| LevelError::Allocation { name, source })?;
            match kind {
                ObstacleKind::Player => self.player = Some(id),
                ObstacleKind::Umbrella => self.umbrella = Some(id),
                _ => {}
            }
        }
        log::info!(
            "level populated: {} objects in {}x{}",
            self.objects.len(),
            self.level.width,
            self.level.height
        );
        Ok(())
    }

    /// Give `obstacle` a body under the id it is about to receive, then store it.
    fn add_object(&mut self, mut obstacle: Obstacle) -> Result<ObjectId, PhysicsError> {
        let id = self.objects.next_id();
        obstacle.activate_physics(id, &mut self.physics)?;
        Ok(self.objects.insert(obstacle))
    }

    /// Queue an object for insertion at the start of the next `post_update`.
    pub fn enqueue(&mut self, obstacle: Obstacle) {
        self.add_queue.push_back(obstacle);
    }

    /// Bounds-check and insert one queued object.
    pub fn admit(&mut self, obstacle: Obstacle) -> Result<ObjectId, InsertError> {
        if !self.level.contains(obstacle.position) {
            return Err(InsertError::OutOfBounds {
                name: obstacle.name,
                x: obstacle.position.x,
                y: obstacle.position.y,
            });
        }
        Ok(self.add_object(obstacle)?)
    }

    fn drain_add_queue(&mut self) {
        while let Some(obstacle) = self.add_queue.pop_front() {
            if let Err(err) = self.admit(obstacle) {
                log::error!("rejected queued object: {err}");
                debug_assert!(!matches!(err, InsertError::OutOfBounds { .. }), "{err}");
            }
        }
    }

    // -- Frame pipeline --

    /// One full tick.
    pub fn run_frame(&mut self, intent: &InputIntent, dt: f32) {
        self.update(intent, dt);
        self.post_update(dt);
    }

    /// Pre-physics logic: outcome, player forces, hazards, and AI.
    pub fn update(&mut self, intent: &InputIntent, _dt: f32) {
        let (Some(player), Some(umbrella)) = (self.player, self.umbrella) else {
            return;
        };
        if self.check_fall(player) {
            return;
        }
        self.countdown = self.countdown.saturating_sub(1);

        self.steer_umbrella(intent, player, umbrella);
        self.drive_player(intent, player, umbrella);
        self.linger_hazards();
        self.advance_platforms();
        self.advance_birds(player);
        self.advance_lightning();
        self.tick_nests();
    }

    /// Insert queued objects, step, dispatch contacts, sweep.
    pub fn post_update(&mut self, dt: f32) {
        self.drain_add_queue();
        self.step();
        self.collect_garbage(dt);
        self.follow_player();
    }

    fn step(&mut self) {
        self.contact_events.clear();
        self.physics.step_into(&mut self.contact_events);
        for (_, obstacle) in self.objects.iter_mut() {
            obstacle.sync_from_physics(&self.physics);
        }

        let events = std::mem::take(&mut self.contact_events);
        for event in &events {
            self.resolve_contact(event.a, event.b, event.started);
            self.resolve_contact(event.b, event.a, event.started);
        }
        self.contact_events = events;
        self.refresh_grounded();
    }

    /// Handle one side of a begin/end pair: `mine` is the fixture whose
    /// role decides what the overlap means.
    fn resolve_contact(&mut self, mine: FixtureId, other: FixtureId, started: bool) {
        if mine.object == other.object || other.role != FixtureRole::Body {
            return;
        }
        let (Some(me), Some(them)) = (self.objects.get(mine.object), self.objects.get(other.object)) else {
            return;
        };
        let their_kind = them.kind();
        let is_hazard = them.hazard.is_some();
        let is_ground = them.is_ground();

        match (mine.role, me.kind()) {
            (FixtureRole::GroundSensor, ObstacleKind::Player) if is_ground => {
                if started {
                    self.contacts.ground.begin(other);
                } else {
                    self.contacts.ground.end(other);
                }
            }
            (FixtureRole::UmbrellaSensor, ObstacleKind::Umbrella) if their_kind == ObstacleKind::Wind => {
                if started {
                    self.contacts.winds.begin(other.object);
                } else {
                    self.contacts.winds.end(other.object);
                }
            }
            (FixtureRole::SightSensor, ObstacleKind::Bird) if their_kind == ObstacleKind::Player => {
                if started {
                    self.contacts.sight.begin(mine.object);
                } else {
                    self.contacts.sight.end(mine.object);
                }
            }
            (FixtureRole::Body, ObstacleKind::Player | ObstacleKind::Umbrella) if is_hazard => {
                if started {
                    self.contacts.hazards.begin(other.object);
                    self.strike_player(other.object);
                } else {
                    self.contacts.hazards.end(other.object);
                }
            }
            (FixtureRole::Body, ObstacleKind::Player) if their_kind == ObstacleKind::Goal && started => {
                self.set_completed();
            }
            _ => {}
        }
    }

    fn refresh_grounded(&mut self) {
        let grounded = self.contacts.is_grounded();
        if let Some(player) = self.player.and_then(|id| self.objects.get_mut(id)).and_then(Obstacle::player_mut) {
            player.set_grounded(grounded);
        }
    }

    /// Evict removed objects and update the survivors, in one pass.
    fn collect_garbage(&mut self, dt: f32) {
        let physics = &mut self.physics;
        let contacts = &mut self.contacts;
        let freed = self.objects.sweep(|id, obstacle| {
            if obstacle.is_removed() {
                obstacle.deactivate_physics(physics);
                contacts.forget_object(id);
                log::debug!("evicted {}", obstacle.name);
                false
            } else {
                obstacle.update(dt);
                true
            }
        });
        if freed > 0 {
            self.refresh_grounded();
        }
    }

    /// Put the umbrella back in the player's hands after the step.
    fn follow_player(&mut self) {
        let (Some(player), Some(umbrella)) = (self.player, self.umbrella) else {
            return;
        };
        let Some(anchor) = self.objects.get(player).map(|p| p.position) else {
            return;
        };
        if let Some(obstacle) = self.objects.get_mut(umbrella) {
            let aim = obstacle.umbrella().map_or(0.0, UmbrellaModel::aim);
            obstacle.position = anchor;
            obstacle.angle = aim;
            if let Some(body) = &obstacle.body {
                self.physics.set_pose(body, anchor, aim);
            }
        }
    }

    fn set_completed(&mut self) {
        if self.completed || self.failed {
            return;
        }
        self.completed = true;
        self.countdown = self.config.win_countdown;
        self.events.push(SimEvent::LevelCompleted);
        log::info!("level completed");
    }

    fn set_failed(&mut self) {
        if self.failed {
            return;
        }
        self.failed = true;
        self.countdown = self.config.lose_countdown;
        self.events.push(SimEvent::LevelFailed);
        log::info!("level failed");
    }

    // -- Lifecycle --

    /// Tear everything down and rebuild the current level.
    pub fn reset(&mut self) -> Result<(), LevelError> {
        self.dispose();
        self.physics = Self::make_world(&self.config, &self.level);
        self.populate_level()?;
        log::info!("level reset");
        Ok(())
    }

    /// Detach every body and drop all objects and transient state.
    pub fn dispose(&mut self) {
        for (_, obstacle) in self.objects.iter_mut() {
            obstacle.deactivate_physics(&mut self.physics);
        }
        self.objects.clear();
        self.add_queue.clear();
        self.contacts.clear();
        self.contact_events.clear();
        self.events.clear();
        self.player = None;
        self.umbrella = None;
        self.completed = false;
        self.failed = false;
        self.countdown = 0;
        self.hatched = 0;
    }

    // -- Queries --

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Obstacle)> {
        self.objects.iter()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Obstacle> {
        self.objects.get(id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Flag an object for eviction at the next sweep. Returns `false` for a stale id.
    pub fn mark_removed(&mut self, id: ObjectId) -> bool {
        match self.objects.get_mut(id) {
            Some(obstacle) => {
                obstacle.mark_removed();
                true
            }
            None => false,
        }
    }

    /// The level was won and the victory countdown has run out.
    pub fn is_completed(&self) -> bool {
        self.completed && self.countdown == 0
    }

    /// The level was lost and the defeat countdown has run out.
    pub fn is_failed(&self) -> bool {
        self.failed && self.countdown == 0
    }

    pub fn player_id(&self) -> Option<ObjectId> {
        self.player
    }

    pub fn player(&self) -> Option<&PlayerModel> {
        self.player.and_then(|id| self.objects.get(id)).and_then(Obstacle::player)
    }

    pub fn umbrella(&self) -> Option<&UmbrellaModel> {
        self.umbrella.and_then(|id| self.objects.get(id)).and_then(Obstacle::umbrella)
    }

    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Take the notifications raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Split borrow of the player: position, body, and model.
fn player_parts(objects: &mut Arena<Obstacle>, id: ObjectId) -> Option<(Vec2, &PhysicsBody, &mut PlayerModel)> {
    let Obstacle {
        position,
        body,
        behavior,
        ..
    } = objects.get_mut(id)?;
    match (body.as_ref(), behavior) {
        (Some(body), Behavior::Player(player)) => Some((*position, body, player)),
        _ => None,
    }
}
