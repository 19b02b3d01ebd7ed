use glam::Vec2;
use serde::Deserialize;

use super::path::PathFollower;

/// Plumage, which also decides what a bird may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirdColor {
    /// Patrols and dives at the player once spotted.
    Red,
    /// Hatched from a nest.
    Blue,
    /// Patrols only.
    Brown,
}

impl BirdColor {
    pub fn can_attack(self) -> bool {
        matches!(self, BirdColor::Red)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdState {
    /// Fresh from a nest: blinking in place until the countdown runs out.
    Spawning { remaining: u32 },
    Patrol,
    /// Player spotted; holding still before the dive.
    Warning { remaining: u32 },
    /// Flying a straight line until leaving the world.
    Attack,
}

/// Authored bird parameters, already validated.
#[derive(Debug, Clone)]
pub struct BirdParams {
    pub path: Vec<Vec2>,
    pub looping: bool,
    pub move_speed: f32,
    pub color: BirdColor,
    pub attack: bool,
    pub attack_speed: f32,
    pub sensor_radius: f32,
    pub attack_wait: u32,
    pub face_right: bool,
    /// Converts `move_speed` and `attack_speed` into per-tick displacement.
    pub step_scale: f32,
}

#[derive(Debug, Clone)]
pub struct BirdHazard {
    path: PathFollower,
    move_speed: f32,
    color: BirdColor,
    attack: bool,
    attack_speed: f32,
    sensor_radius: f32,
    attack_wait: u32,
    step_scale: f32,
    state: BirdState,
    face_right: bool,
    authored_face_right: bool,
    target_dir: Vec2,
    heading: Vec2,
    /// Speed taken up once spawning ends.
    hatch_speed: f32,
}

impl BirdHazard {
    pub fn new(params: BirdParams) -> Self {
        Self {
            path: PathFollower::new(params.path, params.looping),
            move_speed: params.move_speed,
            color: params.color,
            attack: params.attack && params.color.can_attack(),
            attack_speed: params.attack_speed,
            sensor_radius: params.sensor_radius,
            attack_wait: params.attack_wait,
            step_scale: params.step_scale,
            state: BirdState::Patrol,
            face_right: params.face_right,
            authored_face_right: params.face_right,
            target_dir: Vec2::ZERO,
            heading: Vec2::ZERO,
            hatch_speed: params.move_speed,
        }
    }

    /// A nest hatchling: stands still for `spawn_delay` ticks, then patrols.
    pub fn hatchling(params: BirdParams, spawn_delay: u32) -> Self {
        let mut bird = Self::new(params);
        bird.move_speed = 0.0;
        bird.state = BirdState::Spawning { remaining: spawn_delay };
        bird
    }

    pub fn state(&self) -> BirdState {
        self.state
    }

    pub fn color(&self) -> BirdColor {
        self.color
    }

    pub fn can_attack(&self) -> bool {
        self.attack
    }

    pub fn sensor_radius(&self) -> f32 {
        self.sensor_radius
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn path(&self) -> &PathFollower {
        &self.path
    }

    pub fn sees_target(&self) -> bool {
        matches!(self.state, BirdState::Warning { .. } | BirdState::Attack)
    }

    pub fn is_spawning(&self) -> bool {
        matches!(self.state, BirdState::Spawning { .. })
    }

    pub fn is_facing_right(&self) -> bool {
        self.face_right
    }

    /// Whether the authored hit box (rather than its mirror) matches the current facing.
    pub fn uses_primary_hitbox(&self) -> bool {
        self.face_right == self.authored_face_right
    }

    pub fn target_dir(&self) -> Vec2 {
        self.target_dir
    }

    /// Unit direction of the last movement, used for knockback.
    pub fn heading(&self) -> Vec2 {
        self.heading.normalize_or_zero()
    }

    /// The player came into view. Only a patrolling attacker reacts.
    pub fn spot(&mut self, pos: Vec2, target: Vec2) {
        if !self.attack || self.state != BirdState::Patrol {
            return;
        }
        self.state = BirdState::Warning { remaining: self.attack_wait };
        self.face_right = target.x - pos.x >= 0.0;
        log::debug!("bird at ({:.2}, {:.2}) spotted player", pos.x, pos.y);
    }

    /// Dive vector leading the target by the time it takes to cross the sensor radius.
    pub fn lead_direction(&self, pos: Vec2, target: Vec2, target_vel: Vec2) -> Vec2 {
        let lead_time = if self.attack_speed != 0.0 {
            self.sensor_radius / self.attack_speed
        } else {
            0.0
        };
        (target - pos + target_vel * lead_time).normalize_or_zero() * self.attack_speed
    }

    /// One pre-physics tick. Returns the position to move to.
    pub fn tick(&mut self, pos: Vec2, target: Vec2, target_vel: Vec2) -> Vec2 {
        match self.state {
            BirdState::Spawning { .. } => pos,
            BirdState::Patrol => {
                let next = self.path.step(pos, self.move_speed * self.step_scale);
                let moved = next - pos;
                if moved != Vec2::ZERO {
                    self.heading = moved;
                }
                if moved.x != 0.0 {
                    self.face_right = moved.x > 0.0;
                }
                next
            }
            BirdState::Warning { remaining } if remaining > 0 => {
                self.state = BirdState::Warning { remaining: remaining - 1 };
                pos
            }
            BirdState::Warning { .. } => {
                self.target_dir = self.lead_direction(pos, target, target_vel);
                self.state = BirdState::Attack;
                self.dive(pos)
            }
            BirdState::Attack => self.dive(pos),
        }
    }

    fn dive(&mut self, pos: Vec2) -> Vec2 {
        self.heading = self.target_dir;
        if self.target_dir.x != 0.0 {
            self.face_right = self.target_dir.x > 0.0;
        }
        pos + self.target_dir * self.step_scale
    }

    /// Post-step countdowns.
    pub fn update(&mut self) {
        if let BirdState::Spawning { remaining } = self.state {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.move_speed = self.hatch_speed;
                self.state = BirdState::Patrol;
            } else {
                self.state = BirdState::Spawning { remaining };
            }
        }
    }
}
