use glam::Vec2;

use crate::config::HazardTuning;

/// Where a hit pushes the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Knockback {
    /// Always the same direction, whatever the geometry.
    Fixed(Vec2),
    /// From the hazard's centre towards the player.
    AwayFromHazard,
    /// Along the hazard's current direction of travel.
    Heading,
}

/// Stationary hazards that differ only in collision and push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticHazardKind {
    /// Solid; the player can stand on it.
    Rock,
    /// Thorny sensor the player passes through.
    Bramble,
}

impl StaticHazardKind {
    pub fn is_solid(self) -> bool {
        matches!(self, StaticHazardKind::Rock)
    }
}

/// Damage capability attached to any obstacle that hurts on contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub damage: i32,
    pub knockback_scale: f32,
    pub knockback: Knockback,
}

impl Hazard {
    pub fn new(tuning: HazardTuning, knockback: Knockback) -> Self {
        Self {
            damage: tuning.damage,
            knockback_scale: tuning.knockback,
            knockback,
        }
    }

    pub fn lightning(tuning: HazardTuning) -> Self {
        Self::new(tuning, Knockback::Fixed(Vec2::NEG_Y))
    }

    pub fn rock(tuning: HazardTuning) -> Self {
        Self::new(tuning, Knockback::Fixed(Vec2::Y))
    }

    pub fn bramble(tuning: HazardTuning) -> Self {
        Self::new(tuning, Knockback::AwayFromHazard)
    }

    pub fn bird(damage: i32, knockback_scale: f32) -> Self {
        Self {
            damage,
            knockback_scale,
            knockback: Knockback::Heading,
        }
    }

    /// Unit push direction for a player at `player_pos`. Falls back to
    /// straight up when the geometry gives no direction.
    pub fn direction(&self, hazard_center: Vec2, heading: Vec2, player_pos: Vec2) -> Vec2 {
        let dir = match self.knockback {
            Knockback::Fixed(dir) => dir,
            Knockback::AwayFromHazard => player_pos - hazard_center,
            Knockback::Heading => heading,
        };
        dir.try_normalize().unwrap_or(Vec2::Y)
    }

    /// Impulse for a push along `dir`.
    pub fn impulse(&self, dir: Vec2) -> Vec2 {
        dir * self.knockback_scale
    }
}
