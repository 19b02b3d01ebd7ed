//! Player state and the force rules that steer them.
//!
//! Force helpers are pure: they take the current velocity, clamp it in place
//! where a speed cap applies, and return the force still to be applied. The
//! controller writes both back to the physics body.

use glam::Vec2;

use crate::config::PlayerTuning;

/// Sign that maps zero to zero, unlike [`f32::signum`].
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Result of a hazard touching the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable; nothing changed.
    Ignored,
    /// Health dropped but stayed positive. Knockback applies.
    Damaged,
    /// Health reached zero.
    Killed,
}

#[derive(Debug, Clone)]
pub struct PlayerModel {
    tuning: PlayerTuning,
    movement: f32,
    face_right: bool,
    grounded: bool,
    jump_cooldown: u32,
    health: i32,
    max_health: i32,
    i_frames: u32,
    lighter_fuel: f32,
}

impl PlayerModel {
    pub fn new(tuning: PlayerTuning, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            tuning,
            movement: 0.0,
            face_right: true,
            grounded: false,
            jump_cooldown: 0,
            health: max_health,
            max_health,
            i_frames: 0,
            lighter_fuel: tuning.lighter_fuel,
        }
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    pub fn movement(&self) -> f32 {
        self.movement
    }

    /// Set the walking force. Non-zero input also turns the player.
    pub fn set_movement(&mut self, value: f32) {
        self.movement = value;
        if value < 0.0 {
            self.face_right = false;
        } else if value > 0.0 {
            self.face_right = true;
        }
    }

    pub fn is_facing_right(&self) -> bool {
        self.face_right
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Jumping has no force behind it; the cooldown is tracked for the shell.
    pub fn can_jump(&self) -> bool {
        self.grounded && self.jump_cooldown == 0
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }

    pub fn i_frames(&self) -> u32 {
        self.i_frames
    }

    pub fn set_i_frames(&mut self, frames: u32) {
        self.i_frames = frames;
    }

    pub fn lighter_fuel(&self) -> f32 {
        self.lighter_fuel
    }

    /// Gauge fill in `[0, 1]`.
    pub fn lighter_ratio(&self) -> f32 {
        if self.tuning.lighter_fuel <= 0.0 {
            return 0.0;
        }
        self.lighter_fuel / self.tuning.lighter_fuel
    }

    /// Apply `damage` unless invulnerable. Any landed hit (fatal or not)
    /// starts `i_frames` ticks of invulnerability.
    pub fn take_hit(&mut self, damage: i32, i_frames: u32) -> HitOutcome {
        if self.i_frames > 0 {
            return HitOutcome::Ignored;
        }
        self.i_frames = i_frames;
        let remaining = self.health.saturating_sub(damage);
        if remaining > 0 {
            self.set_health(remaining);
            HitOutcome::Damaged
        } else {
            self.health = 0;
            HitOutcome::Killed
        }
    }

    /// Force to push the umbrella with while inside wind. `force` is the
    /// averaged wind push along the umbrella axis.
    pub fn wind_force(&self, force: Vec2, vel: &mut Vec2) -> Vec2 {
        let mut out = Vec2::ZERO;
        let max_x = self.tuning.max_speed_air_wind;
        if sign(force.x) == sign(vel.x) && vel.x.abs() >= max_x {
            vel.x = sign(vel.x) * max_x;
        } else {
            out.x = force.x;
        }
        let max_up = self.tuning.max_speed_up;
        if vel.y.abs() >= max_up {
            vel.y = sign(vel.y) * max_up;
        } else {
            out.y = force.y;
        }
        out
    }

    /// Grounded walking: braking with no input, then the walk force.
    pub fn walking_force(&self, vel: &mut Vec2) -> Vec2 {
        let mut out = Vec2::ZERO;
        if self.movement == 0.0 {
            out.x -= self.tuning.damping * vel.x;
        }
        let max = self.tuning.max_speed_ground;
        if vel.x.abs() >= max {
            vel.x = sign(vel.x) * max;
        }
        out.x += self.movement;
        out
    }

    /// Sideways glide from a tilted umbrella. Steering against the current
    /// direction is boosted with speed; steering with it is damped and capped.
    pub fn drag_force(&self, fx: f32, vel: Vec2) -> Vec2 {
        let same_way = sign(fx) == sign(vel.x);
        let opposing = sign(fx) == -sign(vel.x);
        if !((same_way && vel.x.abs() < self.tuning.max_speed_air_drag) || opposing || vel.x == 0.0) {
            return Vec2::ZERO;
        }
        let scale = if opposing { vel.x.abs() / 2.0 + 1.0 } else { 0.6 };
        Vec2::new(fx * scale, 0.0)
    }

    /// Terminal fall speed, which depends on the umbrella.
    pub fn clamp_fall(&self, umbrella_open: bool, vel: &mut Vec2) {
        let floor = if umbrella_open {
            self.tuning.max_speed_down_open
        } else {
            self.tuning.max_speed_down_closed
        };
        if vel.y < floor {
            vel.y = floor;
        }
    }

    /// Burn a full tank for a burst along `angle`. Returns the replacement
    /// velocity, or `None` when the gauge is not full.
    pub fn lighter_boost(&mut self, angle: f32, vel: Vec2) -> Option<Vec2> {
        if self.lighter_fuel < self.tuning.lighter_fuel {
            return None;
        }
        self.lighter_fuel = 0.0;
        let dir = Vec2::from_angle(angle);
        let max_x = self.tuning.max_speed_air_wind;
        let x = if sign(dir.x) == sign(vel.x) && vel.x.abs() >= max_x {
            sign(vel.x) * max_x
        } else {
            dir.x * self.tuning.lighter_force
        };
        let y = if vel.y.abs() >= self.tuning.max_speed_up {
            self.tuning.max_speed_up
        } else {
            dir.y * self.tuning.lighter_force
        };
        Some(Vec2::new(x, y))
    }

    pub fn refill_lighter(&mut self) {
        self.lighter_fuel = (self.lighter_fuel + self.tuning.lighter_change_rate).min(self.tuning.lighter_fuel);
    }

    /// Per-tick countdowns.
    pub fn update(&mut self) {
        self.i_frames = self.i_frames.saturating_sub(1);
        if self.grounded {
            self.jump_cooldown = self.jump_cooldown.saturating_sub(1);
        } else {
            self.jump_cooldown = self.tuning.jump_cooldown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player(max_health: i32) -> PlayerModel {
        PlayerModel::new(PlayerTuning::default(), max_health)
    }

    #[test]
    fn hit_then_invulnerable() {
        let mut p = player(5);
        p.set_health(3);
        assert_eq!(p.take_hit(1, 120), HitOutcome::Damaged);
        assert_eq!(p.health(), 2);
        assert_eq!(p.i_frames(), 120);

        assert_eq!(p.take_hit(1, 120), HitOutcome::Ignored);
        assert_eq!(p.health(), 2);
        assert_eq!(p.i_frames(), 120);
    }

    #[test]
    fn lethal_hit_zeroes_health_and_still_grants_i_frames() {
        let mut p = player(3);
        p.set_health(1);
        assert_eq!(p.take_hit(2, 60), HitOutcome::Killed);
        assert_eq!(p.health(), 0);
        assert_eq!(p.i_frames(), 60);
    }

    #[test]
    fn extreme_damage_saturates() {
        let mut p = player(3);
        assert_eq!(p.take_hit(i32::MAX, 0), HitOutcome::Killed);
        assert_eq!(p.health(), 0);

        let mut p = player(3);
        p.set_health(1);
        assert_eq!(p.take_hit(i32::MIN, 0), HitOutcome::Damaged);
        assert_eq!(p.health(), 3);
    }

    #[test]
    fn i_frames_count_down() {
        let mut p = player(3);
        p.take_hit(1, 2);
        p.update();
        p.update();
        assert_eq!(p.i_frames(), 0);
        assert_eq!(p.take_hit(1, 2), HitOutcome::Damaged);
    }

    #[test]
    fn walking_brakes_without_input() {
        let p = player(3);
        let mut vel = Vec2::new(2.0, 0.0);
        let f = p.walking_force(&mut vel);
        assert!(f.x < 0.0);
        assert_eq!(vel.x, 2.0);
    }

    #[test]
    fn walking_caps_ground_speed() {
        let mut p = player(3);
        p.set_movement(-20.0);
        assert!(!p.is_facing_right());
        let mut vel = Vec2::new(-9.0, 0.0);
        let f = p.walking_force(&mut vel);
        assert_eq!(vel.x, -p.tuning().max_speed_ground);
        assert_eq!(f.x, -20.0);
    }

    #[test]
    fn wind_caps_instead_of_pushing() {
        let p = player(3);
        let max = p.tuning().max_speed_air_wind;
        let mut vel = Vec2::new(max + 1.0, 0.0);
        let f = p.wind_force(Vec2::new(5.0, 2.0), &mut vel);
        assert_eq!(vel.x, max);
        assert_eq!(f.x, 0.0);
        assert_eq!(f.y, 2.0);

        let mut against = Vec2::new(max + 1.0, 0.0);
        let f = p.wind_force(Vec2::new(-5.0, 0.0), &mut against);
        assert_eq!(f.x, -5.0);
    }

    #[test]
    fn drag_is_stronger_when_opposing() {
        let p = player(3);
        let opposing = p.drag_force(1.0, Vec2::new(-2.0, -1.0));
        assert!((opposing.x - 2.0).abs() < 1e-6);
        let along = p.drag_force(1.0, Vec2::new(1.0, -1.0));
        assert!((along.x - 0.6).abs() < 1e-6);
        let too_fast = p.drag_force(1.0, Vec2::new(10.0, -1.0));
        assert_eq!(too_fast, Vec2::ZERO);
    }

    #[test]
    fn fall_speed_depends_on_umbrella() {
        let p = player(3);
        let mut open = Vec2::new(0.0, -50.0);
        p.clamp_fall(true, &mut open);
        assert_eq!(open.y, p.tuning().max_speed_down_open);
        let mut closed = Vec2::new(0.0, -50.0);
        p.clamp_fall(false, &mut closed);
        assert_eq!(closed.y, p.tuning().max_speed_down_closed);
    }

    #[test]
    fn lighter_needs_full_tank() {
        let mut p = player(3);
        let boost = p.lighter_boost(std::f32::consts::FRAC_PI_2, Vec2::ZERO).unwrap();
        assert!((boost.y - p.tuning().lighter_force).abs() < 1e-4);
        assert_eq!(p.lighter_fuel(), 0.0);
        assert!(p.lighter_boost(std::f32::consts::FRAC_PI_2, Vec2::ZERO).is_none());

        let ticks = (p.tuning().lighter_fuel / p.tuning().lighter_change_rate).ceil() as usize;
        for _ in 0..ticks {
            p.refill_lighter();
        }
        assert_eq!(p.lighter_ratio(), 1.0);
    }

    #[test]
    fn jump_cooldown_runs_only_on_ground() {
        let mut p = player(3);
        p.update();
        assert!(!p.can_jump());
        p.set_grounded(true);
        for _ in 0..p.tuning().jump_cooldown {
            p.update();
        }
        assert!(p.can_jump());
    }

    proptest! {
        #[test]
        fn health_stays_in_range(start in 0i32..10, max in 1i32..10, damage in -5i32..10) {
            let mut p = player(max);
            p.set_health(start);
            let before = p.health();
            match p.take_hit(damage, 10) {
                HitOutcome::Damaged => prop_assert_eq!(p.health(), (before - damage).min(max)),
                HitOutcome::Killed => prop_assert_eq!(p.health(), 0),
                HitOutcome::Ignored => prop_assert!(false, "fresh player is never invulnerable"),
            }
            prop_assert!(p.health() >= 0 && p.health() <= p.max_health());
        }
    }
}
