use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use crate::config::UmbrellaTuning;

/// The umbrella's aim and canopy state. Aim 0 points straight up; positive
/// aim tilts counter-clockwise (towards the left).
#[derive(Debug, Clone)]
pub struct UmbrellaModel {
    open: bool,
    aim: f32,
    face_right: bool,
    turning_rate: f32,
    closed_momentum: f32,
}

impl UmbrellaModel {
    pub fn new(tuning: &UmbrellaTuning, closed_momentum: Option<f32>) -> Self {
        Self {
            open: tuning.start_open,
            aim: 0.0,
            face_right: true,
            turning_rate: tuning.turning_rate,
            closed_momentum: closed_momentum.unwrap_or(tuning.closed_momentum),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Flip open/closed. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn aim(&self) -> f32 {
        self.aim
    }

    /// Set the aim directly, clamped to the upper half-plane.
    pub fn set_aim(&mut self, aim: f32) {
        self.aim = aim.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Rotate by relative pointer motion; moving right tilts clockwise.
    pub fn turn(&mut self, pointer_dx: f32) {
        self.set_aim(self.aim - pointer_dx * self.turning_rate);
    }

    /// Direction the canopy faces, as an angle from +x.
    pub fn rotation(&self) -> f32 {
        self.aim + FRAC_PI_2
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.rotation())
    }

    pub fn closed_momentum(&self) -> f32 {
        self.closed_momentum
    }

    pub fn is_facing_right(&self) -> bool {
        self.face_right
    }

    pub fn set_facing_right(&mut self, face_right: bool) {
        self.face_right = face_right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn umbrella() -> UmbrellaModel {
        UmbrellaModel::new(&UmbrellaTuning::default(), None)
    }

    #[test]
    fn starts_closed_pointing_up() {
        let u = umbrella();
        assert!(!u.is_open());
        assert!((u.rotation() - FRAC_PI_2).abs() < 1e-6);
        assert!(u.direction().y > 0.999);
    }

    #[test]
    fn aim_is_clamped() {
        let mut u = umbrella();
        u.turn(1.0e6);
        assert_eq!(u.aim(), -FRAC_PI_2);
        assert!(u.rotation().abs() < 1e-6);
        u.turn(-1.0e6);
        assert_eq!(u.aim(), FRAC_PI_2);
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut u = umbrella();
        assert!(u.toggle());
        assert!(!u.toggle());
    }

    #[test]
    fn level_momentum_overrides_default() {
        let u = UmbrellaModel::new(&UmbrellaTuning::default(), Some(0.25));
        assert_eq!(u.closed_momentum(), 0.25);
    }
}
