use glam::Vec2;

use super::path::PathFollower;

/// Kinematic platform that follows waypoints and carries whatever stands on it.
#[derive(Debug, Clone)]
pub struct MovingPlatformModel {
    path: PathFollower,
    move_speed: f32,
}

impl MovingPlatformModel {
    pub fn new(path: Vec<Vec2>, looping: bool, move_speed: f32) -> Self {
        Self {
            path: PathFollower::new(path, looping),
            move_speed,
        }
    }

    pub fn path(&self) -> &PathFollower {
        &self.path
    }

    /// Next position after one tick.
    pub fn step(&mut self, pos: Vec2, step_scale: f32) -> Vec2 {
        self.path.step(pos, self.move_speed * step_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loops_back_to_start() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        let mut platform = MovingPlatformModel::new(vec![a, b], true, 50.0);
        let mut pos = a;
        // arrive at a, two half-unit moves, arrive at b, half-unit back
        for _ in 0..5 {
            pos = platform.step(pos, 0.01);
        }
        assert_eq!(platform.path().points(), &[a, b]);
        assert_eq!(platform.path().target(), Some(a));
        assert!((pos.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_speed_holds_position() {
        let mut platform = MovingPlatformModel::new(vec![Vec2::ZERO, Vec2::ONE], false, 0.0);
        let pos = Vec2::new(0.0, 0.0);
        platform.step(pos, 0.01);
        assert_eq!(platform.step(pos, 0.01), pos);
    }
}
