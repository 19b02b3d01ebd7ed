//! Waypoint traversal shared by patrolling birds and moving platforms.

use glam::Vec2;

/// Per-axis distance under which a waypoint counts as reached.
pub const ARRIVAL_EPSILON: f32 = 0.001;

/// Walks a polyline of waypoints. Non-looping paths ping-pong by reversing
/// the waypoint list in place when the last point is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    points: Vec<Vec2>,
    current: usize,
    looping: bool,
}

impl PathFollower {
    pub fn new(points: Vec<Vec2>, looping: bool) -> Self {
        Self {
            points,
            current: 0,
            looping,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn target(&self) -> Option<Vec2> {
        self.points.get(self.current).copied()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// A path with fewer than two points never moves.
    pub fn is_stationary(&self) -> bool {
        self.points.len() < 2
    }

    /// One tick of travel from `pos` at `speed` units per tick. Arriving at a
    /// waypoint consumes the tick: the target advances and `pos` is returned.
    /// Each axis snaps to the target instead of overshooting it.
    pub fn step(&mut self, pos: Vec2, speed: f32) -> Vec2 {
        if self.is_stationary() {
            return pos;
        }
        let target = self.points[self.current];
        let delta = target - pos;
        if delta.x.abs() < ARRIVAL_EPSILON && delta.y.abs() < ARRIVAL_EPSILON {
            self.advance();
            return pos;
        }
        let step = delta.normalize_or_zero() * speed;
        let x = if step.x.abs() > delta.x.abs() { target.x } else { pos.x + step.x };
        let y = if step.y.abs() > delta.y.abs() { target.y } else { pos.y + step.y };
        Vec2::new(x, y)
    }

    fn advance(&mut self) {
        if self.current + 1 < self.points.len() {
            self.current += 1;
            return;
        }
        if !self.looping {
            self.points.reverse();
        }
        self.current = 0;
    }
}
