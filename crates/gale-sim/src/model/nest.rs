use glam::Vec2;

/// Spawner that hatches a blue bird every `spawn_delay` ticks.
#[derive(Debug, Clone)]
pub struct NestHazard {
    path: Vec<Vec2>,
    bird_speed: f32,
    spawn_delay: u32,
    countdown: u32,
    /// Hit box given to each hatchling, relative to the hatchling.
    bird_points: Vec<Vec2>,
}

impl NestHazard {
    pub fn new(path: Vec<Vec2>, bird_speed: f32, spawn_delay: u32, bird_points: Vec<Vec2>) -> Self {
        Self {
            path,
            bird_speed,
            spawn_delay,
            countdown: spawn_delay,
            bird_points,
        }
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn bird_speed(&self) -> f32 {
        self.bird_speed
    }

    pub fn spawn_delay(&self) -> u32 {
        self.spawn_delay
    }

    pub fn bird_points(&self) -> &[Vec2] {
        &self.bird_points
    }

    /// Hatchlings start facing their first leg.
    pub fn hatch_facing(&self, nest_pos: Vec2) -> bool {
        self.path.get(1).map_or(true, |next| next.x - nest_pos.x > 0.0)
    }

    /// Count down one tick. Returns `true` when a bird should hatch now.
    pub fn tick(&mut self) -> bool {
        if self.countdown == 0 {
            self.countdown = self.spawn_delay;
            true
        } else {
            self.countdown -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hatches_every_delay_plus_one_ticks() {
        let mut nest = NestHazard::new(vec![Vec2::ZERO], 50.0, 2, Vec::new());
        let hatched: Vec<bool> = (0..7).map(|_| nest.tick()).collect();
        assert_eq!(hatched, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn facing_follows_first_leg() {
        let nest = NestHazard::new(vec![Vec2::new(5.0, 5.0), Vec2::new(1.0, 5.0)], 50.0, 10, Vec::new());
        assert!(!nest.hatch_facing(Vec2::new(5.0, 5.0)));
        let lone = NestHazard::new(vec![Vec2::ZERO], 50.0, 10, Vec::new());
        assert!(lone.hatch_facing(Vec2::ZERO));
    }
}
