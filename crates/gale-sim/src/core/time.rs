/// Default number of catch-up ticks allowed per frame.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Turns variable frame time into a whole number of fixed simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Cap on ticks per frame. Frame time beyond the cap is dropped so a long
    /// stall does not snowball into ever longer catch-up frames.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time. Returns the number of fixed ticks to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Fraction of a tick left in the accumulator (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any banked time, e.g. after a level reload.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(DT), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_catch_up() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(1.0), DEFAULT_MAX_STEPS);
        let mut tight = FixedTimestep::new(DT).with_max_steps(3);
        assert_eq!(tight.accumulate(1.0), 3);
    }

    #[test]
    fn negative_frame_time_is_ignored() {
        let mut ts = FixedTimestep::new(DT);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_banked_time() {
        let mut ts = FixedTimestep::new(DT);
        ts.accumulate(0.012);
        assert!(ts.alpha() > 0.0 && ts.alpha() <= 1.0);
        ts.reset();
        assert_eq!(ts.accumulate(0.008), 0);
    }
}
