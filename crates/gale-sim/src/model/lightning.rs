/// Which half of the strike cycle the bolt is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightningPhase {
    Waiting,
    Striking,
}

/// Strike timer. Only one of the two countdowns is live at a time; the
/// collider is enabled exactly while striking.
#[derive(Debug, Clone)]
pub struct LightningHazard {
    wait_duration: u32,
    strike_duration: u32,
    phase: LightningPhase,
    wait_timer: u32,
    strike_timer: u32,
}

impl LightningHazard {
    pub fn new(wait_duration: u32, strike_duration: u32, initial_offset: u32) -> Self {
        Self {
            wait_duration,
            strike_duration,
            phase: LightningPhase::Waiting,
            wait_timer: wait_duration.saturating_add(initial_offset),
            strike_timer: 0,
        }
    }

    pub fn phase(&self) -> LightningPhase {
        self.phase
    }

    pub fn is_striking(&self) -> bool {
        self.phase == LightningPhase::Striking
    }

    pub fn wait_timer(&self) -> u32 {
        self.wait_timer
    }

    pub fn strike_timer(&self) -> u32 {
        self.strike_timer
    }

    /// Advance one tick. Returns `true` when the phase flipped.
    ///
    /// The flipping tick counts as the first tick of the new phase, so a bolt
    /// stays lit for exactly `strike_duration` ticks.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            LightningPhase::Waiting if self.wait_timer == 0 => {
                self.phase = LightningPhase::Striking;
                self.strike_timer = self.strike_duration.saturating_sub(1);
                true
            }
            LightningPhase::Waiting => {
                self.wait_timer -= 1;
                false
            }
            LightningPhase::Striking if self.strike_timer == 0 => {
                self.phase = LightningPhase::Waiting;
                self.wait_timer = self.wait_duration.saturating_sub(1);
                true
            }
            LightningPhase::Striking => {
                self.strike_timer -= 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Striking flag after each of `ticks` ticks, indexed from tick 1.
    fn trace(bolt: &mut LightningHazard, ticks: usize) -> Vec<bool> {
        (0..ticks)
            .map(|_| {
                bolt.tick();
                bolt.is_striking()
            })
            .collect()
    }

    #[test]
    fn strike_window_and_period() {
        let mut bolt = LightningHazard::new(100, 20, 0);
        let lit = trace(&mut bolt, 400);
        let at = |tick: usize| lit[tick - 1];

        assert!((1..=100).all(|t| !at(t)));
        assert!((101..=120).all(at));
        assert!(!at(121));
        assert!((121..=220).all(|t| !at(t)));
        assert!((221..=240).all(at));
        assert!(!at(241));
        assert!(at(341) && !at(340));
    }

    #[test]
    fn offset_delays_first_strike() {
        let mut bolt = LightningHazard::new(10, 5, 7);
        let lit = trace(&mut bolt, 30);
        let first = lit.iter().position(|&s| s).map(|i| i + 1);
        assert_eq!(first, Some(18));
    }

    #[test]
    fn zero_wait_strikes_immediately() {
        let mut bolt = LightningHazard::new(0, 2, 0);
        assert!(bolt.tick());
        assert!(bolt.is_striking());
        assert!(!bolt.tick());
        assert!(bolt.tick());
        assert_eq!(bolt.phase(), LightningPhase::Waiting);
    }
}
