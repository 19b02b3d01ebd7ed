use serde::Deserialize;

/// Player movement tuning. Speeds are in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal walking force at full stick deflection.
    pub force: f32,
    /// Braking coefficient applied while grounded with no input.
    pub damping: f32,
    pub max_speed_ground: f32,
    /// Horizontal cap while being pushed by wind.
    pub max_speed_air_wind: f32,
    /// Horizontal cap for umbrella drag steering.
    pub max_speed_air_drag: f32,
    pub max_speed_up: f32,
    /// Terminal fall speed with the umbrella open (negative, y-up).
    pub max_speed_down_open: f32,
    pub max_speed_down_closed: f32,
    pub lighter_force: f32,
    pub lighter_fuel: f32,
    /// Fuel regained per grounded tick.
    pub lighter_change_rate: f32,
    pub jump_cooldown: u32,
    /// Ground sensor width as a fraction of the body width.
    pub sensor_shrink: f32,
    pub sensor_height: f32,
    pub density: f32,
    pub friction: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            force: 20.0,
            damping: 10.0,
            max_speed_ground: 4.0,
            max_speed_air_wind: 8.0,
            max_speed_air_drag: 3.0,
            max_speed_up: 6.0,
            max_speed_down_open: -2.0,
            max_speed_down_closed: -10.0,
            lighter_force: 8.0,
            lighter_fuel: 100.0,
            lighter_change_rate: 2.0,
            jump_cooldown: 30,
            sensor_shrink: 0.6,
            sensor_height: 0.05,
            density: 1.0,
            friction: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct UmbrellaTuning {
    /// Radians of aim per unit of horizontal pointer motion.
    pub turning_rate: f32,
    /// Velocity multiplier applied to the player when the umbrella closes.
    pub closed_momentum: f32,
    pub start_open: bool,
    /// Horizontal drag force scale while gliding.
    pub drag_scale: f32,
}

impl Default for UmbrellaTuning {
    fn default() -> Self {
        Self {
            turning_rate: 0.01,
            closed_momentum: 0.6,
            start_open: false,
            drag_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub damage: i32,
    pub knockback: f32,
    pub sensor_radius: f32,
    pub attack_speed: f32,
    /// Ticks between spotting the player and committing to the dive.
    pub attack_wait: u32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            damage: 1,
            knockback: 4.0,
            sensor_radius: 6.0,
            attack_speed: 20.0,
            attack_wait: 50,
        }
    }
}

/// Damage and knockback for a stationary hazard class.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub damage: i32,
    pub knockback: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            damage: 1,
            knockback: 3.0,
        }
    }
}

/// All simulation constants. Every field has a default, so a partial JSON
/// object overrides only what it names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Invulnerability ticks granted after a hit.
    pub i_frames: u32,
    /// Ticks between reaching the goal and the level reporting completed.
    pub win_countdown: u32,
    pub lose_countdown: u32,
    /// The player dies once their y drops below this value.
    pub fall_limit: f32,
    /// Scale from authored path speeds to per-tick displacement.
    pub step_scale: f32,
    pub player: PlayerTuning,
    pub umbrella: UmbrellaTuning,
    pub birds: BirdTuning,
    pub rocks: HazardTuning,
    pub brambles: HazardTuning,
    pub lightning: HazardTuning,
    /// Wind particles per square world unit.
    pub wind_particle_density: f32,
    pub max_wind_particles: usize,
    pub particle_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
            i_frames: 120,
            win_countdown: 20,
            lose_countdown: 40,
            fall_limit: -0.01,
            step_scale: 0.01,
            player: PlayerTuning::default(),
            umbrella: UmbrellaTuning::default(),
            birds: BirdTuning::default(),
            rocks: HazardTuning::default(),
            brambles: HazardTuning { damage: 1, knockback: 2.0 },
            lightning: HazardTuning { damage: 1, knockback: 5.0 },
            wind_particle_density: 1.0,
            max_wind_particles: 256,
            particle_seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{ "i_frames": 30, "birds": { "attack_wait": 10 } }"#).unwrap();
        assert_eq!(cfg.i_frames, 30);
        assert_eq!(cfg.birds.attack_wait, 10);
        assert_eq!(cfg.birds.damage, BirdTuning::default().damage);
        assert!((cfg.fixed_dt - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(cfg.velocity_iterations, 6);
    }

    #[test]
    fn defaults_match_fixed_step_contract() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.win_countdown, 20);
        assert_eq!(cfg.lose_countdown, 40);
        assert!(cfg.player.max_speed_down_open < 0.0);
        assert!(cfg.player.max_speed_down_open > cfg.player.max_speed_down_closed);
    }
}
