use glam::Vec2;
use std::f32::consts::TAU;

use super::particle::WindParticles;

/// A wind field. Pushes an open umbrella in proportion to how squarely the
/// canopy faces the wind.
#[derive(Debug, Clone)]
pub struct WindModel {
    magnitude: f32,
    direction: f32,
    particles: Option<WindParticles>,
}

impl WindModel {
    /// `direction` is any angle in radians; it is normalised into `[0, 2π)`.
    pub fn new(magnitude: f32, direction: f32) -> Self {
        Self {
            magnitude,
            direction: direction.rem_euclid(TAU),
            particles: None,
        }
    }

    pub fn with_particles(mut self, particles: WindParticles) -> Self {
        self.particles = Some(particles);
        self
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn particles(&self) -> Option<&WindParticles> {
        self.particles.as_ref()
    }

    /// Push magnitude on a canopy facing `umbrella_angle`. Never negative:
    /// a canopy facing away catches nothing.
    pub fn wind_force(&self, umbrella_angle: f32) -> f32 {
        let dot = Vec2::from_angle(self.direction).dot(Vec2::from_angle(umbrella_angle));
        dot.max(0.0) * self.magnitude
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(particles) = &mut self.particles {
            particles.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn direction_is_normalised() {
        assert!((WindModel::new(1.0, -FRAC_PI_2).direction() - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!((WindModel::new(1.0, TAU + 1.0).direction() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projection() {
        let wind = WindModel::new(5.0, FRAC_PI_2);
        assert!((wind.wind_force(FRAC_PI_2) - 5.0).abs() < 1e-5);
        assert_eq!(wind.wind_force(-FRAC_PI_2), 0.0);
        assert!(wind.wind_force(0.0).abs() < 1e-5);

        let diagonal = wind.wind_force(FRAC_PI_2 + PI / 4.0);
        assert!((diagonal - 5.0 * (PI / 4.0).cos()).abs() < 1e-5);
    }

    #[test]
    fn continuous_across_perpendicular() {
        let wind = WindModel::new(5.0, 0.0);
        let before = wind.wind_force(FRAC_PI_2 - 1e-3);
        let after = wind.wind_force(FRAC_PI_2 + 1e-3);
        assert!(before > 0.0 && before < 0.01);
        assert_eq!(after, 0.0);
    }

    #[test]
    fn particles_are_optional() {
        let mut bare = WindModel::new(2.0, 0.0);
        bare.tick(1.0 / 60.0);
        assert!(bare.particles().is_none());

        let outline = [Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)];
        let with = WindModel::new(2.0, 0.0).with_particles(WindParticles::new(&outline, 0.0, 2.0, 1.0, 8, 1));
        assert_eq!(with.particles().map(|p| p.len()), Some(4));
    }
}
