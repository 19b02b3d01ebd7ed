//! Decorative particles drifting through a wind field.

use glam::Vec2;
use rapier2d::prelude::SharedShape;

use crate::components::shape::{outline_contains, solid_outline};
use crate::core::rng::Rng;

/// Fade ramp length in ticks.
pub const MAX_LIFE: u32 = 10;
/// Pull back towards the field axis, per tick.
const INWARD_VELOCITY: f32 = 0.000025;
/// Staggered start: particle `i` waits `(i % START_GROUPS) * START_SPACING` ticks.
const START_GROUPS: u32 = 10;
const START_SPACING: u32 = 10;
const RESEED_DELAY: u32 = 100;
const JITTER: f32 = 0.25;
/// Slack beyond the circumscribed radius before a particle is recycled.
const ESCAPE_MARGIN: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct WindParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub start_offset: u32,
}

impl WindParticle {
    /// Opacity in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / MAX_LIFE as f32
    }
}

/// Fixed-size particle pool for one wind field. Particles enter along the
/// upstream edge of the field's bounding circle and are recycled once they
/// leave it.
#[derive(Debug, Clone)]
pub struct WindParticles {
    particles: Vec<WindParticle>,
    rng: Rng,
    /// Solid field outline, `None` when the polygon has no area.
    outline: Option<SharedShape>,
    center: Vec2,
    radius: f32,
    /// Extent of the field across the wind axis, relative to `center`.
    rel_min_y: f32,
    rel_max_y: f32,
    axis: Vec2,
    base_vel: Vec2,
}

impl WindParticles {
    /// `polygon` is the field outline in world space.
    pub fn new(polygon: &[Vec2], direction: f32, magnitude: f32, density: f32, cap: usize, seed: u64) -> Self {
        let axis = Vec2::from_angle(direction);
        let perp = axis.perp();
        let center = if polygon.is_empty() {
            Vec2::ZERO
        } else {
            polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32
        };

        let mut radius = 0.0f32;
        let mut rel_min_y = f32::INFINITY;
        let mut rel_max_y = f32::NEG_INFINITY;
        let mut lo = Vec2::splat(f32::MAX);
        let mut hi = Vec2::splat(f32::MIN);
        for p in polygon {
            let rel = *p - center;
            radius = radius.max(rel.length());
            rel_min_y = rel_min_y.min(perp.dot(rel));
            rel_max_y = rel_max_y.max(perp.dot(rel));
            lo = lo.min(*p);
            hi = hi.max(*p);
        }
        if polygon.is_empty() {
            rel_min_y = 0.0;
            rel_max_y = 0.0;
        }
        let area = if polygon.is_empty() { 0.0 } else { (hi - lo).x * (hi - lo).y };
        let count = ((area * density).max(0.0).floor() as usize).min(cap);

        let mut pool = Self {
            particles: Vec::with_capacity(count),
            rng: Rng::new(seed),
            outline: solid_outline(polygon).ok(),
            center,
            radius,
            rel_min_y,
            rel_max_y,
            axis,
            base_vel: axis * magnitude / 10.0,
        };
        for i in 0..count {
            let pos = pool.sample();
            pool.particles.push(WindParticle {
                pos,
                vel: pool.base_vel,
                life: 0,
                start_offset: (i as u32 % START_GROUPS) * START_SPACING,
            });
        }
        log::debug!("wind field at ({:.2}, {:.2}): {} particles", center.x, center.y, count);
        pool
    }

    pub fn particles(&self) -> &[WindParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// A point on the upstream half of the bounding circle.
    fn sample(&mut self) -> Vec2 {
        let y = self.rng.range(self.rel_min_y, self.rel_max_y.max(self.rel_min_y));
        let x = -(self.radius * self.radius - y * y).max(0.0).sqrt();
        self.center + self.axis * x + self.axis.perp() * y
    }

    pub fn tick(&mut self, dt: f32) {
        let perp = self.axis.perp();
        for i in 0..self.particles.len() {
            let jitter = perp * self.rng.range(-JITTER, JITTER);
            let inside = self
                .outline
                .as_ref()
                .is_some_and(|outline| outline_contains(outline, self.particles[i].pos));
            let particle = &mut self.particles[i];
            particle.vel = self.base_vel + jitter;

            if particle.start_offset > 0 {
                particle.life = 0;
                particle.start_offset -= 1;
            } else {
                particle.life = if inside {
                    (particle.life + 1).min(MAX_LIFE)
                } else {
                    particle.life.saturating_sub(1)
                };
                let rel = particle.pos - self.center;
                let strength = if self.radius > 0.0 {
                    INWARD_VELOCITY * (self.axis.dot(rel) / self.radius).abs()
                } else {
                    0.0
                };
                particle.vel -= perp * strength * perp.dot(rel).signum();
                particle.pos += particle.vel * dt;
            }

            if particle.pos.distance(self.center) > self.radius + ESCAPE_MARGIN {
                let pos = self.sample();
                let delay = self.rng.next_int(RESEED_DELAY);
                let particle = &mut self.particles[i];
                particle.pos = pos;
                particle.life = 0;
                particle.start_offset = delay;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(side, 0.0),
            Vec2::new(side, side),
            Vec2::new(0.0, side),
        ]
    }

    #[test]
    fn count_follows_area_and_cap() {
        assert_eq!(WindParticles::new(&square(4.0), 0.0, 2.0, 1.0, 256, 1).len(), 16);
        assert_eq!(WindParticles::new(&square(4.0), 0.0, 2.0, 1.0, 5, 1).len(), 5);
        assert!(WindParticles::new(&[], 0.0, 2.0, 1.0, 5, 1).is_empty());
    }

    #[test]
    fn starts_upstream_and_staggered() {
        let pool = WindParticles::new(&square(4.0), 0.0, 2.0, 1.0, 256, 7);
        let center = pool.center();
        for (i, p) in pool.particles().iter().enumerate() {
            assert!(p.pos.x <= center.x + 1e-4, "particle {i} should start upstream");
            assert_eq!(p.life, 0);
            assert_eq!(p.start_offset, (i as u32 % 10) * 10);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = WindParticles::new(&square(3.0), 1.0, 2.0, 1.0, 64, 99);
        let mut b = WindParticles::new(&square(3.0), 1.0, 2.0, 1.0, 64, 99);
        for _ in 0..50 {
            a.tick(1.0 / 60.0);
            b.tick(1.0 / 60.0);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn particles_never_escape_and_fade_in() {
        let mut pool = WindParticles::new(&square(2.0), 0.3, 40.0, 2.0, 64, 3);
        let limit = pool.radius() + ESCAPE_MARGIN;
        let mut lit = false;
        for _ in 0..2000 {
            pool.tick(1.0 / 60.0);
            for p in pool.particles() {
                assert!(p.pos.distance(pool.center()) <= limit + 1e-4);
                assert!(p.life <= MAX_LIFE);
                lit |= p.alpha() > 0.0;
            }
        }
        assert!(lit);
    }
}
