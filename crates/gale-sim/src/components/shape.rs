use glam::Vec2;
use rapier2d::prelude::{Point, PointQuery, Real, SharedShape};

use crate::core::physics::ColliderDesc;
use crate::error::PhysicsError;

const GEOM_EPSILON: f32 = 1e-6;

/// Collision outline of an obstacle, in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Upright capsule filling a `width` × `height` box.
    Capsule { width: f32, height: f32 },
    Box { width: f32, height: f32 },
    /// Simple polygon. Concave outlines are split into convex parts.
    Polygon { points: Vec<Vec2> },
}

impl Shape {
    pub fn to_collider(&self) -> ColliderDesc {
        match self {
            Shape::Capsule { width, height } => {
                let radius = width * 0.5;
                ColliderDesc::CapsuleY {
                    half_height: (height * 0.5 - radius).max(0.0),
                    radius,
                }
            }
            Shape::Box { width, height } => ColliderDesc::Cuboid {
                half_width: width * 0.5,
                half_height: height * 0.5,
            },
            Shape::Polygon { points } => ColliderDesc::Polygon {
                points: points.clone(),
            },
        }
    }

    /// Local axis-aligned bounds as `(min, max)`.
    pub fn local_bounds(&self) -> (Vec2, Vec2) {
        match self {
            Shape::Capsule { width, height } | Shape::Box { width, height } => {
                let half = Vec2::new(width * 0.5, height * 0.5);
                (-half, half)
            }
            Shape::Polygon { points } => {
                if points.is_empty() {
                    return (Vec2::ZERO, Vec2::ZERO);
                }
                points.iter().fold(
                    (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
                    |(lo, hi), p| (lo.min(*p), hi.max(*p)),
                )
            }
        }
    }

    pub fn size(&self) -> Vec2 {
        let (lo, hi) = self.local_bounds();
        hi - lo
    }

    /// Same outline reflected across the local y axis.
    pub fn mirrored_x(&self) -> Shape {
        match self {
            Shape::Polygon { points } => Shape::Polygon {
                points: points.iter().rev().map(|p| Vec2::new(-p.x, p.y)).collect(),
            },
            other => other.clone(),
        }
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area; positive for counter-clockwise winding.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum()
}

pub fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let turn = cross(b - a, c - b);
        if turn.abs() <= GEOM_EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Solid collision shape for a simple polygon outline. Convex outlines
/// become a single hull, concave ones a compound of convex parts.
pub fn solid_outline(points: &[Vec2]) -> Result<SharedShape, PhysicsError> {
    if points.len() < 3 {
        return Err(PhysicsError::TooFewVertices(points.len()));
    }
    if signed_area(points).abs() <= GEOM_EPSILON {
        return Err(PhysicsError::DegeneratePolygon);
    }
    let vertices: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    if is_convex(points) {
        return SharedShape::convex_hull(&vertices).ok_or(PhysicsError::DegeneratePolygon);
    }
    let n = vertices.len() as u32;
    let edges: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
    Ok(SharedShape::convex_decomposition(&vertices, &edges))
}

/// Whether `p`, in the outline's own frame, lies inside it.
pub fn outline_contains(outline: &SharedShape, p: Vec2) -> bool {
    outline.contains_local_point(&Point::new(p.x, p.y))
}
