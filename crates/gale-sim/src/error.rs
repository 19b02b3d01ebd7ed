use thiserror::Error;

/// Collider construction failures reported by [`PhysicsWorld`](crate::core::physics::PhysicsWorld).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon is degenerate and cannot be turned into a collider")]
    DegeneratePolygon,
}

/// Fatal level-load failures. The shell falls back to an error screen.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to allocate physics body for `{name}`: {source}")]
    Allocation {
        name: String,
        #[source]
        source: PhysicsError,
    },
    #[error("`{name}`: coordinate array has odd length {len}")]
    OddCoordinates { name: String, len: usize },
    #[error("`{name}`: path must contain at least one point")]
    EmptyPath { name: String },
    #[error("level has no player spawn")]
    MissingPlayer,
    #[error("level has more than one player spawn")]
    DuplicatePlayer,
    #[error("invalid level data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a queued object was not admitted into the live set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertError {
    #[error("object `{name}` queued outside world bounds at ({x}, {y})")]
    OutOfBounds { name: String, x: f32, y: f32 },
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
