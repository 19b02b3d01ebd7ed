pub mod api;
pub mod core;
pub mod components;
pub mod input;
pub mod model;
pub mod config;
pub mod error;
pub mod level;
pub mod controller;

// Re-export key types at crate root for convenience
pub use api::types::{FixtureId, FixtureRole, ObjectId, SimEvent};
pub use components::obstacle::{Behavior, Obstacle, ObstacleKind};
pub use components::shape::Shape;
pub use config::{BirdTuning, HazardTuning, PlayerTuning, SimConfig, UmbrellaTuning};
pub use controller::contact::{ContactSet, ContactTracker};
pub use controller::GameplayController;
pub use core::arena::Arena;
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, ContactEvent, FixtureDesc, PhysicsBody,
    PhysicsWorld,
};
pub use core::time::FixedTimestep;
pub use error::{InsertError, LevelError, PhysicsError};
pub use input::intent::{Button, ButtonEdges, InputEvent, InputIntent};
pub use level::{LevelData, SpawnRecord};
pub use model::{
    BirdColor, BirdHazard, BirdState, Hazard, HitOutcome, LightningHazard, NestHazard,
    PlayerModel, UmbrellaModel, WindModel, WindParticle,
};
