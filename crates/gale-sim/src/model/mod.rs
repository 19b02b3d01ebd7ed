pub mod bird;
pub mod hazard;
pub mod lightning;
pub mod nest;
pub mod particle;
pub mod path;
pub mod platform;
pub mod player;
pub mod umbrella;
pub mod wind;

pub use bird::{BirdColor, BirdHazard, BirdParams, BirdState};
pub use hazard::{Hazard, Knockback, StaticHazardKind};
pub use lightning::{LightningHazard, LightningPhase};
pub use nest::NestHazard;
pub use particle::{WindParticle, WindParticles};
pub use path::PathFollower;
pub use platform::MovingPlatformModel;
pub use player::{HitOutcome, PlayerModel};
pub use umbrella::UmbrellaModel;
pub use wind::WindModel;
