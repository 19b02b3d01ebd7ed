pub mod arena;
pub mod physics;
pub mod rng;
pub mod time;
