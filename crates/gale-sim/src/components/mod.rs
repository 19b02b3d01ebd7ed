pub mod obstacle;
pub mod shape;
