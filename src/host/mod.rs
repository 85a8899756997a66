//! The host seam: the `World` capability trait and a simple in-memory
//! implementation for tests and demos.

mod sim;
mod world;

pub use sim::{DamageRecord, SimEntity, SimWorld};
pub use world::{World, WorldStatSource};
