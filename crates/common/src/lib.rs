//! Shared value types used across the simulation, input, and render crates.

pub mod sphere;
pub mod types;

pub use sphere::BoundingSphere;
pub use types::{FishId, SharkControls};
