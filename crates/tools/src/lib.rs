//! Developer tooling: read-only views over a running simulation.
//!
//! # Invariants
//! - Inspection never mutates the simulation.

mod inspector;

pub use inspector::{FishInfo, SimInspector, SimSummary};
