//! Simulation kernel: authoritative fish and shark state, stepped once per frame.
//!
//! # Invariants
//! - `Simulation::step` is a pure function of the current state, the elapsed
//!   time and the shark controls. Same inputs, same result.
//! - Fish are never removed from the school; eaten fish are skipped.
//! - The shark's awareness and capture spheres are re-centered every step.

pub mod config;
pub mod fish;
pub mod hunt;
pub mod shark;
pub mod simulation;

pub use config::{FishSpawn, Gait, HuntTuning, SchoolTuning, SharkTuning, Tuning, TuningError};
pub use fish::{Fish, School};
pub use hunt::{Alertness, BoostState, Capture, Hunt, SenseOutcome};
pub use shark::Shark;
pub use simulation::{MAX_EVENTS, SimEvent, Simulation, StepReport};
