//! Input mapping: windowing backends translate raw keys into [`Action`]s and
//! feed them into an [`ActionState`].
//!
//! # Invariants
//! - The simulation only ever sees [`frenzy_common::SharkControls`], never keys.
//! - Camera motion is derived here but applied outside the simulation.

pub mod action;

pub use action::{Action, ActionState, CameraMotion};
