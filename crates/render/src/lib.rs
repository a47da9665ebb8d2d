//! Rendering Adapter: turns simulation state into draw commands.
//!
//! # Invariants
//! - Renderers never mutate the simulation.
//! - Inactive fish produce no draw commands.
//! - The draw list is rebuilt from scratch every frame.

mod draw;
mod renderer;

pub use draw::{DrawCommand, DrawList, ModelKind, SceneLayout};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "frenzy-render v0.1.0"
}
