//! wgpu render backend for the shark frenzy scene.
//!
//! Draws a full-screen water gradient, then the terrain, the school and the
//! shark as textured instances with ambient + directional light and fog.
//! The camera is a keyboard-driven fly camera.
//!
//! # Invariants
//! - The renderer never mutates simulation state; it only consumes a `DrawList`.
//! - Camera motion is not part of the simulation.

mod camera;
mod context;
mod gpu;
mod shaders;

pub use camera::FlyCamera;
pub use context::GpuContext;
pub use gpu::{FrenzyRenderer, Lighting};

/// Failures while bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    Adapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
}
