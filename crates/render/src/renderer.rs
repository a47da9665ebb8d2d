use crate::draw::{DrawList, SceneLayout};
use frenzy_kernel::Simulation;
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 4.0, 15.0),
            target: Vec3::new(0.0, 4.0, 14.0),
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads simulation state and a view configuration, then
/// produces output. It never mutates the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given simulation state and view.
    fn render(&self, sim: &Simulation, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs and logging.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    layout: SceneLayout,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation, view: &RenderView) -> String {
        let draws = DrawList::build(sim, &self.layout);
        let shark = sim.shark();
        let hunt = sim.hunt();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frenzy (tick={}, t={:.2}s) ===",
            sim.tick(),
            sim.elapsed()
        );
        let _ = writeln!(
            out,
            "Fish alive: {}/{}  Draws: {}",
            sim.school().alive_count(),
            sim.school().len(),
            draws.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        let _ = writeln!(
            out,
            "Shark: pos=({:.2}, {:.2}, {:.2}) heading={:.1} pitch={:.1} {:?} boost={:.2}s",
            shark.position.x,
            shark.position.y,
            shark.position.z,
            shark.heading.to_degrees(),
            shark.pitch.to_degrees(),
            hunt.alertness,
            hunt.boost.remaining()
        );

        for (id, fish) in sim.school().iter() {
            let p = fish.position;
            let state = if fish.is_active() { "" } else { " eaten" };
            let _ = writeln!(out, "  [{id}] pos=({:.2}, {:.2}, {:.2}){state}", p.x, p.y, p.z);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frenzy_common::SharkControls;
    use frenzy_kernel::Tuning;

    #[test]
    fn debug_renderer_fresh_simulation() {
        let sim = Simulation::default();
        let output = DebugTextRenderer::new().render(&sim, &RenderView::default());

        assert!(output.contains("tick=0"));
        assert!(output.contains("Fish alive: 10/10"));
        assert!(output.contains("Draws: 12"));
        assert!(output.contains("Idle"));
    }

    #[test]
    fn debug_renderer_marks_eaten_fish() {
        let mut tuning = Tuning::default();
        tuning.shark.position = Vec3::new(-2.0, 3.0, -16.0);
        let mut sim = Simulation::new(tuning);
        sim.step(1.0 / 60.0, SharkControls::NONE);

        let output = DebugTextRenderer::new().render(&sim, &RenderView::default());
        assert!(output.contains("[fish#0]"));
        assert!(output.contains("eaten"));
        assert!(output.contains("Fish alive: 9/10"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.eye, Vec3::new(0.0, 4.0, 15.0));
    }
}
