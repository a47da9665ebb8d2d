use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use frenzy_assets::{LoadedScene, SceneAssets};
use frenzy_input::{Action, ActionState};
use frenzy_kernel::{Simulation, Tuning};
use frenzy_render::{DrawList, SceneLayout};
use frenzy_render_wgpu::{FlyCamera, FrenzyRenderer, GpuContext};
use frenzy_tools::SimInspector;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const RECENT_EVENTS: usize = 8;

#[derive(Parser)]
#[command(name = "frenzy-desktop", about = "Shark feeding frenzy underwater scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory the model paths are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Scene manifest (JSON) overriding the default model paths
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Simulation tuning (JSON); defaults apply when omitted
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 1800)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 1000)]
    height: u32,
}

fn action_for(key: KeyCode) -> Option<Action> {
    Some(match key {
        KeyCode::KeyW => Action::CameraForward,
        KeyCode::KeyS => Action::CameraBackward,
        KeyCode::KeyA => Action::CameraLeft,
        KeyCode::KeyD => Action::CameraRight,
        KeyCode::KeyO => Action::CameraUp,
        KeyCode::KeyK => Action::CameraDown,
        KeyCode::ArrowUp => Action::CameraPitchUp,
        KeyCode::ArrowDown => Action::CameraPitchDown,
        KeyCode::ArrowLeft => Action::CameraYawLeft,
        KeyCode::ArrowRight => Action::CameraYawRight,
        KeyCode::KeyQ => Action::SharkTurnLeft,
        KeyCode::KeyE => Action::SharkTurnRight,
        KeyCode::KeyZ => Action::SharkPitchUp,
        KeyCode::KeyC => Action::SharkPitchDown,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    sim: Simulation,
    camera: FlyCamera,
    layout: SceneLayout,
    actions: ActionState,
    show_hud: bool,
    recent_events: VecDeque<String>,
    last_frame: Instant,
    started: Instant,
}

impl AppState {
    fn new(tuning: Tuning) -> Self {
        let now = Instant::now();
        Self {
            sim: Simulation::new(tuning),
            camera: FlyCamera::default(),
            layout: SceneLayout::default(),
            actions: ActionState::new(),
            show_hud: true,
            recent_events: VecDeque::with_capacity(RECENT_EVENTS),
            last_frame: now,
            started: now,
        }
    }

    fn update(&mut self, dt: f32) {
        self.camera.apply(&self.actions.camera_motion(), dt);
        self.sim.step(dt, self.actions.shark_controls());

        for event in self.sim.drain_events() {
            tracing::debug!("sim event: {event}");
            if self.recent_events.len() == RECENT_EVENTS {
                self.recent_events.pop_front();
            }
            self.recent_events.push_back(event.to_string());
        }
    }

    /// Returns true when the key asks the app to close.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if let Some(action) = action_for(key) {
            self.actions.set(action, pressed);
        }

        if !pressed {
            return false;
        }

        match key {
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
            }
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    fn reset(&mut self) {
        self.sim = Simulation::new(self.sim.tuning().clone());
        self.recent_events.clear();
        tracing::info!("simulation reset");
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = SimInspector::summary(&self.sim);
        let mut reset = false;

        egui::SidePanel::left("hud")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Shark Frenzy");
                ui.separator();
                ui.label(format!("Tick: {}  Time: {:.1}s", summary.tick, summary.elapsed));
                ui.label(format!(
                    "Fish: {} / {}",
                    summary.fish_alive, summary.fish_total
                ));
                ui.label(format!("Shark: {:?}", summary.alertness));
                if summary.boost_remaining > 0.0 {
                    ui.label(format!("Boost: {:.1}s", summary.boost_remaining));
                }
                ui.label(format!(
                    "Shark pos: ({:.1}, {:.1}, {:.1})",
                    summary.shark_position.x, summary.shark_position.y, summary.shark_position.z
                ));
                ui.label(format!(
                    "Heading: {:.0}  Pitch: {:.0}",
                    summary.shark_heading_deg, summary.shark_pitch_deg
                ));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})  fov {:.0}",
                    self.camera.position.x,
                    self.camera.position.y,
                    self.camera.position.z,
                    self.camera.zoom
                ));
                if ui.button("Reset").clicked() {
                    reset = true;
                }

                ui.separator();
                ui.heading("School");
                for info in SimInspector::list_fish(&self.sim) {
                    ui.small(info.to_string());
                }

                ui.separator();
                ui.heading("Events");
                for line in &self.recent_events {
                    ui.small(line);
                }

                ui.separator();
                ui.small("F1: HUD | WASD/O/K: Move | Arrows: Look | Q/E/Z/C: Shark");
            });

        if reset {
            self.reset();
        }
    }
}

/// Window plus everything created against it.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: FrenzyRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    scene: Option<LoadedScene>,
    window_size: PhysicalSize<u32>,
    graphics: Option<Graphics>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, scene: LoadedScene, window_size: PhysicalSize<u32>) -> Self {
        Self {
            state,
            scene: Some(scene),
            window_size,
            graphics: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Shark Feeding Frenzy")
            .with_inner_size(self.window_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU")?;
        let scene = self
            .scene
            .take()
            .context("scene assets already consumed")?;

        let renderer = FrenzyRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            size.width,
            size.height,
            scene,
        );
        self.state.camera.set_viewport(size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.graphics = Some(Graphics {
            window,
            gpu,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(gfx) = &mut self.graphics else {
            return;
        };
        gfx.gpu.resize(size.width, size.height);
        let (width, height) = gfx.gpu.size();
        gfx.renderer.resize(&gfx.gpu.device, width, height);
        self.state.camera.set_viewport(width, height);
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let Some(gfx) = &mut self.graphics else {
            return;
        };
        let gpu = &gfx.gpu;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = DrawList::build(&self.state.sim, &self.state.layout);
        gfx.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            &draws,
            self.state.started.elapsed().as_secs_f32(),
        );

        let raw_input = gfx.egui_winit.take_egui_input(&gfx.window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        gfx.egui_winit
            .handle_platform_output(&gfx.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        {
            let egui_renderer = &mut gfx.egui_renderer;
            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("egui_encoder"),
                });
            egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            gpu.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();
        gfx.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            tracing::error!("{e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gfx) = &mut self.graphics {
            let response = gfx.egui_winit.on_window_event(&gfx.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::Focused(false) => {
                self.state.actions.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &self.graphics {
            gfx.window.request_redraw();
        }
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    match path {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display())),
        None => Ok(Tuning::default()),
    }
}

fn load_scene(cli: &Cli) -> Result<LoadedScene> {
    let manifest = match &cli.scene {
        Some(path) => SceneAssets::from_file(path)
            .with_context(|| format!("failed to read scene manifest {}", path.display()))?,
        None => SceneAssets::default(),
    };
    manifest
        .load(&cli.assets)
        .with_context(|| format!("failed to load models from {}", cli.assets.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("frenzy-desktop starting");

    let startup = load_tuning(cli.tuning.as_ref()).and_then(|tuning| Ok((tuning, load_scene(&cli)?)));
    let (tuning, scene) = match startup {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("{e:#}");
            return Err(e);
        }
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(
        AppState::new(tuning),
        scene,
        PhysicalSize::new(cli.width, cli.height),
    );
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_key() {
        let keys = [
            KeyCode::KeyW,
            KeyCode::KeyS,
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::KeyO,
            KeyCode::KeyK,
            KeyCode::ArrowUp,
            KeyCode::ArrowDown,
            KeyCode::ArrowLeft,
            KeyCode::ArrowRight,
            KeyCode::KeyQ,
            KeyCode::KeyE,
            KeyCode::KeyZ,
            KeyCode::KeyC,
        ];
        let actions: std::collections::BTreeSet<_> =
            keys.into_iter().filter_map(action_for).collect();
        assert_eq!(actions.len(), 14);
        assert_eq!(action_for(KeyCode::F1), None);
    }

    #[test]
    fn escape_requests_close() {
        let mut state = AppState::new(Tuning::default());
        assert!(state.handle_key(KeyCode::Escape, true));
        assert!(!state.handle_key(KeyCode::KeyQ, true));
        assert!(state.actions.is_held(Action::SharkTurnLeft));
        state.handle_key(KeyCode::KeyQ, false);
        assert!(!state.actions.is_held(Action::SharkTurnLeft));
    }

    #[test]
    fn f1_toggles_hud() {
        let mut state = AppState::new(Tuning::default());
        assert!(state.show_hud);
        state.handle_key(KeyCode::F1, true);
        assert!(!state.show_hud);
        state.handle_key(KeyCode::F1, false);
        assert!(!state.show_hud);
    }

    #[test]
    fn recent_events_are_bounded() {
        let mut tuning = Tuning::default();
        tuning.shark.position = glam::Vec3::new(-2.0, 3.0, -16.0);
        let mut state = AppState::new(tuning);
        state.update(1.0 / 60.0);
        assert!(!state.recent_events.is_empty());
        for _ in 0..2000 {
            state.update(0.1);
        }
        assert!(state.recent_events.len() <= RECENT_EVENTS);
    }
}
