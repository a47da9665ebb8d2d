use frenzy_input::CameraMotion;
use glam::{Mat4, Vec3};

const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

/// Fly camera with position, yaw, pitch and a zoomable field of view.
/// Camera motion lives outside the simulation; it never affects the hunt.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians; -90 deg looks down -Z.
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second.
    pub speed: f32,
    /// Radians per second.
    pub turn_rate: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 15.0),
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            zoom: MAX_ZOOM,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            speed: 2.5,
            turn_rate: 45.0_f32.to_radians(),
        }
    }
}

impl FlyCamera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Apply one frame of held camera input.
    pub fn apply(&mut self, motion: &CameraMotion, dt: f32) {
        if motion.is_idle() {
            return;
        }
        let step = self.speed * dt;
        self.position += self.right() * motion.translate.x * step
            + Vec3::Y * motion.translate.y * step
            + self.forward() * motion.translate.z * step;

        let turn = self.turn_rate * dt;
        self.yaw += motion.yaw * turn;
        self.pitch += motion.pitch * turn;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Mouse wheel: positive `delta` zooms in.
    pub fn scroll(&mut self, delta: f32) {
        self.zoom = (self.zoom - delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
