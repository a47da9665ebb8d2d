use crate::config::{Gait, SharkTuning};
use frenzy_common::{BoundingSphere, SharkControls};
use glam::Vec3;

/// The player-steered shark.
///
/// Angles are stored in radians. Heading is measured in the XZ plane from
/// +X towards +Z; positive pitch points the nose up.
#[derive(Debug, Clone, PartialEq)]
pub struct Shark {
    pub position: Vec3,
    pub heading: f32,
    pub pitch: f32,
    pub speed: f32,
    /// Horizontal turn rate, radians per second.
    pub turn_speed: f32,
    awareness: BoundingSphere,
    capture: BoundingSphere,
}

impl Shark {
    pub fn new(tuning: &SharkTuning) -> Self {
        Self {
            position: tuning.position,
            heading: tuning.heading_deg.to_radians(),
            pitch: tuning.pitch_deg.to_radians(),
            speed: tuning.cruise.speed,
            turn_speed: tuning.cruise.turn_speed_deg.to_radians(),
            awareness: BoundingSphere::new(tuning.position, tuning.awareness_radius),
            capture: BoundingSphere::new(tuning.position, tuning.capture_radius),
        }
    }

    /// Wide sphere that puts the shark on alert.
    pub fn awareness_sphere(&self) -> BoundingSphere {
        self.awareness
    }

    /// Narrow sphere that decides captures.
    pub fn capture_sphere(&self) -> BoundingSphere {
        self.capture
    }

    /// Apply steering input at the current turn rate. Pitch always ends up
    /// inside the configured bounds, whatever the input.
    pub fn steer(&mut self, controls: SharkControls, dt: f32, tuning: &SharkTuning) {
        let controls = controls.clamped();
        self.heading += controls.turn * self.turn_speed * dt;
        self.pitch += controls.pitch * tuning.vertical_turn_speed_deg.to_radians() * dt;
        self.clamp_pitch(tuning);
    }

    pub fn clamp_pitch(&mut self, tuning: &SharkTuning) {
        self.pitch = self.pitch.clamp(
            tuning.min_pitch_deg.to_radians(),
            tuning.max_pitch_deg.to_radians(),
        );
    }

    pub fn set_gait(&mut self, gait: &Gait) {
        self.speed = gait.speed;
        self.turn_speed = gait.turn_speed_deg.to_radians();
    }

    /// Unit swim direction from heading and pitch.
    pub fn direction(&self, tuning: &SharkTuning) -> Vec3 {
        let (sin_h, cos_h) = self.heading.sin_cos();
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let vertical = tuning.max_vertical_component;
        Vec3::new(
            cos_h * cos_p,
            sin_p.clamp(-vertical, vertical),
            sin_h * cos_p,
        )
        .normalize()
    }

    /// Integrate position for `dt` seconds and re-center both spheres.
    ///
    /// Below the floor the nose is lifted over time until the shark climbs
    /// out; the height itself never goes under the floor.
    pub fn swim(&mut self, dt: f32, tuning: &SharkTuning) {
        let direction = self.direction(tuning);

        if self.position.y < tuning.floor_height {
            self.pitch = (self.pitch + tuning.vertical_turn_speed_deg.to_radians() * dt)
                .clamp(0.0, tuning.max_climb_pitch_deg.to_radians());
        }

        self.position += direction * self.speed * dt;
        self.position.y = self.position.y.max(tuning.floor_height);

        self.awareness = self.awareness.recentered(self.position);
        self.capture = self.capture.recentered(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_shark_uses_cruise_gait() {
        let t = SharkTuning::default();
        let shark = Shark::new(&t);
        assert_relative_eq!(shark.speed, 0.4);
        assert_relative_eq!(shark.heading.to_degrees(), -60.0, epsilon = 1e-4);
        assert_eq!(shark.awareness_sphere().center, t.position);
        assert_eq!(shark.capture_sphere().radius, 2.0);
    }

    #[test]
    fn pitch_never_exceeds_bound() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        for _ in 0..10_000 {
            shark.steer(SharkControls::new(0.0, 50.0), 0.1, &t);
            assert!(shark.pitch.to_degrees() <= t.max_pitch_deg + 1e-4);
        }
        assert_relative_eq!(shark.pitch.to_degrees(), 30.0, epsilon = 1e-4);

        for _ in 0..10_000 {
            shark.steer(SharkControls::new(0.0, -1.0), 0.1, &t);
        }
        assert_relative_eq!(shark.pitch.to_degrees(), -30.0, epsilon = 1e-4);
    }

    #[test]
    fn out_of_range_pitch_is_clamped_on_next_steer() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        shark.pitch = 95.0_f32.to_radians();
        shark.steer(SharkControls::NONE, 0.016, &t);
        assert_relative_eq!(shark.pitch.to_degrees(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn turning_uses_current_turn_speed() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        let start = shark.heading;
        shark.steer(SharkControls::new(1.0, 0.0), 1.0, &t);
        assert_relative_eq!((shark.heading - start).to_degrees(), 10.0, epsilon = 1e-3);

        shark.set_gait(&t.alert);
        let start = shark.heading;
        shark.steer(SharkControls::new(-1.0, 0.0), 1.0, &t);
        assert_relative_eq!((shark.heading - start).to_degrees(), -20.0, epsilon = 1e-3);
    }

    #[test]
    fn direction_is_unit_and_vertical_is_limited() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        shark.pitch = 80.0_f32.to_radians();
        let dir = shark.direction(&t);
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-5);
        // Horizontal part of cos(80) vs a vertical part limited to 0.5.
        let horizontal = 80.0_f32.to_radians().cos();
        assert_relative_eq!(dir.y, 0.5 / (0.25 + horizontal * horizontal).sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn swim_moves_along_direction_and_recenters_spheres() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        let start = shark.position;
        let dir = shark.direction(&t);
        shark.swim(2.0, &t);
        assert!((shark.position - (start + dir * 0.8)).length() < 1e-5);
        assert_eq!(shark.awareness_sphere().center, shark.position);
        assert_eq!(shark.capture_sphere().center, shark.position);
    }

    #[test]
    fn floor_clamps_height_and_lifts_nose() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        shark.position.y = -1.5;
        shark.pitch = -20.0_f32.to_radians();
        shark.swim(0.5, &t);
        assert_relative_eq!(shark.position.y, t.floor_height);
        // Nudged upward and clamped into [0, max_climb].
        assert_relative_eq!(shark.pitch, 0.0);

        for _ in 0..1_000 {
            shark.pitch = -20.0_f32.to_radians();
            shark.swim(0.5, &t);
            assert!(shark.position.y >= t.floor_height);
        }
    }

    #[test]
    fn climb_pitch_rises_while_below_floor() {
        let t = SharkTuning::default();
        let mut shark = Shark::new(&t);
        shark.position.y = -3.0;
        shark.pitch = 0.0;
        shark.swim(1.0, &t);
        assert_relative_eq!(shark.pitch.to_degrees(), 5.0, epsilon = 1e-4);
    }
}
