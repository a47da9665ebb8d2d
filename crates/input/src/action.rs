use frenzy_common::SharkControls;
use glam::Vec3;
use std::collections::BTreeSet;

/// A logical, held-while-pressed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    CameraForward,
    CameraBackward,
    CameraLeft,
    CameraRight,
    CameraUp,
    CameraDown,
    CameraPitchUp,
    CameraPitchDown,
    CameraYawLeft,
    CameraYawRight,
    SharkTurnLeft,
    SharkTurnRight,
    SharkPitchUp,
    SharkPitchDown,
}

/// Camera motion requested this frame, in the camera's local axes.
///
/// `translate` is (right, up, forward) in `[-1, 1]`; `yaw` and `pitch` are
/// in `[-1, 1]` too.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraMotion {
    pub translate: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraMotion {
    pub fn is_idle(&self) -> bool {
        self.translate == Vec3::ZERO && self.yaw == 0.0 && self.pitch == 0.0
    }
}

/// Set of actions currently held down.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    held: BTreeSet<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            tracing::trace!("pressed {:?}", action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    /// Drop every held action, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// +1 if only `positive` is held, -1 if only `negative`, else 0.
    fn axis(&self, negative: Action, positive: Action) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    pub fn shark_controls(&self) -> SharkControls {
        SharkControls::new(
            self.axis(Action::SharkTurnLeft, Action::SharkTurnRight),
            self.axis(Action::SharkPitchDown, Action::SharkPitchUp),
        )
    }

    pub fn camera_motion(&self) -> CameraMotion {
        CameraMotion {
            translate: Vec3::new(
                self.axis(Action::CameraLeft, Action::CameraRight),
                self.axis(Action::CameraDown, Action::CameraUp),
                self.axis(Action::CameraBackward, Action::CameraForward),
            ),
            yaw: self.axis(Action::CameraYawLeft, Action::CameraYawRight),
            pitch: self.axis(Action::CameraPitchDown, Action::CameraPitchUp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_idle() {
        let state = ActionState::new();
        assert_eq!(state.shark_controls(), SharkControls::NONE);
        assert!(state.camera_motion().is_idle());
    }

    #[test]
    fn shark_axes() {
        let mut state = ActionState::new();
        state.press(Action::SharkTurnRight);
        state.press(Action::SharkPitchDown);
        assert_eq!(state.shark_controls(), SharkControls::new(1.0, -1.0));

        state.press(Action::SharkTurnLeft);
        assert_eq!(state.shark_controls().turn, 0.0);

        state.release(Action::SharkTurnRight);
        assert_eq!(state.shark_controls().turn, -1.0);
    }

    #[test]
    fn camera_axes() {
        let mut state = ActionState::new();
        state.set(Action::CameraForward, true);
        state.set(Action::CameraUp, true);
        state.set(Action::CameraYawLeft, true);
        let motion = state.camera_motion();
        assert_eq!(motion.translate, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(motion.yaw, -1.0);
        assert_eq!(motion.pitch, 0.0);

        state.set(Action::CameraForward, false);
        assert_eq!(state.camera_motion().translate.z, 0.0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut state = ActionState::new();
        state.press(Action::SharkPitchUp);
        state.press(Action::CameraDown);
        state.clear();
        assert!(!state.is_held(Action::SharkPitchUp));
        assert!(state.camera_motion().is_idle());
    }
}
