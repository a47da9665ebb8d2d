//! Predator/prey state machine.
//!
//! Two orthogonal pieces of state:
//! - [`Alertness`] is level-triggered and recomputed every step from the
//!   awareness sphere. It only changes the shark's gait.
//! - [`BoostState`] is driven by captures. A capture starts the boost timer;
//!   while it runs no further capture is evaluated and the whole school
//!   swims at the boost multiplier.

use crate::config::{Gait, HuntTuning, SharkTuning};
use crate::fish::School;
use crate::shark::Shark;
use frenzy_common::FishId;
use glam::Vec3;

/// Whether any fish is inside the shark's awareness sphere this step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alertness {
    #[default]
    Idle,
    Alert,
}

impl Alertness {
    pub fn sense(shark: &Shark, school: &School) -> Self {
        if school.any_overlapping(&shark.awareness_sphere()) {
            Self::Alert
        } else {
            Self::Idle
        }
    }

    pub fn gait(self, tuning: &SharkTuning) -> &Gait {
        match self {
            Self::Idle => &tuning.cruise,
            Self::Alert => &tuning.alert,
        }
    }

    /// Tail sway multiplier used by the renderer.
    pub fn sway(self) -> f32 {
        match self {
            Self::Idle => 1.0,
            Self::Alert => 3.0,
        }
    }

    pub fn is_alert(self) -> bool {
        self == Self::Alert
    }
}

/// Capture cooldown and school-wide speed boost.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BoostState {
    /// Capture detection is armed.
    #[default]
    Ready,
    /// A fish was just eaten. `remaining` is always positive.
    Boosted { remaining: f32 },
}

impl BoostState {
    pub fn is_boosted(self) -> bool {
        matches!(self, Self::Boosted { .. })
    }

    /// Seconds left on the boost timer; zero when ready.
    pub fn remaining(self) -> f32 {
        match self {
            Self::Ready => 0.0,
            Self::Boosted { remaining } => remaining,
        }
    }

    /// Count the timer down. Returns the next state and whether the boost
    /// expired during this tick.
    pub fn tick(self, dt: f32) -> (Self, bool) {
        match self {
            Self::Ready => (Self::Ready, false),
            Self::Boosted { remaining } => {
                let remaining = (remaining - dt).max(0.0);
                if remaining > 0.0 {
                    (Self::Boosted { remaining }, false)
                } else {
                    (Self::Ready, true)
                }
            }
        }
    }

    /// Multiplier applied to every active fish's movement and turn rate.
    pub fn multiplier(self, tuning: &HuntTuning) -> f32 {
        if self.is_boosted() {
            tuning.boost_multiplier
        } else {
            1.0
        }
    }
}

/// A fish eaten during one step, with where it was caught.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    pub fish: FishId,
    pub at: Vec3,
}

/// What the shark sensed during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenseOutcome {
    pub alertness: Alertness,
    pub captured: Option<Capture>,
}

/// Combined hunt state carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hunt {
    pub alertness: Alertness,
    pub boost: BoostState,
}

impl Hunt {
    /// Advance the boost timer. Returns true when the boost just ended.
    pub fn tick_boost(&mut self, dt: f32) -> bool {
        let (next, expired) = self.boost.tick(dt);
        self.boost = next;
        expired
    }

    /// Recompute alertness and, when armed, capture at most one fish.
    pub fn sense(&mut self, shark: &Shark, school: &mut School, tuning: &HuntTuning) -> SenseOutcome {
        self.alertness = Alertness::sense(shark, school);

        let mut captured = None;
        if self.boost == BoostState::Ready {
            let hit = school
                .first_overlapping(&shark.capture_sphere())
                .map(|(fish, f)| Capture { fish, at: f.position });
            if let Some(capture) = hit {
                school.deactivate(capture.fish);
                self.boost = BoostState::Boosted {
                    remaining: tuning.boost_duration,
                };
                captured = Some(capture);
            }
        }

        SenseOutcome {
            alertness: self.alertness,
            captured,
        }
    }
}
