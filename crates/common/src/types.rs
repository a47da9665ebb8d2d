use serde::{Deserialize, Serialize};

/// Stable handle to a fish in the school arena.
///
/// Handles are indices that are never reused: an eaten fish keeps its slot,
/// so a `FishId` stays valid for the lifetime of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FishId(pub usize);

impl FishId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FishId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fish#{}", self.0)
    }
}

/// Per-step steering input for the shark.
///
/// Both axes are in `[-1, 1]`: `turn` is negative for left and positive for
/// right, `pitch` is positive for nose-up. Values outside the range are
/// clamped when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SharkControls {
    pub turn: f32,
    pub pitch: f32,
}

impl SharkControls {
    pub const NONE: Self = Self {
        turn: 0.0,
        pitch: 0.0,
    };

    pub fn new(turn: f32, pitch: f32) -> Self {
        Self { turn, pitch }
    }

    /// Controls with both axes clamped into `[-1, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            turn: self.turn.clamp(-1.0, 1.0),
            pitch: self.pitch.clamp(-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fish_id_is_ordered_by_index() {
        assert!(FishId(1) < FishId(2));
        assert_eq!(FishId(7).index(), 7);
        assert_eq!(FishId(3).to_string(), "fish#3");
    }

    #[test]
    fn controls_clamp_each_axis() {
        let c = SharkControls::new(4.0, -9.0).clamped();
        assert_eq!(c, SharkControls::new(1.0, -1.0));
        assert_eq!(SharkControls::default(), SharkControls::NONE);
    }
}
