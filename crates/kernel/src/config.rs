//! Simulation tuning. Defaults reproduce the stock scene; any field can be
//! overridden from a JSON file.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating tuning files.
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Top-level simulation tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub school: SchoolTuning,
    pub shark: SharkTuning,
    pub hunt: HuntTuning,
}

/// Initial placement of one fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishSpawn {
    pub position: Vec3,
    pub scale: Vec3,
}

impl FishSpawn {
    pub const fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolTuning {
    /// Horizontal center every fish orbits around. Only x and z are used;
    /// each fish keeps the height it spawned at.
    pub orbit_center: Vec3,
    pub speed: f32,
    /// Radians per second.
    pub angular_speed: f32,
    /// Bounding sphere radius as a fraction of the largest scale axis.
    pub sphere_factor: f32,
    pub spawns: Vec<FishSpawn>,
}

impl Default for SchoolTuning {
    fn default() -> Self {
        Self {
            orbit_center: Vec3::ZERO,
            speed: 0.3,
            angular_speed: 0.1,
            sphere_factor: 0.8,
            spawns: default_spawns(),
        }
    }
}

fn default_spawns() -> Vec<FishSpawn> {
    const PLACEMENTS: [([f32; 3], [f32; 3]); 10] = [
        ([-2.0, 3.0, -16.0], [0.3, 0.2, 0.2]),
        ([1.0, 4.0, -12.0], [0.3, 0.2, 0.2]),
        ([-2.0, 1.0, -11.0], [0.35, 0.15, 0.15]),
        ([0.5, 2.5, -13.5], [0.4, 0.2, 0.2]),
        ([-1.5, 2.4, -12.5], [0.4, 0.3, 0.3]),
        ([-1.5, 5.0, -14.5], [0.5, 0.4, 0.4]),
        ([-2.5, 1.7, -10.0], [0.3, 0.2, 0.2]),
        ([-1.0, 3.5, -13.0], [0.4, 0.3, 0.3]),
        ([2.0, 4.2, -15.5], [0.3, 0.3, 0.3]),
        ([-1.0, 2.0, -10.5], [0.3, 0.3, 0.3]),
    ];
    PLACEMENTS
        .iter()
        .map(|(p, s)| FishSpawn::new(Vec3::from_array(*p), Vec3::from_array(*s)))
        .collect()
}

/// Shark speed and horizontal turn rate for one alertness level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gait {
    pub speed: f32,
    /// Degrees per second.
    pub turn_speed_deg: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharkTuning {
    pub position: Vec3,
    pub heading_deg: f32,
    pub pitch_deg: f32,
    pub min_pitch_deg: f32,
    pub max_pitch_deg: f32,
    /// Degrees per second, used for pitch input and the floor climb.
    pub vertical_turn_speed_deg: f32,
    /// Upper pitch bound while climbing back above the floor.
    pub max_climb_pitch_deg: f32,
    /// Bound on the vertical component of the swim direction.
    pub max_vertical_component: f32,
    pub floor_height: f32,
    pub awareness_radius: f32,
    pub capture_radius: f32,
    pub cruise: Gait,
    pub alert: Gait,
}

impl Default for SharkTuning {
    fn default() -> Self {
        Self {
            position: Vec3::new(-10.0, 2.0, 10.0),
            heading_deg: -60.0,
            pitch_deg: 10.0,
            min_pitch_deg: -30.0,
            max_pitch_deg: 30.0,
            vertical_turn_speed_deg: 5.0,
            max_climb_pitch_deg: 30.0,
            max_vertical_component: 0.5,
            floor_height: -1.0,
            awareness_radius: 12.0,
            capture_radius: 2.0,
            cruise: Gait {
                speed: 0.4,
                turn_speed_deg: 10.0,
            },
            alert: Gait {
                speed: 1.0,
                turn_speed_deg: 20.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntTuning {
    /// Seconds the school stays boosted after a capture.
    pub boost_duration: f32,
    pub boost_multiplier: f32,
}

impl Default for HuntTuning {
    fn default() -> Self {
        Self {
            boost_duration: 4.0,
            boost_multiplier: 3.5,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let file = std::fs::File::open(path.as_ref())?;
        let tuning: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        tuning.validate()?;
        tracing::debug!("loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Write tuning as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject values the simulation cannot honor.
    pub fn validate(&self) -> Result<(), TuningError> {
        let shark = &self.shark;
        non_negative("shark.awareness_radius", shark.awareness_radius)?;
        non_negative("shark.capture_radius", shark.capture_radius)?;
        non_negative("shark.max_vertical_component", shark.max_vertical_component)?;
        non_negative("shark.max_climb_pitch_deg", shark.max_climb_pitch_deg)?;
        non_negative("shark.vertical_turn_speed_deg", shark.vertical_turn_speed_deg)?;
        non_negative("shark.cruise.speed", shark.cruise.speed)?;
        non_negative("shark.cruise.turn_speed_deg", shark.cruise.turn_speed_deg)?;
        non_negative("shark.alert.speed", shark.alert.speed)?;
        non_negative("shark.alert.turn_speed_deg", shark.alert.turn_speed_deg)?;
        if shark.min_pitch_deg > shark.max_pitch_deg {
            return Err(TuningError::Invalid(format!(
                "min_pitch_deg {} exceeds max_pitch_deg {}",
                shark.min_pitch_deg, shark.max_pitch_deg
            )));
        }
        if !(-90.0..=90.0).contains(&shark.min_pitch_deg)
            || !(-90.0..=90.0).contains(&shark.max_pitch_deg)
        {
            return Err(TuningError::Invalid(
                "pitch bounds must stay within [-90, 90] degrees".into(),
            ));
        }
        if self.hunt.boost_duration.is_nan() || self.hunt.boost_duration <= 0.0 {
            return Err(TuningError::Invalid(
                "boost_duration must be positive".into(),
            ));
        }
        non_negative("hunt.boost_multiplier", self.hunt.boost_multiplier)?;
        non_negative("school.sphere_factor", self.school.sphere_factor)?;
        Ok(())
    }
}

/// NaN fails too.
fn non_negative(field: &str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid(format!(
            "{field} must be non-negative, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let t = Tuning::default();
        assert!(t.validate().is_ok());
        assert_eq!(t.school.spawns.len(), 10);
        assert_eq!(t.hunt.boost_duration, 4.0);
        assert_eq!(t.shark.capture_radius, 2.0);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "hunt": {{ "boost_duration": 2.5 }} }}"#).unwrap();

        let t = Tuning::load(tmp.path()).unwrap();
        assert_eq!(t.hunt.boost_duration, 2.5);
        assert_eq!(t.hunt.boost_multiplier, 3.5);
        assert_eq!(t.shark, SharkTuning::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut t = Tuning::default();
        t.shark.awareness_radius = 6.0;
        t.save(tmp.path()).unwrap();

        let loaded = Tuning::load(tmp.path()).unwrap();
        assert_eq!(loaded, t);
    }

    #[test]
    fn rejects_inverted_pitch_bounds() {
        let mut t = Tuning::default();
        t.shark.min_pitch_deg = 40.0;
        assert!(matches!(t.validate(), Err(TuningError::Invalid(_))));
    }

    #[test]
    fn rejects_non_positive_boost() {
        let mut t = Tuning::default();
        t.hunt.boost_duration = 0.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_negative_clamp_bounds() {
        let mut t = Tuning::default();
        t.shark.max_vertical_component = -0.5;
        assert!(matches!(t.validate(), Err(TuningError::Invalid(m)) if m.contains("max_vertical_component")));

        let mut t = Tuning::default();
        t.shark.max_climb_pitch_deg = -10.0;
        assert!(matches!(t.validate(), Err(TuningError::Invalid(m)) if m.contains("max_climb_pitch_deg")));
    }

    #[test]
    fn rejects_negative_or_nan_gaits() {
        let mut t = Tuning::default();
        t.shark.cruise.speed = -0.4;
        assert!(t.validate().is_err());

        let mut t = Tuning::default();
        t.shark.alert.speed = f32::NAN;
        assert!(t.validate().is_err());

        let mut t = Tuning::default();
        t.shark.alert.turn_speed_deg = -1.0;
        assert!(t.validate().is_err());

        let mut t = Tuning::default();
        t.shark.vertical_turn_speed_deg = -5.0;
        assert!(t.validate().is_err());

        // A parked shark is allowed.
        let mut t = Tuning::default();
        t.shark.cruise.speed = 0.0;
        t.shark.alert.speed = 0.0;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn load_rejects_files_that_would_break_steering() {
        for body in [
            r#"{ "shark": { "max_vertical_component": -0.5 } }"#,
            r#"{ "shark": { "max_climb_pitch_deg": -10, "position": [0, -5, 0] } }"#,
            r#"{ "hunt": { "boost_duration": 0 } }"#,
        ] {
            let mut tmp = tempfile::NamedTempFile::new().unwrap();
            write!(tmp, "{body}").unwrap();
            assert!(
                matches!(Tuning::load(tmp.path()), Err(TuningError::Invalid(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        assert!(matches!(
            Tuning::load(tmp.path()),
            Err(TuningError::Json(_))
        ));
    }
}
