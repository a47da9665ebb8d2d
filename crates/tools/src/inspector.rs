use frenzy_common::FishId;
use frenzy_kernel::{Alertness, Simulation};
use glam::Vec3;

/// Simulation inspector for developer tooling.
///
/// Provides read-only queries for the desktop HUD and the CLI.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let shark = sim.shark();
        let hunt = sim.hunt();
        SimSummary {
            tick: sim.tick(),
            elapsed: sim.elapsed(),
            fish_alive: sim.school().alive_count(),
            fish_total: sim.school().len(),
            alertness: hunt.alertness,
            boost_remaining: hunt.boost.remaining(),
            shark_position: shark.position,
            shark_heading_deg: shark.heading.to_degrees(),
            shark_pitch_deg: shark.pitch.to_degrees(),
            shark_speed: shark.speed,
            pending_events: sim.events().len(),
        }
    }

    /// Details of one fish, eaten or not.
    pub fn inspect_fish(sim: &Simulation, id: FishId) -> Option<FishInfo> {
        let shark = sim.shark().position;
        sim.school().get(id).map(|fish| FishInfo {
            id,
            active: fish.is_active(),
            position: fish.position,
            scale: fish.scale,
            orbit_radius: fish.radius,
            speed: fish.current_speed(sim.fish_multiplier()),
            distance_to_shark: fish.position.distance(shark),
        })
    }

    /// Every fish in id order.
    pub fn list_fish(sim: &Simulation) -> Vec<FishInfo> {
        sim.school()
            .iter()
            .filter_map(|(id, _)| Self::inspect_fish(sim, id))
            .collect()
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone)]
pub struct SimSummary {
    pub tick: u64,
    pub elapsed: f32,
    pub fish_alive: usize,
    pub fish_total: usize,
    pub alertness: Alertness,
    pub boost_remaining: f32,
    pub shark_position: Vec3,
    pub shark_heading_deg: f32,
    pub shark_pitch_deg: f32,
    pub shark_speed: f32,
    pub pending_events: usize,
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim: tick={} t={:.2}s fish={}/{} {:?} boost={:.2}s shark=({:.2}, {:.2}, {:.2}) heading={:.1} pitch={:.1}",
            self.tick,
            self.elapsed,
            self.fish_alive,
            self.fish_total,
            self.alertness,
            self.boost_remaining,
            self.shark_position.x,
            self.shark_position.y,
            self.shark_position.z,
            self.shark_heading_deg,
            self.shark_pitch_deg,
        )
    }
}

/// Detailed info about a single fish.
#[derive(Debug, Clone)]
pub struct FishInfo {
    pub id: FishId,
    pub active: bool,
    pub position: Vec3,
    pub scale: Vec3,
    pub orbit_radius: f32,
    pub speed: f32,
    pub distance_to_shark: f32,
}

impl std::fmt::Display for FishInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pos=({:.2}, {:.2}, {:.2}) r={:.2} dist={:.2}{}",
            self.id,
            self.position.x,
            self.position.y,
            self.position.z,
            self.orbit_radius,
            self.distance_to_shark,
            if self.active { "" } else { " [eaten]" },
        )
    }
}
