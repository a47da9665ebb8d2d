use crate::config::Tuning;
use crate::fish::School;
use crate::hunt::{Alertness, BoostState, Capture, Hunt};
use crate::shark::Shark;
use frenzy_common::{FishId, SharkControls};
use glam::Vec3;

/// Notable transitions recorded while stepping.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A fish was caught at the given position.
    FishEaten { tick: u64, fish: FishId, at: Vec3 },
    /// The post-capture boost ran out; capture is armed again.
    BoostExpired { tick: u64 },
    /// A fish entered the awareness sphere.
    AlertRaised { tick: u64 },
    /// No fish left in the awareness sphere.
    AlertCleared { tick: u64 },
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimEvent::FishEaten { tick, fish, at } => write!(
                f,
                "tick {tick}: {fish} eaten at ({:.2}, {:.2}, {:.2})",
                at.x, at.y, at.z
            ),
            SimEvent::BoostExpired { tick } => write!(f, "tick {tick}: boost expired"),
            SimEvent::AlertRaised { tick } => write!(f, "tick {tick}: shark alerted"),
            SimEvent::AlertCleared { tick } => write!(f, "tick {tick}: shark calmed"),
        }
    }
}

/// Oldest events are dropped once the log holds this many.
pub const MAX_EVENTS: usize = 1024;

/// Result of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub alertness: Alertness,
    pub captured: Option<FishId>,
    pub boost_expired: bool,
    pub boost: BoostState,
}

/// The whole scene state, advanced once per frame.
///
/// All mutations happen through [`Simulation::step`]. Two simulations built
/// from the same tuning and fed the same steps stay identical, which
/// [`Simulation::state_hash`] can verify.
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    school: School,
    shark: Shark,
    hunt: Hunt,
    tick: u64,
    elapsed: f32,
    /// Drained by the host; bounded by [`MAX_EVENTS`].
    events: Vec<SimEvent>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Simulation {
    /// Build the scene from `tuning`, which must pass [`Tuning::validate`].
    /// [`Tuning::load`] already guarantees that.
    pub fn new(tuning: Tuning) -> Self {
        debug_assert!(
            tuning.validate().is_ok(),
            "invalid tuning: {:?}",
            tuning.validate()
        );
        let school = School::from_tuning(&tuning.school);
        let shark = Shark::new(&tuning.shark);
        tracing::debug!("simulation created with {} fish", school.len());
        Self {
            tuning,
            school,
            shark,
            hunt: Hunt::default(),
            tick: 0,
            elapsed: 0.0,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn school(&self) -> &School {
        &self.school
    }

    pub fn shark(&self) -> &Shark {
        &self.shark
    }

    pub fn hunt(&self) -> Hunt {
        self.hunt
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since creation.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Multiplier currently applied to the school.
    pub fn fish_multiplier(&self) -> f32 {
        self.hunt.boost.multiplier(&self.tuning.hunt)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Order: steer the shark, tick the boost timer, move the school, sense
    /// (alert and capture), pick the gait, then move the shark.
    pub fn step(&mut self, dt: f32, controls: SharkControls) -> StepReport {
        let dt = dt.max(0.0);
        self.tick += 1;
        self.elapsed += dt;

        self.shark.steer(controls, dt, &self.tuning.shark);

        let boost_expired = self.hunt.tick_boost(dt);
        if boost_expired {
            tracing::debug!("boost expired at tick {}", self.tick);
            self.record(SimEvent::BoostExpired { tick: self.tick });
        }

        let tuning = &self.tuning;
        let multiplier = self.hunt.boost.multiplier(&tuning.hunt);
        self.school
            .advance(dt, multiplier, tuning.school.sphere_factor);

        let previous = self.hunt.alertness;
        let outcome = self.hunt.sense(&self.shark, &mut self.school, &tuning.hunt);
        if outcome.alertness != previous {
            tracing::debug!("shark alertness {:?} -> {:?}", previous, outcome.alertness);
            let tick = self.tick;
            self.record(match outcome.alertness {
                Alertness::Alert => SimEvent::AlertRaised { tick },
                Alertness::Idle => SimEvent::AlertCleared { tick },
            });
        }
        if let Some(Capture { fish, at }) = outcome.captured {
            tracing::info!(
                "{fish} eaten at ({:.2}, {:.2}, {:.2}); {} left",
                at.x,
                at.y,
                at.z,
                self.school.alive_count()
            );
            self.record(SimEvent::FishEaten {
                tick: self.tick,
                fish,
                at,
            });
        }

        let tuning = &self.tuning;
        self.shark.set_gait(outcome.alertness.gait(&tuning.shark));
        self.shark.swim(dt, &tuning.shark);

        StepReport {
            alertness: outcome.alertness,
            captured: outcome.captured.map(|c| c.fish),
            boost_expired,
            boost: self.hunt.boost,
        }
    }

    fn record(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_EVENTS {
            let excess = self.events.len() + 1 - MAX_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Deterministic FNV-1a hash over the full entity state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            for c in v.to_array() {
                mix(h, &c.to_le_bytes());
            }
        };

        mix(&mut h, &self.tick.to_le_bytes());
        mix_vec(&mut h, self.shark.position);
        mix(&mut h, &self.shark.heading.to_le_bytes());
        mix(&mut h, &self.shark.pitch.to_le_bytes());
        mix(&mut h, &self.hunt.boost.remaining().to_le_bytes());
        for (id, fish) in self.school.iter() {
            mix(&mut h, &(id.index() as u64).to_le_bytes());
            mix(&mut h, &[fish.is_active() as u8]);
            mix_vec(&mut h, fish.position);
            mix(&mut h, &fish.angle.to_le_bytes());
        }
        h
    }
}
