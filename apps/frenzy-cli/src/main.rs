use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use frenzy_common::SharkControls;
use frenzy_kernel::{Simulation, Tuning};
use frenzy_render::{DebugTextRenderer, RenderView, Renderer};
use frenzy_tools::SimInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frenzy-cli", about = "Headless tools for the shark frenzy simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Simulation tuning (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    tuning: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the active tuning
    Info,
    /// Run the simulation headless with constant shark input
    Simulate {
        /// Simulated seconds
        #[arg(short, long, default_value = "10")]
        seconds: f32,
        /// Step size in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Shark turn input in [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        turn: f32,
        /// Shark pitch input in [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
    },
    /// Run two simulations side by side and compare state hashes
    Determinism {
        /// Number of steps to run
        #[arg(short, long, default_value = "1000")]
        steps: u64,
    },
    /// Write the active tuning as JSON
    DumpTuning {
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn load_tuning(path: Option<&PathBuf>) -> anyhow::Result<Tuning> {
    match path {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display())),
        None => Ok(Tuning::default()),
    }
}

/// Steps needed to cover `seconds` at `dt`.
fn step_count(seconds: f32, dt: f32) -> anyhow::Result<u64> {
    if dt.is_nan() || dt <= 0.0 {
        bail!("dt must be positive, got {dt}");
    }
    if seconds < 0.0 {
        bail!("seconds must be non-negative, got {seconds}");
    }
    Ok((seconds / dt).round() as u64)
}

struct DeterminismRun {
    hash_a: u64,
    hash_b: u64,
    events: usize,
    events_match: bool,
}

fn run_determinism(tuning: &Tuning, steps: u64) -> DeterminismRun {
    let mut a = Simulation::new(tuning.clone());
    let mut b = Simulation::new(tuning.clone());
    let dt = 1.0 / 60.0;
    let mut events = 0;
    let mut events_match = true;
    for i in 0..steps {
        // Sweep the shark so both runs exercise turns and captures.
        let turn = if (i / 120) % 2 == 0 { 1.0 } else { -0.5 };
        let controls = SharkControls::new(turn, 0.0);
        a.step(dt, controls);
        b.step(dt, controls);

        let (events_a, events_b) = (a.drain_events(), b.drain_events());
        events += events_a.len();
        events_match &= events_a == events_b;
    }
    DeterminismRun {
        hash_a: a.state_hash(),
        hash_b: b.state_hash(),
        events,
        events_match,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let tuning = load_tuning(cli.tuning.as_ref())?;
    tracing::debug!("tuning: {} fish spawns", tuning.school.spawns.len());

    match cli.command {
        Commands::Info => {
            println!("frenzy-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", frenzy_render::crate_info());
            println!(
                "school: {} fish, speed={} angular={} rad/s",
                tuning.school.spawns.len(),
                tuning.school.speed,
                tuning.school.angular_speed
            );
            println!(
                "shark: awareness={} capture={} cruise={:?} alert={:?}",
                tuning.shark.awareness_radius,
                tuning.shark.capture_radius,
                tuning.shark.cruise,
                tuning.shark.alert
            );
            println!(
                "hunt: boost {}s x{}",
                tuning.hunt.boost_duration, tuning.hunt.boost_multiplier
            );
        }
        Commands::Simulate {
            seconds,
            dt,
            turn,
            pitch,
        } => {
            let steps = step_count(seconds, dt)?;
            let controls = SharkControls::new(turn, pitch).clamped();
            println!("Simulating {steps} steps of {dt}s with {controls:?}");

            let mut sim = Simulation::new(tuning);
            for _ in 0..steps {
                sim.step(dt, controls);
                for event in sim.drain_events() {
                    println!("  {event}");
                }
            }

            println!("{}", SimInspector::summary(&sim));
            print!(
                "{}",
                DebugTextRenderer::new().render(&sim, &RenderView::default())
            );
        }
        Commands::Determinism { steps } => {
            println!("Determinism check: {steps} steps");
            let run = run_determinism(&tuning, steps);
            println!("Run A: hash={:#018x}", run.hash_a);
            println!("Run B: hash={:#018x}", run.hash_b);
            println!("Events: {}", run.events);
            if run.hash_a != run.hash_b {
                bail!("state hashes diverged");
            }
            if !run.events_match {
                bail!("event streams diverged");
            }
            println!("Match: OK");
        }
        Commands::DumpTuning { out } => {
            tuning
                .save(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("wrote {}", out.display());
        }
    }

    Ok(())
}
