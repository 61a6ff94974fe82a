//! Bouncing Balls
//!
//! Headless host for the ball simulation: owns the frame loop, paces it and
//! logs what a renderer would draw.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use balls_physics::{BALL_COUNT, FPS, PARALLEL_THRESHOLD};
use balls_simulation::{PartitionStrategy, Simulation, SimulationParams};
use clap::Parser;

/// How many frame times the FPS readout averages over
const FRAME_WINDOW: usize = 120;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of balls
    #[arg(short = 'n', long, default_value_t = BALL_COUNT)]
    balls: usize,

    /// Frames to simulate before exiting
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Simulation rate; the timestep is 1 / fps
    #[arg(long, default_value_t = FPS)]
    fps: u32,

    /// RNG seed for reproducible runs (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Collision partitioning: `greedy` or `round-robin`
    #[arg(long, default_value_t = PartitionStrategy::Greedy)]
    strategy: PartitionStrategy,

    /// Cells with fewer pairs than this run on the main thread
    #[arg(long, default_value_t = PARALLEL_THRESHOLD)]
    parallel_threshold: usize,

    /// Sleep between frames to run at wall-clock speed
    #[arg(long)]
    realtime: bool,
}

impl Args {
    fn params(&self) -> Result<SimulationParams> {
        if self.balls == 0 {
            bail!("need at least one ball");
        }
        if self.fps == 0 {
            bail!("fps must be positive");
        }

        let params = SimulationParams {
            ball_count: self.balls,
            seed: self.seed,
            timestep: 1.0 / self.fps as f64,
            partition_strategy: self.strategy,
            parallel_threshold: self.parallel_threshold,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;

    log::info!("Starting bouncing balls simulation...");
    let mut simulation = Simulation::new(params)?;
    log::info!(
        "✓ {} balls, {} collision cells ({} strategy)",
        simulation.bodies().len(),
        simulation.partition().len(),
        params.partition_strategy
    );

    let instances = simulation.store().instances();
    log::debug!("  First 10 balls:");
    for (i, instance) in instances.iter().take(10).enumerate() {
        log::debug!(
            "    [{}] pos=({:.3}, {:.3}) r={:.3} color={:?}",
            i,
            instance.position[0],
            instance.position[1],
            instance.radius,
            instance.color
        );
    }

    let frame_budget = Duration::from_secs_f64(params.timestep);
    let mut frame_times: VecDeque<f32> = VecDeque::with_capacity(FRAME_WINDOW);
    let mut contacts_since_report = 0usize;
    let initial_energy = simulation.kinetic_energy() + simulation.potential_energy();

    for _ in 0..args.frames {
        let frame_start = Instant::now();

        let stats = simulation.step();
        contacts_since_report += stats.contacts;

        // Stand-in for the renderer: take the snapshot it would upload
        let instances = simulation.store().instances();
        debug_assert_eq!(instances.len(), simulation.bodies().len());

        let frame_time = frame_start.elapsed();
        if frame_times.len() == FRAME_WINDOW {
            frame_times.pop_front();
        }
        frame_times.push_back(frame_time.as_secs_f32());

        if simulation.frame() % args.fps as u64 == 0 {
            let avg = frame_times.iter().sum::<f32>() / frame_times.len() as f32;
            let energy = simulation.kinetic_energy() + simulation.potential_energy();
            log::info!(
                "t={:.1}s frame={} contacts={} energy={:.4} J (drift {:+.2e}) step={:.3} ms",
                simulation.elapsed(),
                simulation.frame(),
                contacts_since_report,
                energy,
                energy - initial_energy,
                avg * 1000.0
            );
            contacts_since_report = 0;
        }

        if args.realtime {
            if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    log::info!(
        "Done after {} frames ({:.2} s simulated)",
        simulation.frame(),
        simulation.elapsed()
    );
    Ok(())
}
