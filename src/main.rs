use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use signal_timing::optimizer::{self, topology_from_counts, GaConfig, OptimizationResult};
use signal_timing::simulation::{self, build_network, Network, NetworkDescriptor, SimConfig};

#[derive(Parser)]
#[command(name = "signal_timing")]
#[command(about = "Traffic-light simulation and green-time optimization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one simulation of a network and print per-lane statistics
    Simulate {
        #[command(flatten)]
        network: NetworkArgs,

        #[command(flatten)]
        timing: TimingArgs,

        /// Seed for arrival sampling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search for green times minimizing the worst per-lane average wait
    Optimize {
        #[command(flatten)]
        network: NetworkArgs,

        #[command(flatten)]
        timing: TimingArgs,

        #[command(flatten)]
        ga: GaArgs,
    },
    /// Optimize a two-signal controller from detected vehicle counts
    Counts {
        /// Zone count as NAME=COUNT, repeatable
        #[arg(long = "zone", value_parser = parse_zone, required = true)]
        zones: Vec<(String, u32)>,

        /// Master seed for the genetic search
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct NetworkArgs {
    /// JSON network descriptor; the built-in two-lane demo when omitted
    #[arg(long)]
    network: Option<PathBuf>,
}

#[derive(Args)]
struct TimingArgs {
    /// Simulated time horizon in seconds
    #[arg(long, default_value = "3600")]
    horizon: f64,

    /// Driver reaction time in seconds
    #[arg(long, default_value = "4.1")]
    reaction: f64,

    /// Intersection crossing time in seconds
    #[arg(long, default_value = "3.4")]
    crossing: f64,
}

#[derive(Args)]
struct GaArgs {
    #[arg(long, default_value = "30")]
    pop_size: usize,

    #[arg(long, default_value = "5")]
    generations: usize,

    #[arg(long, default_value = "0.05")]
    mutation_rate: f64,

    /// Maximum summed green time per intersection in seconds
    #[arg(long, default_value = "120")]
    cycle_limit: f64,

    /// Master seed for the genetic search
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_zone(text: &str) -> std::result::Result<(String, u32), String> {
    let (name, count) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=COUNT, got '{}'", text))?;
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid count in '{}': {}", text, e))?;
    Ok((name.trim().to_string(), count))
}

impl TimingArgs {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            horizon: self.horizon,
            reaction_time: self.reaction,
            crossing_time: self.crossing,
            ..SimConfig::default()
        }
    }
}

fn load_network(args: &NetworkArgs) -> Result<Network> {
    let descriptor = match &args.network {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read network file {}", path.display()))?;
            NetworkDescriptor::from_json(&text)
                .with_context(|| format!("Failed to parse network file {}", path.display()))?
        }
        None => {
            info!("No network file given, using the two-lane demo");
            NetworkDescriptor::two_lane_demo()
        }
    };
    build_network(&descriptor).context("Invalid network descriptor")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,signal_timing=info"),
    )
    .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            network,
            timing,
            seed,
        } => run_simulation(&load_network(&network)?, &timing.sim_config(), seed),
        Command::Optimize { network, timing, ga } => {
            let network = load_network(&network)?;
            let config = GaConfig {
                pop_size: ga.pop_size,
                generations: ga.generations,
                mutation_rate: ga.mutation_rate,
                cycle_limit: ga.cycle_limit,
                simulation: timing.sim_config(),
                seed: ga.seed,
            };
            run_optimizer(&network.topology(), &config).map(|_| ())
        }
        Command::Counts { zones, seed } => {
            let topology = topology_from_counts(&zones).context("Invalid zone counts")?;
            let config = GaConfig {
                seed,
                ..GaConfig::controller()
            };
            let result = run_optimizer(&topology, &config)?;
            println!("Relay: {}", result.relay_line());
            Ok(())
        }
    }
}

/// Run a single simulation and print the per-lane report
fn run_simulation(network: &Network, config: &SimConfig, seed: Option<u64>) -> Result<()> {
    println!(
        "Simulating {} lanes for {:.0}s (reaction {}s, crossing {}s)",
        network.len(),
        config.horizon,
        config.reaction_time,
        config.crossing_time
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let report = simulation::simulate(network, config, &mut rng).context("Simulation failed")?;

    println!("=== Simulation Report ===");
    for lane in network.lanes() {
        println!(
            "{}: avg wait {:.2}s, passed {}, queued {}",
            lane.name,
            report.avg_wait.get(&lane.name).copied().unwrap_or(0.0),
            report.passed.get(&lane.name).copied().unwrap_or(0),
            report.queued.get(&lane.name).copied().unwrap_or(0)
        );
    }
    println!("Events processed: {}", report.events_processed);
    Ok(())
}

/// Run the genetic search and print the best timing found
fn run_optimizer(
    topology: &simulation::LaneTopology,
    config: &GaConfig,
) -> Result<OptimizationResult> {
    println!(
        "Optimizing {} lanes: population {}, {} generations, cycle limit {:.0}s",
        topology.len(),
        config.pop_size,
        config.generations,
        config.cycle_limit
    );

    let result = optimizer::optimize(topology, config).context("Optimization failed")?;

    println!("=== Best Timing ===");
    for lane in &result.lanes {
        println!(
            "{}: green {:.2}s, avg wait {:.2}s",
            lane,
            result.best.get(lane).copied().unwrap_or(0.0),
            result.lane_waits.get(lane).copied().unwrap_or(0.0)
        );
    }
    println!("Fitness (max avg wait): {:.3}", result.fitness);
    println!("Seed: {}", result.seed);
    Ok(result)
}
