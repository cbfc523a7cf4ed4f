//! Brain simulator binary.
//!
//! Builds the network from CLI parameters, opens the journals, installs
//! the SIGINT handler, and hands control to the scheduler. Exit code 0 on
//! any clean stop (budget exhausted, `exit` command, Ctrl+C).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use synaptica_brain::{run, Brain, BrainConfig, RunOptions};
use synaptica_journal::{commands_path, CommandReader, JournalWriter};
use synaptica_network::FabricConfig;

#[derive(Debug, Parser)]
#[command(
    name = "synaptica-brain",
    about = "Hormone-modulated spiking network simulator"
)]
struct Cli {
    /// Number of ticks to simulate; negative runs until stopped.
    #[arg(long, short = 'n', default_value_t = 2000, allow_hyphen_values = true)]
    steps: i64,

    /// Simulated seconds; overrides --steps when given.
    #[arg(long, short = 's')]
    seconds: Option<f64>,

    /// Logging cadence in simulated milliseconds (min 1).
    #[arg(long, short = 'p', default_value_t = 100)]
    print_every_ms: u64,

    /// Pace the loop against wall clock with an accumulator.
    #[arg(long)]
    realtime: bool,

    /// Genesis seed for all subsystem RNG streams.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// I/O directory holding in/commands.jsonl and out/*.jsonl.
    #[arg(long, default_value = "io")]
    io_dir: PathBuf,

    /// Population size.
    #[arg(long, default_value_t = 1000)]
    neurons: usize,

    /// Synapse candidates drawn per neuron.
    #[arg(long, default_value_t = 30)]
    fan_in: usize,

    /// Input neuron count (population prefix).
    #[arg(long, default_value_t = 120)]
    inputs: usize,

    /// Output neuron count (population suffix).
    #[arg(long, default_value_t = 120)]
    outputs: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = BrainConfig {
        fabric: FabricConfig {
            n: cli.neurons,
            fan_in: cli.fan_in,
            n_inputs: cli.inputs,
            n_outputs: cli.outputs,
            ..FabricConfig::default()
        },
        seed: cli.seed,
        ..BrainConfig::default()
    };

    let mut brain = Brain::new(&config)?;
    info!(
        neurons = config.fabric.n,
        synapses = brain.fabric.synapses().len(),
        seed = config.seed,
        "network built"
    );

    let journal = JournalWriter::open(&cli.io_dir, cli.inputs, cli.outputs)?;
    journal.log_status("Brain initialized");

    let mut commands = CommandReader::new(commands_path(&cli.io_dir));

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    let steps = match cli.seconds {
        Some(seconds) if seconds >= 0.0 => Some((seconds / f64::from(brain.neurons.dt)) as u64),
        _ if cli.steps < 0 => None,
        _ => Some(cli.steps as u64),
    };

    let opts = RunOptions {
        steps,
        realtime: cli.realtime,
        print_every_ms: cli.print_every_ms.max(1),
    };

    let executed = run(&mut brain, &journal, &mut commands, &opts, &running);

    journal.log_status("Brain stopped");
    info!(
        executed,
        digest = %hex::encode(brain.state_digest()),
        "simulation finished"
    );

    Ok(())
}
