//! Coach binary: closes the reinforcement loop around the brain.
//!
//! The coach tails the brain's spike journal for hormone snapshots,
//! renders them into a system prompt, grades model replies arriving on
//! stdin, and writes `set_hormones` drive commands back onto the command
//! journal. It never blocks the brain; everything here is best-effort
//! polling.

mod feedback;
mod logic;
mod pattern;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use synaptica_events::SpikeRecord;
use synaptica_hormones::HormoneSet;
use synaptica_journal::{commands_path, log_path, spikes_path, LogTail};

use feedback::CommandSink;
use logic::{build_prompt, classify_reply, Feedback};
use pattern::text_to_pattern;

/// Poll cadence against the journals.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "synaptica-coach", about = "Feedback coach for the brain simulator")]
struct Cli {
    /// I/O directory shared with the brain.
    #[arg(long, default_value = "io")]
    io_dir: PathBuf,

    #[command(subcommand)]
    command: CoachCommand,
}

#[derive(Debug, Subcommand)]
enum CoachCommand {
    /// Tail hormone snapshots and grade replies from stdin into drive commands.
    Run,
    /// Pretty-print the spike journal as it grows.
    MonitorSpikes,
    /// Pretty-print the status/error journal as it grows.
    MonitorLogs,
    /// Print the system prompt for the latest hormone snapshot.
    Prompt,
    /// Convert text into a one-shot input pattern command.
    Stimulate {
        text: String,
        /// Input neuron count the pattern spans.
        #[arg(long, default_value_t = 120)]
        inputs: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        CoachCommand::Run => run_feedback_loop(&cli.io_dir).await,
        CoachCommand::MonitorSpikes => monitor(spikes_path(&cli.io_dir)).await,
        CoachCommand::MonitorLogs => monitor(log_path(&cli.io_dir)).await,
        CoachCommand::Prompt => print_prompt(&cli.io_dir),
        CoachCommand::Stimulate { text, inputs } => stimulate(&cli.io_dir, &text, inputs),
    }
}

/// Latest hormone snapshot parsed out of a spike journal line, if any.
fn snapshot_from_line(line: &str) -> Option<HormoneSet> {
    let record: SpikeRecord = serde_json::from_str(line).ok()?;
    (record.kind == SpikeRecord::KIND).then(|| record.hormones.to_set())
}

async fn run_feedback_loop(io_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut tail = LogTail::new(spikes_path(io_dir));
    let mut sink = CommandSink::new(commands_path(io_dir));
    let mut snapshot: Option<HormoneSet> = None;

    info!(path = %spikes_path(io_dir).display(), "coach started; replies on stdin");

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(line) = tail.read_next() {
                    if let Some(set) = snapshot_from_line(&line) {
                        snapshot = Some(set);
                    }
                }
            }
            reply = lines.next_line() => {
                let Some(reply) = reply? else { break };
                let Some(verdict) = classify_reply(&reply) else { continue };
                let tag = match verdict.feedback {
                    Feedback::Reward => "reward",
                    Feedback::Punish => "punish",
                    Feedback::None => "none",
                };
                info!(tag, intensity = verdict.intensity, "verdict");
                if let Err(e) = sink.apply_feedback(&verdict) {
                    warn!(error = %e, "could not write feedback command");
                }
                if let Some(set) = &snapshot {
                    // Refresh the prompt after feedback so the caller can
                    // re-query the model with the drifted state.
                    println!("{}", build_prompt(set));
                }
            }
        }
    }

    Ok(())
}

async fn monitor(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        warn!(path = %path.display(), "journal not found yet; waiting");
    }
    info!(path = %path.display(), "monitoring");

    let mut tail = LogTail::new(path);
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        interval.tick().await;
        let Some(line) = tail.read_next() else { continue };
        match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(doc) => match doc.get("type").and_then(|t| t.as_str()) {
                Some("status") => {
                    println!("[status] {}", doc.get("message").and_then(|m| m.as_str()).unwrap_or(""));
                }
                Some("error") => {
                    eprintln!("[error] {}", doc.get("message").and_then(|m| m.as_str()).unwrap_or(""));
                }
                _ => println!("{line}"),
            },
            Err(_) => println!("{line}"),
        }
    }
}

fn print_prompt(io_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut tail = LogTail::new(spikes_path(io_dir));
    match tail.read_next().as_deref().and_then(snapshot_from_line) {
        Some(set) => println!("{}", build_prompt(&set)),
        None => println!("{}", build_prompt(&HormoneSet::ZERO)),
    }
    Ok(())
}

fn stimulate(io_dir: &Path, text: &str, inputs: usize) -> Result<(), Box<dyn std::error::Error>> {
    let pattern = text_to_pattern(text, inputs);
    let active = pattern.iter().filter(|&&b| b == 1).count();
    let mut sink = CommandSink::new(commands_path(io_dir));
    sink.send_input_pattern(&pattern)?;
    info!(active, inputs, "input pattern sent");
    Ok(())
}
