//! Verdicts become `set_hormones` commands on the brain's journal.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use synaptica_events::CommandEnvelope;

use crate::logic::{Feedback, Verdict};

/// Sequenced appender onto `commands.jsonl`.
pub struct CommandSink {
    path: PathBuf,
    seq: u64,
}

impl CommandSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, seq: 0 }
    }

    fn write(&mut self, cmd: &str, data: serde_json::Value) -> std::io::Result<()> {
        let envelope = CommandEnvelope::new(self.seq, cmd, data);
        self.seq += 1;

        let line = serde_json::to_string(&envelope)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()
    }

    /// Emit a raw drive triple. Values are bounded coach-side as well;
    /// the brain clamps again on ingest.
    pub fn send_set_hormones(&mut self, dopa: f32, cort: f32, adre: f32) -> std::io::Result<()> {
        debug!(dopa, cort, adre, "sending hormone drives");
        self.write(
            "set_hormones",
            json!({
                "dopamine": dopa.clamp(-1.0, 1.0),
                "cortisol": cort.clamp(-1.0, 1.0),
                "adrenaline": adre.clamp(-1.0, 1.0),
            }),
        )
    }

    /// Map a verdict onto drive values and send them.
    pub fn apply_feedback(&mut self, verdict: &Verdict) -> std::io::Result<()> {
        let i = verdict.intensity.clamp(0.0, 1.0);
        match verdict.feedback {
            Feedback::Reward => self.send_set_hormones(0.3 + 0.7 * i, -0.1 * i, 0.1 * i),
            Feedback::Punish => self.send_set_hormones(-0.2 * i, 0.4 + 0.6 * i, 0.05 * i),
            Feedback::None => self.send_set_hormones(0.0, 0.0, 0.05 * i),
        }
    }

    /// Arm a one-shot input pattern on the brain.
    pub fn send_input_pattern(&mut self, pattern: &[u8]) -> std::io::Result<()> {
        let bits: Vec<u8> = pattern.to_vec();
        self.write("input_pattern", json!({ "pattern": bits }))
    }
}
