//! Records emitted into `spikes.jsonl` and `log.jsonl`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use synaptica_hormones::HormoneSet;

/// ISO-8601 UTC timestamp with second resolution, e.g. `2026-08-01T09:30:00Z`.
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Seconds since the Unix epoch, for coach command metadata.
pub fn epoch_seconds() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6
}

/// Hormone concentrations as the journal renders them: strings with
/// exactly two decimals. Keeping the stringly shape explicit here means
/// both sides of the contract (brain render, coach parse) live together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HormoneLevels {
    pub dopamine: String,
    pub serotonin: String,
    pub cortisol: String,
    pub adrenaline: String,
    pub oxytocin: String,
    pub melatonin: String,
    pub noradrenaline: String,
    pub endorphin: String,
    pub acetylcholine: String,
    pub testosterone: String,
}

impl HormoneLevels {
    pub fn from_set(set: &HormoneSet) -> Self {
        let fmt = |v: f32| format!("{v:.2}");
        Self {
            dopamine: fmt(set.dopamine),
            serotonin: fmt(set.serotonin),
            cortisol: fmt(set.cortisol),
            adrenaline: fmt(set.adrenaline),
            oxytocin: fmt(set.oxytocin),
            melatonin: fmt(set.melatonin),
            noradrenaline: fmt(set.noradrenaline),
            endorphin: fmt(set.endorphin),
            acetylcholine: fmt(set.acetylcholine),
            testosterone: fmt(set.testosterone),
        }
    }

    /// Parse the two-decimal strings back into numeric levels.
    /// Unparseable fields read as zero; the coach is best-effort.
    pub fn to_set(&self) -> HormoneSet {
        let num = |s: &str| s.parse::<f32>().unwrap_or(0.0);
        HormoneSet {
            dopamine: num(&self.dopamine),
            serotonin: num(&self.serotonin),
            cortisol: num(&self.cortisol),
            adrenaline: num(&self.adrenaline),
            oxytocin: num(&self.oxytocin),
            melatonin: num(&self.melatonin),
            noradrenaline: num(&self.noradrenaline),
            endorphin: num(&self.endorphin),
            acetylcholine: num(&self.acetylcholine),
            testosterone: num(&self.testosterone),
        }
    }
}

/// One logged tick of network activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub ts: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestep: u64,
    pub spikes: u32,
    pub hormones: HormoneLevels,
}

impl SpikeRecord {
    pub const KIND: &'static str = "spike";

    pub fn new(timestep: u64, spikes: u32, hormones: &HormoneSet) -> Self {
        Self {
            ts: iso_timestamp(),
            kind: Self::KIND.to_string(),
            timestep,
            spikes,
            hormones: HormoneLevels::from_set(hormones),
        }
    }
}

/// Status, error, and single-hormone records for `log.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Status { ts: String, message: String },
    Error { ts: String, message: String },
    Hormone { ts: String, name: String, level: f32 },
}

impl LogRecord {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            ts: iso_timestamp(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            ts: iso_timestamp(),
            message: message.into(),
        }
    }

    pub fn hormone(name: impl Into<String>, level: f32) -> Self {
        Self::Hormone {
            ts: iso_timestamp(),
            name: name.into(),
            level,
        }
    }
}
