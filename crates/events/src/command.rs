//! Command documents read from `commands.jsonl`.
//!
//! One JSON object per line. The `cmd` field selects the operation; its
//! payload may appear at the top level or nested under `data` (the coach
//! writes the nested form together with `ts`/`seq`/`source` metadata the
//! brain does not interpret).

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A recognized, validated command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set exogenous hormone drives. Absent fields leave the drive alone.
    SetHormones {
        dopamine: Option<f32>,
        cortisol: Option<f32>,
        adrenaline: Option<f32>,
    },
    /// Arm a one-shot external input pattern (0/1 per input neuron).
    InputPattern { pattern: Vec<u8> },
    /// Request a graceful shutdown.
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("command document is not an object")]
    NotAnObject,
    #[error("`{cmd}` field `{field}` has the wrong shape")]
    BadField { cmd: String, field: &'static str },
}

/// Parse one journal line.
///
/// Returns `Ok(None)` for unknown commands (ignored by contract) and for
/// recognized commands whose payload is effectively empty.
pub fn parse_command_line(line: &str) -> Result<Option<Command>, CommandParseError> {
    let doc: Value = serde_json::from_str(line)?;
    let obj = doc.as_object().ok_or(CommandParseError::NotAnObject)?;

    let cmd = obj.get("cmd").and_then(Value::as_str).unwrap_or("");
    // Payload is either nested under `data` or the document itself.
    let data = obj.get("data").unwrap_or(&doc);

    match cmd {
        "set_hormones" => {
            let field = |name: &'static str| -> Result<Option<f32>, CommandParseError> {
                match data.get(name) {
                    None => Ok(None),
                    Some(v) => v
                        .as_f64()
                        .map(|f| Some(f as f32))
                        .ok_or(CommandParseError::BadField {
                            cmd: cmd.to_string(),
                            field: name,
                        }),
                }
            };
            Ok(Some(Command::SetHormones {
                dopamine: field("dopamine")?,
                cortisol: field("cortisol")?,
                adrenaline: field("adrenaline")?,
            }))
        }
        "input_pattern" | "input" => {
            let raw = match data.get("pattern") {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(CommandParseError::BadField {
                        cmd: cmd.to_string(),
                        field: "pattern",
                    })
                }
                None => return Ok(None),
            };
            let mut pattern = Vec::with_capacity(raw.len());
            for item in raw {
                let bit = item.as_i64().ok_or(CommandParseError::BadField {
                    cmd: cmd.to_string(),
                    field: "pattern",
                })?;
                pattern.push(u8::from(bit != 0));
            }
            if pattern.is_empty() {
                Ok(None)
            } else {
                Ok(Some(Command::InputPattern { pattern }))
            }
        }
        "exit" => Ok(Some(Command::Exit)),
        _ => Ok(None),
    }
}

/// The envelope the coach writes: command plus provenance metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CommandEnvelope {
    /// Seconds since the Unix epoch.
    pub ts: f64,
    pub seq: u64,
    pub source: String,
    pub cmd: String,
    pub data: Value,
}

impl CommandEnvelope {
    pub fn new(seq: u64, cmd: impl Into<String>, data: Value) -> Self {
        Self {
            ts: crate::record::epoch_seconds(),
            seq,
            source: "coach".to_string(),
            cmd: cmd.into(),
            data,
        }
    }
}
