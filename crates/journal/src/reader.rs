//! Byte-offset command ingestion from `commands.jsonl`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use tracing::trace;

use synaptica_events::{parse_command_line, Command, CommandParseError};

/// Incremental reader over the append-only command journal.
///
/// The reader remembers a byte offset and only ever consumes whole
/// `\n`-terminated lines past it; a partial trailing line stays in the
/// file until its newline arrives. A missing file simply means no
/// commands yet.
pub struct CommandReader {
    path: PathBuf,
    offset: u64,
}

impl CommandReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path, offset: 0 }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Drain newly appended whole lines, one parse result per line.
    ///
    /// Malformed lines surface as `Err` entries so the caller can emit an
    /// error record and keep going; they never stall later lines.
    pub fn poll(&mut self) -> Vec<Result<Command, CommandParseError>> {
        let Ok(mut file) = File::open(&self.path) else {
            return Vec::new();
        };
        let Ok(meta) = file.metadata() else {
            return Vec::new();
        };
        if meta.len() <= self.offset {
            return Vec::new();
        }

        if file.seek(SeekFrom::Start(self.offset)).is_err() {
            return Vec::new();
        }
        let mut buf = Vec::new();
        if file.read_to_end(&mut buf).is_err() {
            return Vec::new();
        }

        // Only consume through the last complete line.
        let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let complete = &buf[..=last_newline];
        self.offset += complete.len() as u64;

        let text = String::from_utf8_lossy(complete);
        let mut results = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_command_line(line) {
                Ok(Some(cmd)) => results.push(Ok(cmd)),
                Ok(None) => trace!(line, "ignoring unrecognized command"),
                Err(e) => results.push(Err(e)),
            }
        }
        results
    }
}
