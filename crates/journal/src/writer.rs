//! Serialized append+flush+fsync+trim writer for the output journals.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use synaptica_events::{LogRecord, SpikeRecord};
use synaptica_hormones::HormoneSet;

use crate::grid::render_spike_grid;

/// Output journals keep at most this many lines.
pub const TRIM_LINES: usize = 100;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("cannot prepare journal directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot open journal {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

struct LineFile {
    path: PathBuf,
    file: File,
}

impl LineFile {
    /// Truncate and reopen for appending.
    fn create(path: PathBuf) -> Result<Self, JournalError> {
        let file = File::create(&path)
            .and_then(|_| OpenOptions::new().append(true).open(&path))
            .map_err(|source| JournalError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    /// Append one line, flush, fsync, then trim the file to its tail.
    fn append_line(&mut self, line: &str) -> std::io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        self.file.sync_data()?;
        trim_to_last_lines(&self.path, TRIM_LINES)
    }
}

/// Rewrite `path` keeping only its last `max_lines` lines.
///
/// The whole-file rewrite is acceptable because the trim bound keeps the
/// file small. Readers tolerate the rewrite by re-opening on size change.
fn trim_to_last_lines(path: &Path, max_lines: usize) -> std::io::Result<()> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= max_lines {
        return Ok(());
    }
    let tail = &lines[lines.len() - max_lines..];
    let mut out = tail.join("\n");
    out.push('\n');
    fs::write(path, out)
}

struct Inner {
    spikes: LineFile,
    log: LineFile,
    stats_path: PathBuf,
    n_inputs: usize,
    n_outputs: usize,
}

/// Thread-safe writer over the three output journals.
///
/// Every public method takes `&self`; the mutex covers the full
/// append+flush+fsync+trim sequence so records never interleave.
pub struct JournalWriter {
    inner: Mutex<Inner>,
}

impl JournalWriter {
    /// Open (and truncate) the three output journals under `<io_dir>/out/`.
    pub fn open(io_dir: &Path, n_inputs: usize, n_outputs: usize) -> Result<Self, JournalError> {
        let out_dir = io_dir.join("out");
        fs::create_dir_all(&out_dir).map_err(|source| JournalError::Directory {
            path: out_dir.clone(),
            source,
        })?;
        // The command journal lives under in/; make sure the directory
        // exists so producers can append before the brain's first poll.
        let in_dir = io_dir.join("in");
        fs::create_dir_all(&in_dir).map_err(|source| JournalError::Directory {
            path: in_dir,
            source,
        })?;

        let spikes = LineFile::create(crate::spikes_path(io_dir))?;
        let log = LineFile::create(crate::log_path(io_dir))?;
        let stats_path = crate::stats_path(io_dir);
        // Truncate stats as well; it is rewritten whole on every update.
        if let Err(e) = fs::write(&stats_path, b"") {
            warn!(path = %stats_path.display(), error = %e, "cannot clear stats journal");
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                spikes,
                log,
                stats_path,
                n_inputs,
                n_outputs,
            }),
        })
    }

    /// Append one spike record for a logged tick.
    pub fn log_spike(&self, hormones: &HormoneSet, timestep: u64, spike_count: u32) {
        let record = SpikeRecord::new(timestep, spike_count, hormones);
        let mut inner = self.inner.lock();
        match serde_json::to_string(&record) {
            Ok(line) => {
                if let Err(e) = inner.spikes.append_line(&line) {
                    warn!(error = %e, "spike journal write failed");
                }
            }
            Err(e) => warn!(error = %e, "spike record serialization failed"),
        }
    }

    pub fn log_status(&self, message: &str) {
        self.append_log_record(&LogRecord::status(message));
    }

    pub fn log_error(&self, message: &str) {
        self.append_log_record(&LogRecord::error(message));
    }

    pub fn log_hormone(&self, name: &str, level: f32) {
        self.append_log_record(&LogRecord::hormone(name, level));
    }

    fn append_log_record(&self, record: &LogRecord) {
        let mut inner = self.inner.lock();
        match serde_json::to_string(record) {
            Ok(line) => {
                if let Err(e) = inner.log.append_line(&line) {
                    warn!(error = %e, "log journal write failed");
                }
            }
            Err(e) => warn!(error = %e, "log record serialization failed"),
        }
    }

    /// Rewrite the stats journal with the current spike grid.
    pub fn log_spike_matrix(&self, spikes: &[u8], timestep: u64) {
        if spikes.is_empty() {
            return;
        }
        let inner = self.inner.lock();
        let grid = render_spike_grid(spikes, timestep, inner.n_inputs, inner.n_outputs);
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&inner.stats_path)?;
            file.write_all(grid.as_bytes())?;
            file.flush()?;
            file.sync_data()
        };
        if let Err(e) = write() {
            warn!(error = %e, "stats journal write failed");
        }
    }
}
