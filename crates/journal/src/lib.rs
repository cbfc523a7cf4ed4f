/*!
# Journal I/O

**Purpose:** Append-only JSONL plumbing between the brain, the coach, and
anything else watching the I/O directory.

Three output files live under `<io>/out/`:
- `spikes.jsonl` — one activity record per logged tick, trimmed to the
  last 100 lines;
- `log.jsonl` — status/error/hormone records, same trim policy;
- `stats.jsonl` — a plain-text spike grid, rewritten whole each time.

One input file lives under `<io>/in/`:
- `commands.jsonl` — consumed by byte offset; only whole lines are
  dispatched, partial tails wait for their newline.

Durability is flush + fsync per append, all writers serialized behind one
mutex. Journal failures are never fatal to the simulation: they degrade
to stderr warnings (the journals are a product surface, not a liveness
dependency).
*/

pub mod grid;
pub mod reader;
pub mod tail;
pub mod writer;

pub use grid::render_spike_grid;
pub use reader::CommandReader;
pub use tail::LogTail;
pub use writer::{JournalError, JournalWriter, TRIM_LINES};

use std::path::{Path, PathBuf};

/// `<io>/in/commands.jsonl`
pub fn commands_path(io_dir: &Path) -> PathBuf {
    io_dir.join("in").join("commands.jsonl")
}

/// `<io>/out/spikes.jsonl`
pub fn spikes_path(io_dir: &Path) -> PathBuf {
    io_dir.join("out").join("spikes.jsonl")
}

/// `<io>/out/log.jsonl`
pub fn log_path(io_dir: &Path) -> PathBuf {
    io_dir.join("out").join("log.jsonl")
}

/// `<io>/out/stats.jsonl`
pub fn stats_path(io_dir: &Path) -> PathBuf {
    io_dir.join("out").join("stats.jsonl")
}
