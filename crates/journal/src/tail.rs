//! Best-effort last-line tailing for the coach side.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::SystemTime;

/// How far back from EOF to look for the last complete line.
const TAIL_WINDOW: u64 = 8192;

/// Polling tailer that always reports the newest complete line.
///
/// The writer side trims its journals by rewriting them whole, so this
/// reader re-arms whenever the file shrinks or its mtime moves, and it
/// deduplicates: a line is reported once, however often `read_next` runs.
pub struct LogTail {
    path: PathBuf,
    last_size: u64,
    last_mtime: Option<SystemTime>,
    last_line: String,
}

impl LogTail {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_size: 0,
            last_mtime: None,
            last_line: String::new(),
        }
    }

    /// The newest complete line, if it changed since the previous call.
    pub fn read_next(&mut self) -> Option<String> {
        let meta = fs::metadata(&self.path).ok()?;
        let size = meta.len();
        let mtime = meta.modified().ok();

        if size < self.last_size || mtime != self.last_mtime {
            // File rewritten or trimmed underneath us; forget the dedup
            // state tied to the old contents but keep reporting changes.
            self.last_size = 0;
        }

        let last = self.read_last_line()?;
        if !last.is_empty() && last != self.last_line {
            self.last_line = last.clone();
            self.last_size = size;
            self.last_mtime = mtime;
            return Some(last);
        }
        self.last_size = size;
        self.last_mtime = mtime;
        None
    }

    fn read_last_line(&self) -> Option<String> {
        let mut file = fs::File::open(&self.path).ok()?;
        let len = file.metadata().ok()?.len();
        let start = len.saturating_sub(TAIL_WINDOW);
        file.seek(SeekFrom::Start(start)).ok()?;
        let mut buf = String::new();
        file.read_to_string(&mut buf).ok()?;
        // Only lines with their newline already on disk count as complete;
        // a mid-write tail is left for the next poll.
        let complete = &buf[..buf.rfind('\n')?];
        complete
            .lines()
            .filter(|l| !l.is_empty())
            .last()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;

    fn append(path: &PathBuf, text: &str) {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn reports_newest_line_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spikes.jsonl");
        let mut tail = LogTail::new(path.clone());

        assert!(tail.read_next().is_none(), "no file yet");

        append(&path, "{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(tail.read_next().unwrap(), "{\"a\":2}");
        assert!(tail.read_next().is_none(), "deduplicated");

        append(&path, "{\"a\":3}\n");
        assert_eq!(tail.read_next().unwrap(), "{\"a\":3}");
    }

    #[test]
    fn survives_file_rewrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spikes.jsonl");
        let mut tail = LogTail::new(path.clone());

        append(&path, "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n");
        assert_eq!(tail.read_next().unwrap(), "{\"a\":3}");

        // Writer-side trim: whole file rewritten, shorter than before.
        fs::write(&path, "{\"a\":4}\n").unwrap();
        assert_eq!(tail.read_next().unwrap(), "{\"a\":4}");
    }

    #[test]
    fn ignores_trailing_partial_content_gracefully() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spikes.jsonl");
        let mut tail = LogTail::new(path.clone());

        append(&path, "{\"a\":1}\n");
        assert_eq!(tail.read_next().unwrap(), "{\"a\":1}");
    }
}
