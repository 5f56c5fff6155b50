//! Event Log
//!
//! Append-only JSONL world event log.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use faction_events::WorldEvent;
use tracing::warn;

use super::{StoreError, StoreResult};

/// Writes world events to a JSONL file, one event per line.
///
/// Each append is written as a single buffer and flushed. If the write fails
/// the file is cut back to its previous length, so a failed append leaves no
/// partial line behind.
pub struct EventLog {
    path: PathBuf,
    file: File,
}

impl EventLog {
    /// Open the log at `path` for appending, creating it if missing.
    ///
    /// A torn final line left by an interrupted write is removed first.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        let mut log = Self { path, file };
        log.repair_tail()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event and flush it to disk
    pub fn append(&mut self, event: &WorldEvent) -> StoreResult<()> {
        let mut line = event.to_jsonl().map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        line.push('\n');

        let start = self.len()?;
        let written = self
            .file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush());
        if let Err(source) = written {
            if let Err(e) = self.file.set_len(start) {
                warn!("Could not trim failed append from {}: {}", self.path.display(), e);
            }
            return Err(self.io_error(source));
        }
        Ok(())
    }

    /// Read every event in the file, in append order.
    ///
    /// A missing file is an empty log. Blank lines are skipped. A final line
    /// with no newline that does not parse is a torn write and is skipped.
    pub fn read_all(path: impl AsRef<Path>) -> StoreResult<Vec<WorldEvent>> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut events = Vec::new();
        for (index, raw) in contents.split_inclusive('\n').enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match WorldEvent::from_jsonl(line) {
                Ok(event) => events.push(event),
                Err(_) if !raw.ends_with('\n') => {
                    warn!(
                        "Skipping torn event on line {} of {}",
                        index + 1,
                        path.display()
                    );
                }
                Err(source) => {
                    return Err(StoreError::MalformedEvent {
                        path: path.to_path_buf(),
                        line: index + 1,
                        source,
                    })
                }
            }
        }
        Ok(events)
    }

    fn len(&self) -> StoreResult<u64> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|source| self.io_error(source))
    }

    /// Terminate or drop a final line that lacks its newline
    fn repair_tail(&mut self) -> StoreResult<()> {
        let len = self.len()?;
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        self.file
            .seek(SeekFrom::End(-1))
            .and_then(|_| self.file.read_exact(&mut last))
            .map_err(|source| self.io_error(source))?;
        if last[0] == b'\n' {
            return Ok(());
        }

        let mut contents = Vec::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_end(&mut contents))
            .map_err(|source| self.io_error(source))?;
        let tail_start = contents
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        let tail = String::from_utf8_lossy(&contents[tail_start..]);

        let repaired = if WorldEvent::from_jsonl(tail.trim()).is_ok() {
            self.file.write_all(b"\n").and_then(|_| self.file.flush())
        } else {
            warn!("Dropping torn event at the end of {}", self.path.display());
            self.file.set_len(tail_start as u64)
        };
        repaired.map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faction_events::{ActionKind, EventId, FactionId, Timestamp};
    use tempfile::TempDir;

    fn event(id: u64, text: &str) -> WorldEvent {
        WorldEvent::new(2, FactionId(1), ActionKind::Trade, text)
            .with_timestamp(Timestamp::from_millis(1_000 + id))
            .with_id(EventId(id))
    }

    fn torn(id: u64) -> String {
        let line = event(id, "cut short").to_jsonl().unwrap();
        line[..line.len() / 2].to_string()
    }

    #[test]
    fn test_append_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut log = EventLog::open(&path).unwrap();
        log.append(&event(1, "one")).unwrap();
        log.append(&event(2, "two")).unwrap();

        let events = EventLog::read_all(&path).unwrap();
        assert_eq!(events, vec![event(1, "one"), event(2, "two")]);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        EventLog::open(&path).unwrap().append(&event(1, "one")).unwrap();
        EventLog::open(&path).unwrap().append(&event(2, "two")).unwrap();

        assert_eq!(EventLog::read_all(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let events = EventLog::read_all(dir.path().join("nothing.jsonl")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let good = event(1, "one").to_jsonl().unwrap();
        fs::write(&path, format!("{}\n\nnot json\n", good)).unwrap();

        match EventLog::read_all(&path) {
            Err(StoreError::MalformedEvent { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed event, got {:?}", other),
        }
    }

    #[test]
    fn test_torn_final_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let good = event(1, "one").to_jsonl().unwrap();
        fs::write(&path, format!("{}\n{}", good, torn(2))).unwrap();

        assert_eq!(EventLog::read_all(&path).unwrap(), vec![event(1, "one")]);
    }

    #[test]
    fn test_open_drops_torn_tail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let good = event(1, "one").to_jsonl().unwrap();
        fs::write(&path, format!("{}\n{}", good, torn(2))).unwrap();

        let mut log = EventLog::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{}\n", good));

        log.append(&event(2, "two")).unwrap();
        assert_eq!(
            EventLog::read_all(&path).unwrap(),
            vec![event(1, "one"), event(2, "two")]
        );
    }

    #[test]
    fn test_open_terminates_complete_tail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        fs::write(&path, event(1, "one").to_jsonl().unwrap()).unwrap();

        let mut log = EventLog::open(&path).unwrap();
        log.append(&event(2, "two")).unwrap();
        assert_eq!(EventLog::read_all(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_append_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        EventLog::open(&path).unwrap().append(&event(1, "one")).unwrap();
        let before = fs::read(&path).unwrap();

        // A handle without write access makes every append fail
        let mut log = EventLog {
            path: path.clone(),
            file: File::open(&path).unwrap(),
        };
        assert!(matches!(log.append(&event(2, "two")), Err(StoreError::Io { .. })));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(EventLog::read_all(&path).unwrap(), vec![event(1, "one")]);
    }
}
