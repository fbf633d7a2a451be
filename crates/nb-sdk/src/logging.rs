//! Per-call log sink (spec §9: "global module logger → context-carried
//! logger"). Every public [`crate::Project`] operation opens one of these
//! for its duration and lets it drop at the end of the call; there is no
//! module-level `static` logger anywhere in this crate.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct SharedFile(Arc<Mutex<File>>);

impl Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

/// A log sink scoped to one operation, writing to
/// `<local_path>/.datashuttle/logs/<command>_<timestamp>.log`.
/// Holding this alive makes it the `tracing` default subscriber for the
/// current thread; dropping it restores whatever was previously the
/// default.
pub struct LogSink {
    _guard: tracing::subscriber::DefaultGuard,
    pub path: PathBuf,
}

/// Open a log sink for `command`, stamped with `timestamp` (caller-supplied
/// so this module stays pure and testable — no direct clock reads).
pub fn open(local_path: &Path, command: &str, timestamp: &str) -> io::Result<LogSink> {
    let dir = nb_core::path::logs_dir(local_path);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{command}_{timestamp}.log"));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let shared = SharedFile(Arc::new(Mutex::new(file)));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || shared.clone())
        .with_ansi(false)
        .with_target(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    Ok(LogSink { _guard: guard, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_logs_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = open(tmp.path(), "create_folders", "20240301T120000").unwrap();
        assert!(sink.path.exists());
        assert_eq!(
            sink.path.file_name().unwrap().to_str().unwrap(),
            "create_folders_20240301T120000.log"
        );
    }

    #[test]
    fn sink_records_a_tracing_event() {
        let tmp = tempfile::tempdir().unwrap();
        let path = {
            let sink = open(tmp.path(), "validate_project", "20240301T120000").unwrap();
            tracing::info!("validation started");
            sink.path.clone()
        };
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("validation started"));
    }
}
