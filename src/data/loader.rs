use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::error::LoadError;
use super::model::WideTable;
use super::parser::parse_wide_table;

// ---------------------------------------------------------------------------
// Blocking loaders
// ---------------------------------------------------------------------------

/// Read and parse one wide CSV file.
pub fn load_file(path: &Path) -> Result<WideTable, LoadError> {
    let file = File::open(path).map_err(|source| {
        log::error!("Failed to open {}: {source}", path.display());
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let table = parse_wide_table(BufReader::new(file)).map_err(|source| {
        log::error!("Failed to parse {}: {source}", path.display());
        LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::info!(
        "Loaded {} rows x {} years from {}",
        table.len(),
        table.years.len(),
        path.display()
    );
    Ok(table)
}

/// Load two tables; fails with the first error encountered.
pub fn load_pair(primary: &Path, secondary: &Path) -> Result<(WideTable, WideTable), LoadError> {
    Ok((load_file(primary)?, load_file(secondary)?))
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// A load running on a worker thread. The UI polls it once per frame and
/// keeps its controls disabled until it resolves.
pub struct PendingLoad<T> {
    /// What is being loaded, for status messages.
    pub label: String,
    rx: Receiver<Result<T, LoadError>>,
}

impl<T: Send + 'static> PendingLoad<T> {
    /// Run `job` on a new thread.
    pub fn spawn<F>(label: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> Result<T, LoadError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver gone means the UI dropped the load; nothing to report.
            let _ = tx.send(job());
        });
        Self {
            label: label.into(),
            rx,
        }
    }

    /// Non-blocking check. `None` while the job is still running.
    pub fn poll(&self) -> Option<Result<T, LoadError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Worker)),
        }
    }

    /// Block until the job finishes.
    pub fn wait(self) -> Result<T, LoadError> {
        self.rx.recv().unwrap_or(Err(LoadError::Worker))
    }
}

/// Spawn [`load_file`] in the background.
pub fn spawn_load_file(path: PathBuf) -> PendingLoad<WideTable> {
    let label = path.display().to_string();
    PendingLoad::spawn(label, move || load_file(&path))
}
