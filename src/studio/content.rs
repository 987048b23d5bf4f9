use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::debug;

/// Normalizes the three input modes into one text payload.
///
/// Text and URL modes replace the payload synchronously. File mode reads
/// asynchronously; every initiated read gets a generation number and only
/// the latest generation may apply its result, so a slow read for an
/// earlier file selection can never clobber a newer one.
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    inner: Arc<Mutex<ContentInner>>,
}

#[derive(Debug, Default)]
struct ContentInner {
    payload: String,
    latest_read: u64,
    read_error: Option<String>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text and URL modes: the payload is whatever the user typed.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.payload = text.into();
        inner.read_error = None;
    }

    pub fn payload(&self) -> String {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.payload.clone()
    }

    /// Error from the most recent file read, if it failed.
    pub fn read_error(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.read_error.clone()
    }

    /// File mode: replace the payload with the decoded file contents.
    pub async fn load_file(&self, path: &Path) {
        let generation = self.begin_read();
        let result = tokio::fs::read_to_string(path).await;
        self.finish_read(generation, result);
    }

    /// Claim the next read generation. Split out from `load_file` so the
    /// read itself can run without holding the lock.
    pub(crate) fn begin_read(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.latest_read += 1;
        inner.latest_read
    }

    /// Apply a finished read. Results from a superseded generation are
    /// dropped, success or failure.
    pub(crate) fn finish_read(&self, generation: u64, result: io::Result<String>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if generation != inner.latest_read {
            debug!("discarding stale file read (generation {generation})");
            return;
        }
        match result {
            Ok(text) => {
                inner.payload = text;
                inner.read_error = None;
            }
            Err(e) => {
                inner.read_error = Some(format!("Could not read file: {e}"));
            }
        }
    }
}
