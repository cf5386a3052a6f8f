//! JSONL file writer for debate events.
//!
//! Each [`DebateEvent`] is serialized as a single JSON line
//! (`sequence`, `phase`, `round`, `type`, `payload`) with a `timestamp` of
//! when it was written, appended through a buffered writer.

use debate_application::{TranscriptLogger, TranscriptStore};
use debate_domain::{DebateEvent, SessionId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlTranscriptWriter {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptWriter {
    /// Create the file (and parent directories).
    ///
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptLogger for JsonlTranscriptWriter {
    fn log(&self, event: &DebateEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(mut record) = serde_json::to_value(event) else {
            return;
        };
        if let serde_json::Value::Object(map) = &mut record {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
        }

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Transcript write to {} failed: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlTranscriptWriter {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Opens `<dir>/<session_id>.jsonl` for every session.
pub struct JsonlTranscriptStore {
    dir: PathBuf,
}

impl JsonlTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, session: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.jsonl", session.as_str()))
    }
}

impl TranscriptStore for JsonlTranscriptStore {
    fn open(&self, session: &SessionId) -> Arc<dyn TranscriptLogger> {
        match JsonlTranscriptWriter::new(self.path_for(session)) {
            Some(writer) => Arc::new(writer),
            None => Arc::new(debate_application::NoTranscriptLogger),
        }
    }
}
