//! Snapshot persistence.
//!
//! The whole [`SeminarGraph`] is saved and loaded as one unit. The layout is
//! pretty-printed JSON; nothing outside this module depends on it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::error::PersistenceError;
use crate::graph::SeminarGraph;

/// Backend that holds the seminar snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Human-readable location, for logs.
    fn location(&self) -> String;

    /// Load the stored graph. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<SeminarGraph>, PersistenceError>;

    /// Replace the stored graph.
    fn save(&self, graph: &SeminarGraph) -> Result<(), PersistenceError>;
}

fn encode(graph: &SeminarGraph) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(graph).map_err(PersistenceError::Serialize)
}

fn decode(content: &str) -> Result<SeminarGraph, PersistenceError> {
    serde_json::from_str(content).map_err(PersistenceError::Deserialize)
}

/// Snapshot kept in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<SeminarGraph>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        decode(&content).map(Some)
    }

    fn save(&self, graph: &SeminarGraph) -> Result<(), PersistenceError> {
        let json = encode(graph)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// In-memory snapshot, for tests and throwaway repositories.
///
/// Holds the serialized form so that loads exercise the same encoding as the
/// file store. Can be told to fail saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: Mutex<Option<String>>,
    fail_saves: AtomicBool,
    save_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw snapshot text, which need not be valid.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// The raw stored snapshot, if any.
    pub fn content(&self) -> Option<String> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<Option<SeminarGraph>, PersistenceError> {
        match self.content() {
            Some(content) => decode(&content).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, graph: &SeminarGraph) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(PersistenceError::Unavailable(
                "memory store is refusing saves".into(),
            ));
        }
        let json = encode(graph)?;
        *self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(json);
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn load(&self) -> Result<Option<SeminarGraph>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, graph: &SeminarGraph) -> Result<(), PersistenceError> {
        (**self).save(graph)
    }
}
