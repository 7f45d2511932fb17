//! Persistence backends for the signed-in identity.
//!
//! A backend stores exactly one opaque record under [`SESSION_KEY`]. The
//! store above it owns the JSON shape; backends only move strings.

use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed key the session record is persisted under
pub const SESSION_KEY: &str = "userData";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to replace session file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One storage partition holding at most one session record.
pub trait SessionStorage: Send + Sync {
    /// Raw persisted record, `None` when nothing is stored
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&self, value: &str) -> Result<(), StorageError>;

    /// Removing an absent record is not an error
    fn remove(&self) -> Result<(), StorageError>;
}

/// Process-local storage, used by tests and `storage.backend = "memory"`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw record already present
    pub fn with_record(value: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(value.into())),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        *self.slot.lock() = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.slot.lock().take();
        Ok(())
    }
}

/// JSON file at `<dir>/userData.json`, replaced atomically on every write
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(format!("{}.json", SESSION_KEY));
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
