//! Persistence for the opaque auth token.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only the session manager reads or writes the store. There is a single
//! canonical key, [`TOKEN_STORAGE_KEY`]; nothing else in the crate touches
//! the persisted token directly.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{ErrorClass, ErrorCode};

/// Canonical storage key. The file-backed store uses it as the file name.
pub const TOKEN_STORAGE_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_TOKEN_STORAGE_IO",
        }
    }

    fn class(&self) -> ErrorClass {
        ErrorClass::Transient
    }
}

/// Get/set/clear over one opaque token string.
pub trait TokenStore: Send + Sync {
    /// Stored token, or `None` when nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the token cannot be written.
    fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if an existing token cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if a previous run had logged in.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FILE-BACKED
// =============================================================================

/// Stores the token in `<dir>/authToken`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { path: dir.into().join(TOKEN_STORAGE_KEY) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Writes a private staging file and renames it over the token, so the
    /// token is never on disk with wider permissions.
    fn set(&self, token: &str) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let staging = self.path.with_extension("tmp");
        let written = write_private(&staging, token).and_then(|()| std::fs::rename(&staging, &self.path));
        if let Err(e) = written {
            std::fs::remove_file(&staging).ok();
            return Err(self.io_error(e));
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Create `path` afresh, owner-only on unix, and write `contents`.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
