//! Persistent storage for the single session credential.

mod file;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;

use crate::config::Credential;

pub use file::FileTokenStore;

/// Fixed key the bearer token is stored under.
pub const TOKEN_KEY: &str = "OAuth2Token";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token storage I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Token storage at '{path}' is unreadable: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl TokenStoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        TokenStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Holds at most one credential.
///
/// Writes are durable before `set`/`clear` return. No validation of the
/// token format is performed.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<Credential>, TokenStoreError>;
    fn set(&self, credential: &Credential) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<Credential>, TokenStoreError> {
        Ok(self.credential.read().clone())
    }

    fn set(&self, credential: &Credential) -> Result<(), TokenStoreError> {
        *self.credential.write() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.credential.write() = None;
        Ok(())
    }
}
