//! File-backed token storage.
//!
//! The token lives in a small TOML table keyed by [`TOKEN_KEY`]. Writes
//! go to a sibling temp file which is fsynced and renamed over the real
//! file, so a crash never leaves a half-written token behind. Access is
//! serialized across processes with an advisory lock on a `.lock` file.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{TokenStore, TokenStoreError, TOKEN_KEY};
use crate::config::Credential;

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn lock(&self) -> Result<File, TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TokenStoreError::io(parent, e))?;
        }
        let lock_path = self.path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| TokenStoreError::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| TokenStoreError::io(&lock_path, e))?;
        Ok(file)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| TokenStoreError::io(&self.path, e))?;
        toml::from_str(&content).map_err(|e| TokenStoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        let content = toml::to_string(entries).map_err(|e| TokenStoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = open_private(&tmp_path)?;
            file.write_all(content.as_bytes())
                .map_err(|e| TokenStoreError::io(&tmp_path, e))?;
            file.sync_all()
                .map_err(|e| TokenStoreError::io(&tmp_path, e))?;
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TokenStoreError::io(&self.path, e));
        }
        sync_parent_dir(&self.path)
    }
}

/// Flush the directory entry so a rename or removal survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<(), TokenStoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| TokenStoreError::io(dir, e))
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<(), TokenStoreError> {
    Ok(())
}

#[cfg(unix)]
fn open_private(path: &Path) -> Result<File, TokenStoreError> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| TokenStoreError::io(path, e))
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<File, TokenStoreError> {
    OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .map_err(|e| TokenStoreError::io(path, e))
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<Credential>, TokenStoreError> {
        let _guard = self.lock()?;
        let entries = self.read_entries()?;
        Ok(entries.get(TOKEN_KEY).map(Credential::new))
    }

    fn set(&self, credential: &Credential) -> Result<(), TokenStoreError> {
        let _guard = self.lock()?;
        let mut entries = self.read_entries()?;
        entries.insert(
            TOKEN_KEY.to_string(),
            credential.token().expose().to_string(),
        );
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "Token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.lock()?;
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            // A corrupt file holds nothing worth keeping.
            Err(TokenStoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        entries.remove(TOKEN_KEY);
        if entries.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => sync_parent_dir(&self.path)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(TokenStoreError::io(&self.path, e)),
            }
        } else {
            self.write_entries(&entries)?;
        }
        tracing::debug!(path = %self.path.display(), "Token cleared");
        Ok(())
    }
}
