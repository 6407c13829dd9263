//! On-disk session cache
//!
//! The interactive login flow caches its session token in a file under the
//! user's home directory. The broker only ever needs to delete it, after the
//! service rejects the token.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use rolevend_core::error::{ApiError, Result};
use rolevend_core::platform::SessionStore;

const SESSION_DIR: &str = ".rolevend";
const SESSION_FILE: &str = "session";

/// Session cache stored at a single path
#[derive(Debug, Clone)]
pub struct CachedSessionFile {
    path: PathBuf,
}

impl CachedSessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.rolevend/session`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| ApiError::config("unable to determine home directory"))?;
        Ok(Self::new(home.join(SESSION_DIR).join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for CachedSessionFile {
    fn delete_local_session(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "removed cached session");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::internal(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
