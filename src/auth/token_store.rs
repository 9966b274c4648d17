//! Persisted bearer token
//!
//! A single file under the state directory. On Unix it is created with
//! owner-only permissions, and an existing file is narrowed to them before
//! the token is written.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{QuireError, Result};

const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, if any. Blank files count as no token.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| QuireError::FileReadFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let token = content.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let write_failed = |e: std::io::Error| QuireError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let mut file = open_private(&self.path).map_err(write_failed)?;
        restrict_permissions(&file).map_err(write_failed)?;
        file.write_all(token.as_bytes()).map_err(write_failed)
    }

    /// Remove the stored token. Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// `mode` only applies on creation; a file left by an older version keeps
/// its permissions otherwise.
#[cfg(unix)]
fn restrict_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_clear() {
        let temp = TempDir::new().expect("temp dir");
        let store = TokenStore::new(&temp.path().join("nested"));

        assert_eq!(store.load().expect("load"), None);
        store.save("ghp_abc").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("ghp_abc"));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn test_blank_file_is_no_token() {
        let temp = TempDir::new().expect("temp dir");
        let store = TokenStore::new(temp.path());
        fs::write(store.path(), "  \n").expect("write");
        assert_eq!(store.load().expect("load"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().expect("temp dir");
        let store = TokenStore::new(temp.path());
        store.save("ghp_abc").expect("save");
        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_readable_file_is_narrowed() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().expect("temp dir");
        let store = TokenStore::new(temp.path());
        fs::write(store.path(), "ghp_a_much_longer_old_token").expect("write");
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).expect("chmod");

        store.save("ghp_new").expect("save");

        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().expect("load").as_deref(), Some("ghp_new"));
    }
}
