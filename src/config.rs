//! Repository and local state configuration
//!
//! Settings come from an optional `quire.yaml`, then environment overrides.
//! Everything has a default so a bare `quire login` works against the
//! authenticated user's `mywebsite` repository.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuireError, Result};

/// Config filename looked up in the working directory
pub const CONFIG_FILE: &str = "quire.yaml";

/// Directory name under the user's config directory
const STATE_DIR: &str = "quire";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPO: &str = "mywebsite";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_CONTENT_DIR: &str = "blog";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where posts live and how to reach the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository owner. Defaults to the authenticated user.
    pub owner: Option<String>,
    pub repo: String,
    pub branch: String,
    pub content_dir: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            content_dir: DEFAULT_CONTENT_DIR.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or `quire.yaml` in `dir` if present,
    /// then apply environment overrides.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::read_file(path)?,
            None => {
                let path = dir.join(CONFIG_FILE);
                if path.exists() {
                    Self::read_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| QuireError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            QuireError::ConfigParseFailed { reason, .. } => QuireError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Apply `QUIRE_*` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(owner) = lookup("QUIRE_OWNER").filter(|v| !v.is_empty()) {
            self.owner = Some(owner);
        }
        if let Some(repo) = lookup("QUIRE_REPO").filter(|v| !v.is_empty()) {
            self.repo = repo;
        }
        if let Some(branch) = lookup("QUIRE_BRANCH").filter(|v| !v.is_empty()) {
            self.branch = branch;
        }
        if let Some(api_url) = lookup("QUIRE_API_URL").filter(|v| !v.is_empty()) {
            self.api_url = api_url;
        }
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(QuireError::ConfigInvalid {
                message: message.to_string(),
            })
        };
        if self.repo.trim().is_empty() {
            return invalid("repo must not be empty");
        }
        if self.branch.trim().is_empty() {
            return invalid("branch must not be empty");
        }
        if self.content_dir.trim_matches('/').is_empty() {
            return invalid("content_dir must not be empty");
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return invalid("api_url must be an http(s) URL");
        }
        Ok(())
    }

    /// Content directory without surrounding slashes
    pub fn content_dir(&self) -> &str {
        self.content_dir.trim_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Directory holding the stored token and the draft
///
/// Uses `QUIRE_STATE_DIR` when set, otherwise the platform config directory.
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("QUIRE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::config_dir().ok_or_else(|| QuireError::ConfigInvalid {
        message: "Could not determine config directory".to_string(),
    })?;

    Ok(base.join(STATE_DIR))
}
