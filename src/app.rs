//! Per-invocation context shared by the commands

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::auth::{Credential, Gate, Session, TokenStore};
use crate::config::{self, Config};
use crate::draft::DraftStore;
use crate::error::{QuireError, Result};
use crate::remote::github::{GitHubClient, GitHubStore};

pub struct App {
    config: Config,
    state_dir: PathBuf,
    client: GitHubClient,
}

impl App {
    /// Load configuration from `config_path` or the working directory
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| QuireError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?;
        let config = Config::load(config_path, &cwd)?;
        let state_dir = config::state_dir()?;
        Self::with_config(config, state_dir)
    }

    pub fn with_config(config: Config, state_dir: PathBuf) -> Result<Self> {
        let client = GitHubClient::new(&config)?;
        debug!(repo = %config.repo, branch = %config.branch, state = %state_dir.display(), "configured");
        Ok(Self {
            config,
            state_dir,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn tokens(&self) -> TokenStore {
        TokenStore::new(&self.state_dir)
    }

    pub fn drafts(&self) -> DraftStore {
        DraftStore::new(&self.state_dir)
    }

    /// Re-validate the stored token, if any
    pub async fn session(&self) -> Result<Session> {
        Gate::new(&self.client).restore(&self.tokens()).await
    }

    /// Content store bound to a validated credential
    pub fn store(&self, credential: &Credential) -> GitHubStore {
        self.client
            .store(credential.token(), &credential.identity.handle)
    }
}

/// Credential of any logged-in session; reads need no write access
pub fn require_credential(session: &Session) -> Result<&Credential> {
    session.credential().ok_or(QuireError::NotAuthenticated)
}
