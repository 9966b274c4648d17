//! Remote content store abstraction
//!
//! Provides the [`ContentStore`] trait over the posts directory of a hosted
//! repository, and [`IdentityProvider`] over the hosting API's account and
//! permission endpoints. The GitHub implementation lives in [`github`]; an
//! in-process implementation for tests and offline use lives in [`memory`].

pub mod github;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Identity, Permission};
use crate::error::{QuireError, Result};

// ---------------------------------------------------------------------------
// Revision handle
// ---------------------------------------------------------------------------

/// Proof of having read a file at a specific revision.
///
/// Only stores hand these out (from a read or a successful write). Writes
/// and deletes consume the handle, so a handle cannot be replayed after the
/// revision it names has been replaced.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileHandle {
    path: String,
    content_hash: String,
}

impl RemoteFileHandle {
    pub(crate) fn new(path: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_hash: content_hash.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Opaque revision token
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Internal copy, so a failed attempt does not lose the caller's handle.
    pub(crate) fn duplicate(&self) -> Self {
        Self::new(self.path.clone(), self.content_hash.clone())
    }

    /// A handle for one path must never be used against another.
    pub(crate) fn ensure_path(&self, path: &str) -> Result<()> {
        if self.path == path {
            Ok(())
        } else {
            Err(QuireError::Conflict {
                path: path.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// One post file in a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// File content together with the handle needed to change it
#[derive(Debug)]
pub struct RemoteFile {
    pub content: String,
    pub handle: RemoteFileHandle,
    pub html_url: Option<String>,
}

/// Result of a successful write
#[derive(Debug)]
pub struct WriteOutcome {
    pub handle: RemoteFileHandle,
    pub html_url: Option<String>,
    /// `true` when the file did not exist before
    pub created: bool,
}

/// Commit message used when the caller does not supply one
pub fn default_commit_message(action: CommitAction, name: &str) -> String {
    let verb = match action {
        CommitAction::Add => "Add",
        CommitAction::Update => "Update",
        CommitAction::Delete => "Delete",
    };
    format!("{verb} blog post: {name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    Add,
    Update,
    Delete,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// CRUD over the posts directory on a fixed branch.
///
/// Names are bare filenames (`2024-01-15-post.md`); implementations resolve
/// them under their content directory. Every successful `write` or `delete`
/// records exactly one commit with the given message.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Post files in the content directory, in remote order. A missing or
    /// empty directory yields an empty list.
    async fn list(&self) -> Result<Vec<RemoteEntry>>;

    /// Fetch a post and its current revision handle.
    async fn read(&self, name: &str) -> Result<RemoteFile>;

    /// Create or overwrite a post.
    ///
    /// With a handle the stored revision must still match it; without one
    /// the file must not exist yet. Either mismatch is a `Conflict`.
    async fn write(
        &self,
        name: &str,
        content: &str,
        handle: Option<RemoteFileHandle>,
        message: &str,
    ) -> Result<WriteOutcome>;

    /// Remove a post at the revision named by `handle`.
    async fn delete(&self, name: &str, handle: RemoteFileHandle, message: &str) -> Result<()>;
}

/// Account lookups against the hosting API
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the identity behind a token. Fails with `InvalidCredential`.
    async fn authenticated_user(&self, token: &str) -> Result<Identity>;

    /// Permission level of `username` on the configured repository.
    /// `owner` falls back to `username` when the repository owner is not
    /// configured.
    async fn permission_level(&self, token: &str, username: &str) -> Result<Permission>;

    /// `owner/repo` the permission check targets, for messages
    fn repository_label(&self, username: &str) -> String;
}
