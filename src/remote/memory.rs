//! In-process [`ContentStore`] and [`IdentityProvider`].
//!
//! Behaves like the GitHub backend with respect to revision handles: every
//! write gets a fresh revision, and writes or deletes against anything but
//! the current revision fail with `Conflict`. Call counts and the commit log
//! are exposed so callers can assert which remote operations happened.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{
    ContentStore, IdentityProvider, RemoteEntry, RemoteFile, RemoteFileHandle, WriteOutcome,
};
use crate::auth::{Identity, Permission};
use crate::config::DEFAULT_CONTENT_DIR;
use crate::content::is_post_file;
use crate::error::{QuireError, Result};

#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    revision: String,
    modified: DateTime<Utc>,
}

/// One recorded commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub path: String,
    pub message: String,
}

/// Number of calls per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub read: usize,
    pub write: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.list + self.read + self.write + self.delete
    }
}

#[derive(Debug, Default)]
struct Counters {
    list: AtomicUsize,
    read: AtomicUsize,
    write: AtomicUsize,
    delete: AtomicUsize,
}

/// Content store backed by a map
#[derive(Debug)]
pub struct MemoryStore {
    content_dir: String,
    files: Mutex<BTreeMap<String, StoredFile>>,
    commits: Mutex<Vec<Commit>>,
    next_revision: AtomicU64,
    unavailable: AtomicBool,
    counters: Counters,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_DIR)
    }
}

impl MemoryStore {
    pub fn new(content_dir: &str) -> Self {
        Self {
            content_dir: content_dir.trim_matches('/').to_string(),
            files: Mutex::new(BTreeMap::new()),
            commits: Mutex::new(Vec::new()),
            next_revision: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
            counters: Counters::default(),
        }
    }

    /// Place a file directly, bypassing handles and the commit log.
    pub async fn seed(&self, name: &str, content: &str) {
        let path = self.path_for(name);
        let revision = self.fresh_revision();
        self.files.lock().await.insert(
            path,
            StoredFile {
                content: content.to_string(),
                revision,
                modified: Utc::now(),
            },
        );
    }

    /// Make every following call fail as if the network were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            list: self.counters.list.load(Ordering::SeqCst),
            read: self.counters.read.load(Ordering::SeqCst),
            write: self.counters.write.load(Ordering::SeqCst),
            delete: self.counters.delete.load(Ordering::SeqCst),
        }
    }

    pub async fn commits(&self) -> Vec<Commit> {
        self.commits.lock().await.clone()
    }

    /// Raw stored content, without going through `read`
    pub async fn content_of(&self, name: &str) -> Option<String> {
        let path = self.path_for(name);
        self.files.lock().await.get(&path).map(|f| f.content.clone())
    }

    pub async fn file_count(&self) -> usize {
        self.files.lock().await.len()
    }

    fn path_for(&self, name: &str) -> String {
        format!("{}/{name}", self.content_dir)
    }

    fn fresh_revision(&self) -> String {
        format!("{:040x}", self.next_revision.fetch_add(1, Ordering::SeqCst))
    }

    fn enter(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QuireError::RemoteUnavailable {
                reason: "memory store set unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn record_commit(&self, path: &str, message: &str) {
        self.commits.lock().await.push(Commit {
            path: path.to_string(),
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<RemoteEntry>> {
        self.enter(&self.counters.list)?;
        let prefix = format!("{}/", self.content_dir);
        let files = self.files.lock().await;
        Ok(files
            .iter()
            .filter_map(|(path, file)| {
                let name = path.strip_prefix(&prefix)?;
                (!name.contains('/') && is_post_file(name)).then(|| RemoteEntry {
                    name: name.to_string(),
                    path: path.clone(),
                    size: file.content.len() as u64,
                    last_modified: Some(file.modified),
                })
            })
            .collect())
    }

    async fn read(&self, name: &str) -> Result<RemoteFile> {
        self.enter(&self.counters.read)?;
        let path = self.path_for(name);
        let files = self.files.lock().await;
        let file = files
            .get(&path)
            .ok_or_else(|| QuireError::NotFound { path: path.clone() })?;
        Ok(RemoteFile {
            content: file.content.clone(),
            handle: RemoteFileHandle::new(path.clone(), file.revision.clone()),
            html_url: Some(format!("memory://{path}")),
        })
    }

    async fn write(
        &self,
        name: &str,
        content: &str,
        handle: Option<RemoteFileHandle>,
        message: &str,
    ) -> Result<WriteOutcome> {
        self.enter(&self.counters.write)?;
        let path = self.path_for(name);
        let mut files = self.files.lock().await;

        match (&handle, files.get(&path)) {
            (Some(h), Some(current)) => {
                h.ensure_path(&path)?;
                if h.content_hash() != current.revision {
                    return Err(QuireError::Conflict { path });
                }
            }
            (Some(_), None) | (None, Some(_)) => return Err(QuireError::Conflict { path }),
            (None, None) => {}
        }

        let revision = self.fresh_revision();
        files.insert(
            path.clone(),
            StoredFile {
                content: content.to_string(),
                revision: revision.clone(),
                modified: Utc::now(),
            },
        );
        drop(files);
        self.record_commit(&path, message).await;

        Ok(WriteOutcome {
            html_url: Some(format!("memory://{path}")),
            handle: RemoteFileHandle::new(path, revision),
            created: handle.is_none(),
        })
    }

    async fn delete(&self, name: &str, handle: RemoteFileHandle, message: &str) -> Result<()> {
        self.enter(&self.counters.delete)?;
        let path = self.path_for(name);
        handle.ensure_path(&path)?;
        let mut files = self.files.lock().await;

        let current = files
            .get(&path)
            .ok_or_else(|| QuireError::NotFound { path: path.clone() })?;
        if current.revision != handle.content_hash() {
            return Err(QuireError::Conflict { path });
        }
        files.remove(&path);
        drop(files);
        self.record_commit(&path, message).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Which identity endpoint was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityCall {
    Validate,
    Permission,
}

/// Identity provider backed by a token table
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    owner: Option<String>,
    repo: String,
    users: HashMap<String, (Identity, Permission)>,
    calls: std::sync::Mutex<Vec<IdentityCall>>,
    unavailable: AtomicBool,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self {
            repo: crate::config::DEFAULT_REPO.to_string(),
            ..Self::default()
        }
    }

    /// Register a token for `handle` with the given permission
    #[must_use]
    pub fn with_user(mut self, token: &str, handle: &str, permission: Permission) -> Self {
        let identity = Identity {
            handle: handle.to_string(),
            display_name: None,
            avatar_url: None,
            email: None,
        };
        self.users
            .insert(token.to_string(), (identity, permission));
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Calls in the order they were made
    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: IdentityCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QuireError::RemoteUnavailable {
                reason: "memory identity set unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn authenticated_user(&self, token: &str) -> Result<Identity> {
        self.record(IdentityCall::Validate)?;
        self.users
            .get(token)
            .map(|(identity, _)| identity.clone())
            .ok_or(QuireError::InvalidCredential)
    }

    async fn permission_level(&self, token: &str, username: &str) -> Result<Permission> {
        self.record(IdentityCall::Permission)?;
        Ok(self
            .users
            .get(token)
            .filter(|(identity, _)| identity.handle == username)
            .map_or(Permission::None, |(_, permission)| *permission))
    }

    fn repository_label(&self, username: &str) -> String {
        format!("{}/{}", self.owner.as_deref().unwrap_or(username), self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_requires_absent_file() {
        let store = MemoryStore::default();
        store.seed("a.md", "old").await;
        let err = store
            .write("a.md", "new", None, "Add blog post: a.md")
            .await
            .expect_err("existing file without handle");
        assert!(matches!(err, QuireError::Conflict { .. }));
        assert_eq!(store.content_of("a.md").await.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_write_with_current_handle_updates() {
        let store = MemoryStore::default();
        store.seed("a.md", "old").await;
        let file = store.read("a.md").await.expect("read");
        let outcome = store
            .write("a.md", "new", Some(file.handle), "Update blog post: a.md")
            .await
            .expect("write");
        assert!(!outcome.created);
        assert_eq!(store.content_of("a.md").await.as_deref(), Some("new"));
        assert_eq!(store.commits().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::default();
        store.seed("a.md", "x").await;
        let handle = store.read("a.md").await.expect("read").handle;
        let again = store.read("a.md").await.expect("read").handle;
        store.delete("a.md", handle, "Delete blog post: a.md").await.expect("delete");
        let err = store
            .delete("a.md", again, "Delete blog post: a.md")
            .await
            .expect_err("already gone");
        assert!(matches!(err, QuireError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let store = MemoryStore::default();
        store.seed("b.md", "b").await;
        store.seed("a.md", "a").await;
        store.seed("index.json", "[]").await;
        let names: Vec<_> = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[tokio::test]
    async fn test_unavailable_counts_call() {
        let store = MemoryStore::default();
        store.set_unavailable(true);
        assert!(matches!(
            store.list().await,
            Err(QuireError::RemoteUnavailable { .. })
        ));
        assert_eq!(store.calls().list, 1);
    }

    #[tokio::test]
    async fn test_identity_permission_requires_matching_user() {
        let identity = MemoryIdentity::new().with_user("t", "ada", Permission::Write);
        assert_eq!(
            identity.permission_level("t", "bob").await.expect("ok"),
            Permission::None
        );
        assert_eq!(
            identity.permission_level("t", "ada").await.expect("ok"),
            Permission::Write
        );
        assert_eq!(identity.repository_label("ada"), "ada/mywebsite");
    }
}
