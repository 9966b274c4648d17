//! Local draft of the post being written
//!
//! One draft at a time, stored as JSON in the state directory. A draft made
//! from `edit` keeps the revision handle of the post it was loaded from, so
//! publishing it later updates that post instead of creating a new one.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::Genre;
use crate::error::{QuireError, Result};
use crate::publish::PostForm;
use crate::remote::RemoteFileHandle;

const DRAFT_FILE: &str = "draft.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<RemoteFileHandle>,
}

impl Draft {
    /// Snapshot a form, stamped with `now`
    pub fn from_form(form: &PostForm, now: DateTime<Utc>) -> Self {
        Self {
            title: form.title.clone(),
            filename: form.filename.clone(),
            genre: form.genre.clone(),
            excerpt: form.excerpt.clone(),
            content: form.body.clone(),
            timestamp: now,
            revision: form.handle().map(RemoteFileHandle::duplicate),
        }
    }

    /// Whether publishing this draft updates an existing post
    pub fn is_update(&self) -> bool {
        self.revision.is_some()
    }

    pub fn into_form(self) -> PostForm {
        let mut form = PostForm::new();
        form.title = self.title;
        form.filename = self.filename;
        form.genre = self.genre;
        form.excerpt = self.excerpt;
        form.body = self.content;
        form.with_handle(self.revision)
    }
}

/// Draft file in the state directory
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(DRAFT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, draft: &Draft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| QuireError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        let json = serde_json::to_string_pretty(draft)?;
        fs::write(&self.path, json).map_err(|e| QuireError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %self.path.display(), "draft saved");
        Ok(())
    }

    /// The saved draft, if any. An unreadable draft is reported and skipped.
    pub fn load(&self) -> Result<Option<Draft>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(QuireError::FileReadFailed {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable draft");
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuireError::FileWriteFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
