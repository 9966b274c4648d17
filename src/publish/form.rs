//! The local edit buffer for one post

use chrono::NaiveDate;

use crate::content::{ContentRecord, FilenameTracker, Genre, POST_EXTENSION, is_post_file};
use crate::error::{FieldError, QuireError, Result};
use crate::remote::RemoteFileHandle;

/// Fields being edited, plus the revision handle when editing an existing
/// post. No network access happens through this type.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: String,
    pub filename: String,
    pub genre: Genre,
    pub excerpt: String,
    pub body: String,
    handle: Option<RemoteFileHandle>,
    tracker: FilenameTracker,
}

impl PostForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for an existing post. The filename is fixed to the stored one.
    pub fn editing(record: ContentRecord, handle: RemoteFileHandle) -> Self {
        Self {
            title: record.title,
            filename: record.filename,
            genre: record.genre,
            excerpt: record.excerpt,
            body: record.body,
            handle: Some(handle),
            tracker: FilenameTracker::new(),
        }
    }

    /// Update the title, re-deriving the filename while it is still
    /// auto-derived.
    pub fn set_title(&mut self, title: impl Into<String>, today: NaiveDate) {
        self.title = title.into();
        if self.handle.is_none() {
            self.tracker
                .title_changed(&self.title, today, &mut self.filename);
        }
    }

    /// Manually set the filename; it no longer follows the title.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Whether publishing overwrites an existing post
    pub fn is_update(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&RemoteFileHandle> {
        self.handle.as_ref()
    }

    pub(crate) fn set_handle(&mut self, handle: RemoteFileHandle) {
        self.handle = Some(handle);
    }

    /// Reattach a revision handle, e.g. one restored from a saved draft
    pub(crate) fn with_handle(mut self, handle: Option<RemoteFileHandle>) -> Self {
        self.handle = handle;
        self
    }

    /// Required fields, single-line frontmatter values and the filename
    /// extension. Purely local.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let mut require = |field: &'static str, value: &str| {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    message: "is required".to_string(),
                });
                false
            } else {
                true
            }
        };

        require("title", &self.title);
        let has_filename = require("filename", &self.filename);
        require("body", &self.body);

        for (field, value) in [
            ("title", self.title.as_str()),
            ("genre", self.genre.as_str()),
            ("excerpt", self.excerpt.as_str()),
        ] {
            if has_line_break(value) {
                errors.push(FieldError {
                    field,
                    message: "must be a single line".to_string(),
                });
            }
        }

        if has_filename {
            let filename = self.filename.trim();
            if !is_post_file(filename) {
                errors.push(FieldError {
                    field: "filename",
                    message: format!("must end with {POST_EXTENSION}"),
                });
            } else if filename.contains('/') || filename.contains('\\') {
                errors.push(FieldError {
                    field: "filename",
                    message: "must not contain path separators".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(QuireError::Validation { errors })
        }
    }

    /// Build the record to store, dated `today` and signed by `author`
    pub fn to_record(&self, today: NaiveDate, author: &str) -> ContentRecord {
        ContentRecord {
            filename: self.filename.trim().to_string(),
            title: self.title.trim().to_string(),
            publish_date: Some(today),
            genre: self.genre.clone(),
            excerpt: self.excerpt.trim().to_string(),
            author: single_line(author),
            body: self.body.clone(),
        }
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

/// Frontmatter holds one `key: value` per line
fn single_line(value: &str) -> String {
    value
        .split(['\n', '\r'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
