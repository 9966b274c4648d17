//! Command helper utilities

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::app::{App, require_credential};
use crate::auth::Session;
use crate::cli::PostFields;
use crate::content::Genre;
use crate::error::{FieldError, QuireError, Result};
use crate::progress::with_spinner;
use crate::publish::PostForm;

/// Publish date and filename prefix, in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Read a post body from a local Markdown file
pub fn read_body(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| QuireError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Apply the fields given on the command line to a form.
///
/// The title goes first so a filename given alongside it wins over the
/// derived one. A post loaded for editing keeps its filename.
pub fn apply_fields(form: &mut PostForm, fields: PostFields, today: NaiveDate) -> Result<()> {
    if let Some(title) = fields.title {
        form.set_title(title, today);
    }
    if let Some(filename) = fields.filename {
        if form.is_update() && filename.trim() != form.filename {
            return Err(QuireError::Validation {
                errors: vec![FieldError {
                    field: "filename",
                    message: "cannot be changed while editing a published post".to_string(),
                }],
            });
        }
        form.set_filename(filename.trim());
    }
    if let Some(genre) = fields.genre {
        form.genre = Genre::new(genre);
    }
    if let Some(excerpt) = fields.excerpt {
        form.excerpt = excerpt;
    }
    if let Some(path) = fields.file {
        form.body = read_body(&path)?;
    }
    Ok(())
}

/// Restore the stored session
pub async fn restore_session(app: &App) -> Result<Session> {
    with_spinner("Checking credentials...", app.session()).await
}

/// Restore the stored session and require a logged-in user
pub async fn logged_in(app: &App) -> Result<Session> {
    let session = restore_session(app).await?;
    require_credential(&session)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentRecord;
    use crate::remote::memory::MemoryStore;
    use crate::remote::ContentStore;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    #[test]
    fn test_today_is_utc_date() {
        let before = Utc::now().date_naive();
        let date = today();
        let after = Utc::now().date_naive();
        assert!(date == before || date == after);
    }

    #[test]
    fn test_apply_fields_derives_then_overrides_filename() {
        let mut form = PostForm::new();
        apply_fields(
            &mut form,
            PostFields {
                title: Some("Hello World".to_string()),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap();
        assert_eq!(form.filename, "2024-01-15-hello-world.md");

        let mut form = PostForm::new();
        apply_fields(
            &mut form,
            PostFields {
                title: Some("Hello World".to_string()),
                filename: Some("custom.md".to_string()),
                genre: Some("life".to_string()),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap();
        assert_eq!(form.filename, "custom.md");
        assert_eq!(form.genre.as_str(), "life");
    }

    #[test]
    fn test_apply_fields_reads_body() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("post.md");
        fs::write(&path, "# Hi\n\nText").unwrap();

        let mut form = PostForm::new();
        apply_fields(
            &mut form,
            PostFields {
                file: Some(path),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap();
        assert_eq!(form.body, "# Hi\n\nText");
    }

    #[test]
    fn test_apply_fields_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut form = PostForm::new();
        let err = apply_fields(
            &mut form,
            PostFields {
                file: Some(temp.path().join("missing.md")),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap_err();
        assert!(matches!(err, QuireError::FileReadFailed { .. }));
    }

    #[tokio::test]
    async fn test_apply_fields_keeps_edited_filename() {
        let store = MemoryStore::default();
        store.seed("a.md", "---\ntitle: A\n---\n\nBody").await;
        let file = store.read("a.md").await.unwrap();
        let record = ContentRecord::from_markdown("a.md", &file.content);
        let mut form = PostForm::editing(record, file.handle);

        apply_fields(
            &mut form,
            PostFields {
                title: Some("Renamed".to_string()),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap();
        assert_eq!(form.filename, "a.md");

        let err = apply_fields(
            &mut form,
            PostFields {
                filename: Some("b.md".to_string()),
                ..PostFields::default()
            },
            day(),
        )
        .unwrap_err();
        assert_eq!(err.field_errors()[0].field, "filename");
    }
}
