//! Edit command implementation
//!
//! Loads a published post into the local draft together with its revision,
//! so `quire publish --from-draft` updates it in place.

use std::fs;

use chrono::Utc;
use tracing::info;

use crate::app::{App, require_credential};
use crate::cli::EditArgs;
use crate::draft::Draft;
use crate::error::{QuireError, Result};
use crate::progress::with_spinner;
use crate::publish::open_for_edit;
use crate::status::StatusMessage;

use super::helpers::logged_in;

/// Run edit command
pub async fn run(app: &App, args: &EditArgs) -> Result<()> {
    let session = logged_in(app).await?;
    let store = app.store(require_credential(&session)?);
    let form = with_spinner("Loading post...", open_for_edit(&store, &args.name)).await?;

    let drafts = app.drafts();
    if drafts.load()?.is_some() {
        info!(path = %drafts.path().display(), "replacing saved draft");
    }
    drafts.save(&Draft::from_form(&form, Utc::now()))?;

    if let Some(output) = &args.output {
        fs::write(output, &form.body).map_err(|e| QuireError::FileWriteFailed {
            path: output.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    StatusMessage::success(format!("Loaded {} into the draft", form.filename)).print();
    StatusMessage::info(match &args.output {
        Some(output) => format!(
            "Edit {}, then run 'quire draft save --file {}' and 'quire publish --from-draft'",
            output.display(),
            output.display()
        ),
        None => "Update it with 'quire draft save', then run 'quire publish --from-draft'"
            .to_string(),
    })
    .print();

    Ok(())
}
