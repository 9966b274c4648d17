//! Publish command implementation
//!
//! Builds the post from the draft and/or command-line fields, validates it
//! locally, then publishes it through the write-access gate.

use crate::app::App;
use crate::cli::PublishArgs;
use crate::error::{QuireError, Result};
use crate::progress::with_spinner;
use crate::publish::{PostForm, PublishWorkflow};
use crate::status::StatusMessage;

use super::helpers::{apply_fields, restore_session, today};

/// Run publish command
pub async fn run(app: &App, args: PublishArgs) -> Result<()> {
    let date = today();
    let drafts = app.drafts();

    let mut form = if args.from_draft {
        drafts.load()?.ok_or(QuireError::NoDraft)?.into_form()
    } else {
        PostForm::new()
    };
    apply_fields(&mut form, args.fields, date)?;

    // Field errors are reported before any network access
    form.validate()?;

    let session = restore_session(app).await?;
    let auth = session.authorized()?;
    let store = app.store(auth.credential());

    let mut workflow = PublishWorkflow::new(form);
    let published = with_spinner(
        "Publishing...",
        workflow.submit(&store, auth, date, args.message.as_deref()),
    )
    .await?;

    drafts.clear()?;

    let verb = if published.created { "created" } else { "updated" };
    StatusMessage::success(format!("Post {verb} successfully: {}", published.filename)).print();
    if let Some(url) = published.html_url {
        StatusMessage::info(url).print();
    }

    Ok(())
}
