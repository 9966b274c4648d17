//! Editing, publishing and deleting posts
//!
//! Reads work with any validated token. Anything that changes the
//! repository takes an [`Authorized`] session.

mod form;
mod workflow;

pub use form::PostForm;
pub use workflow::{Phase, PublishWorkflow, Published};

use tracing::info;

use crate::auth::Authorized;
use crate::content::ContentRecord;
use crate::error::Result;
use crate::remote::{CommitAction, ContentStore, default_commit_message};

/// Fetch a post and decode it
pub async fn fetch_post(store: &dyn ContentStore, name: &str) -> Result<ContentRecord> {
    let file = store.read(name).await?;
    Ok(ContentRecord::from_markdown(name, &file.content))
}

/// Load a post into an edit buffer that carries its revision handle
pub async fn open_for_edit(store: &dyn ContentStore, name: &str) -> Result<PostForm> {
    let file = store.read(name).await?;
    let record = ContentRecord::from_markdown(name, &file.content);
    Ok(PostForm::editing(record, file.handle))
}

/// Delete a post by name.
///
/// Reads the current revision first; a missing post is `NotFound`, and a
/// change between the read and the delete is a `Conflict`.
pub async fn delete_post(
    store: &dyn ContentStore,
    _auth: &Authorized,
    name: &str,
    message: Option<&str>,
) -> Result<()> {
    let file = store.read(name).await?;
    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| default_commit_message(CommitAction::Delete, name));
    store.delete(name, file.handle, &message).await?;
    info!(name, "post deleted");
    Ok(())
}
