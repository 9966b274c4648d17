//! List command implementation
//!
//! Lists the posts in the repository's content directory with their size and,
//! when the store reports one, the last-modified date.

use console::Style;

use crate::app::{App, require_credential};
use crate::error::Result;
use crate::listing::{ContentSummary, EMPTY_LISTING, list_content};
use crate::progress::with_spinner;
use crate::status::StatusMessage;

use super::helpers::logged_in;

/// Run list command
pub async fn run(app: &App) -> Result<()> {
    let session = logged_in(app).await?;
    let store = app.store(require_credential(&session)?);
    let posts = with_spinner("Loading posts...", list_content(&store)).await?;

    if posts.is_empty() {
        StatusMessage::info(EMPTY_LISTING).print();
        return Ok(());
    }

    println!("Blog posts ({}):", posts.len());
    println!();
    for post in &posts {
        display_post(post);
    }

    Ok(())
}

fn display_post(post: &ContentSummary) {
    let modified = post
        .last_modified
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    println!(
        "  {}  {}  {}",
        Style::new().bold().yellow().apply_to(&post.filename),
        Style::new().dim().apply_to(format!("{:>9}", post.size_display)),
        Style::new().dim().apply_to(modified)
    );
}
