//! Show command implementation

use console::Style;

use crate::app::{App, require_credential};
use crate::cli::ShowArgs;
use crate::error::Result;
use crate::progress::with_spinner;
use crate::publish::fetch_post;

use super::helpers::logged_in;

/// Print a post's metadata and body
pub async fn run(app: &App, args: &ShowArgs) -> Result<()> {
    let session = logged_in(app).await?;
    let store = app.store(require_credential(&session)?);
    let record = with_spinner("Loading post...", fetch_post(&store, &args.name)).await?;

    let label = Style::new().bold();
    println!("{}", Style::new().bold().yellow().apply_to(&record.title));
    println!("  {} {}", label.apply_to("File:"), record.filename);
    if let Some(date) = record.publish_date {
        println!("  {} {date}", label.apply_to("Date:"));
    }
    println!("  {} {}", label.apply_to("Genre:"), record.genre);
    if !record.excerpt.is_empty() {
        println!("  {} {}", label.apply_to("Excerpt:"), record.excerpt);
    }
    if !record.author.is_empty() {
        println!("  {} {}", label.apply_to("Author:"), record.author);
    }
    println!();
    println!("{}", record.body.trim_end());

    Ok(())
}
