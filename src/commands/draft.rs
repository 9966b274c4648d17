//! Draft command implementation

use chrono::{Local, Utc};
use console::Style;

use crate::app::App;
use crate::cli::{DraftCommand, PostFields};
use crate::draft::Draft;
use crate::error::Result;
use crate::publish::PostForm;
use crate::status::StatusMessage;

use super::helpers::{apply_fields, today};

/// Run draft command
pub fn run(app: &App, command: DraftCommand) -> Result<()> {
    match command {
        DraftCommand::Save(fields) => save(app, fields),
        DraftCommand::Show => show(app),
        DraftCommand::Clear => {
            app.drafts().clear()?;
            StatusMessage::info("Draft cleared").print();
            Ok(())
        }
    }
}

fn save(app: &App, fields: PostFields) -> Result<()> {
    let drafts = app.drafts();
    let mut form = drafts
        .load()?
        .map_or_else(PostForm::new, Draft::into_form);
    apply_fields(&mut form, fields, today())?;
    drafts.save(&Draft::from_form(&form, Utc::now()))?;
    StatusMessage::success("Draft saved locally").print();
    Ok(())
}

fn show(app: &App) -> Result<()> {
    let Some(draft) = app.drafts().load()? else {
        StatusMessage::info("No saved draft").print();
        return Ok(());
    };

    let label = Style::new().bold();
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    println!("{} {}", label.apply_to("Title:"), or_dash(&draft.title));
    println!("{} {}", label.apply_to("Filename:"), or_dash(&draft.filename));
    println!("{} {}", label.apply_to("Genre:"), draft.genre);
    println!("{} {}", label.apply_to("Excerpt:"), or_dash(&draft.excerpt));
    println!(
        "{} {}",
        label.apply_to("Saved:"),
        draft.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    if draft.is_update() {
        println!(
            "{} updates the published post",
            Style::new().cyan().apply_to("Note:")
        );
    }
    println!();
    println!("{}", draft.content.trim_end());
    Ok(())
}
