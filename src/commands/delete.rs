//! Delete command implementation

use inquire::Confirm;

use crate::app::App;
use crate::cli::DeleteArgs;
use crate::error::Result;
use crate::progress::with_spinner;
use crate::publish::delete_post;
use crate::status::StatusMessage;

use super::helpers::restore_session;

/// Run delete command
pub async fn run(app: &App, args: &DeleteArgs) -> Result<()> {
    let session = restore_session(app).await?;
    let auth = session.authorized()?;

    if !args.yes && !confirm_delete(&args.name)? {
        StatusMessage::info("Delete cancelled.").print();
        return Ok(());
    }

    let store = app.store(auth.credential());
    with_spinner(
        "Deleting...",
        delete_post(&store, auth, &args.name, args.message.as_deref()),
    )
    .await?;

    StatusMessage::success(format!("Post deleted: {}", args.name)).print();
    Ok(())
}

fn confirm_delete(name: &str) -> Result<bool> {
    let confirmed = Confirm::new(&format!("Are you sure you want to delete \"{name}\"?"))
        .with_default(false)
        .with_help_message("This commits the deletion to the repository")
        .prompt()?;
    Ok(confirmed)
}
