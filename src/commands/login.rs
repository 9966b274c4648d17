//! Login, logout and whoami commands

use console::Style;
use inquire::{Password, PasswordDisplayMode};

use crate::app::App;
use crate::auth::{Gate, Session};
use crate::cli::LoginArgs;
use crate::error::{QuireError, Result};
use crate::progress::with_spinner;
use crate::remote::IdentityProvider;
use crate::status::StatusMessage;

use super::helpers::restore_session;

/// Validate a token, store it and report the access it grants
pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let token = match args.token {
        Some(token) => token,
        None => Password::new("GitHub Personal Access Token:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_help_message("Needs read access to the repository contents")
            .prompt()?,
    };

    let gate = Gate::new(app.client());
    let session = with_spinner("Validating token...", gate.login(&token, &app.tokens())).await?;

    match session {
        Session::Authorized(auth) => {
            StatusMessage::success(format!(
                "Logged in as {} ({} access)",
                auth.identity().display(),
                auth.permission().level
            ))
            .print();
        }
        Session::ReadOnly {
            credential,
            permission,
            repository,
        } => {
            StatusMessage::success(format!("Logged in as {}", credential.identity.display()))
                .print();
            StatusMessage::error(format!(
                "You do not have write access to {repository} (permission: {}). \
                 Publishing and deleting are disabled.",
                permission.level
            ))
            .print();
        }
        Session::LoggedOut => return Err(QuireError::NotAuthenticated),
    }

    Ok(())
}

/// Forget the stored token
pub fn logout(app: &App) -> Result<()> {
    app.tokens().clear()?;
    StatusMessage::info("Logged out").print();
    Ok(())
}

/// Show who the stored token belongs to and what it may do
pub async fn whoami(app: &App) -> Result<()> {
    let session = restore_session(app).await?;
    let Some(credential) = session.credential() else {
        StatusMessage::info("Not logged in").print();
        return Ok(());
    };

    let identity = &credential.identity;
    let label = Style::new().bold();
    println!(
        "{} {}",
        label.apply_to("User:"),
        Style::new().bold().yellow().apply_to(&identity.handle)
    );
    if let Some(name) = identity.display_name.as_deref() {
        println!("{} {name}", label.apply_to("Name:"));
    }
    if let Some(email) = identity.email.as_deref() {
        println!("{} {email}", label.apply_to("Email:"));
    }
    println!(
        "{} {}",
        label.apply_to("Repository:"),
        app.client().repository_label(&identity.handle)
    );
    if let Some(permission) = session.permission() {
        let access = if permission.has_write_access {
            Style::new().green().apply_to("write access")
        } else {
            Style::new().red().apply_to("read only")
        };
        println!(
            "{} {} ({access})",
            label.apply_to("Permission:"),
            permission.level
        );
    }

    Ok(())
}
