//! User-facing status messages
//!
//! Three tiers. Info and success messages are transient and dismiss after a
//! fixed delay on surfaces that support it; errors stay until the next
//! action.

use std::fmt;
use std::time::Duration;

use console::Style;

use crate::error::{ErrorKind, QuireError};

/// How long transient messages stay visible
pub const DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub tier: Tier,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tier: Tier::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tier: Tier::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tier: Tier::Error,
            text: text.into(),
        }
    }

    /// `None` means the message stays until replaced
    pub fn dismiss_after(&self) -> Option<Duration> {
        match self.tier {
            Tier::Info | Tier::Success => Some(DISMISS_AFTER),
            Tier::Error => None,
        }
    }

    /// Status for a failed action, worded per error kind
    pub fn from_error(action: &str, err: &QuireError) -> Self {
        if matches!(err, QuireError::NotAuthenticated) {
            return Self::error("Not logged in. Run 'quire login' first.");
        }
        let text = match err.kind() {
            ErrorKind::InvalidCredential => {
                "Invalid token. Please check your GitHub Personal Access Token.".to_string()
            }
            ErrorKind::InsufficientPermission => {
                "You do not have write access to the repository".to_string()
            }
            ErrorKind::Conflict => format!(
                "Failed to {action}: the post changed since it was loaded. Reload it and redo your edit."
            ),
            ErrorKind::Validation => validation_text(err),
            ErrorKind::NotFound | ErrorKind::RemoteUnavailable | ErrorKind::Local => {
                format!("Failed to {action}: {err}")
            }
        };
        Self::error(text)
    }

    /// Print to stdout (info/success) or stderr (error)
    pub fn print(&self) {
        match self.tier {
            Tier::Error => eprintln!("{self}"),
            Tier::Info | Tier::Success => println!("{self}"),
        }
    }
}

fn validation_text(err: &QuireError) -> String {
    let errors = err.field_errors();
    let fields = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if errors.iter().all(|e| e.message == "is required") {
        format!("Please fill in all required fields ({fields})")
    } else {
        format!("Invalid post: {fields}")
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.tier {
            Tier::Info => Style::new().cyan(),
            Tier::Success => Style::new().green().bold(),
            Tier::Error => Style::new().red().bold(),
        };
        match self.tier {
            Tier::Error => write!(f, "{} {}", style.apply_to("Error:"), self.text),
            Tier::Info | Tier::Success => write!(f, "{}", style.apply_to(&self.text)),
        }
    }
}
