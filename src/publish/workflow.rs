//! Publish state machine
//!
//! `Editing -> Validating -> Publishing -> {Published, Failed}`. Validation
//! never touches the network. A failed attempt is not retried; the caller
//! goes back to editing and submits again.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::form::PostForm;
use crate::auth::Authorized;
use crate::error::{ErrorKind, Result};
use crate::remote::{CommitAction, ContentStore, RemoteFileHandle, default_commit_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Validating,
    Publishing,
    Published,
    Failed(ErrorKind),
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Published | Phase::Failed(_))
    }
}

/// A stored post after a successful publish
#[derive(Debug)]
pub struct Published {
    pub filename: String,
    pub html_url: Option<String>,
    pub created: bool,
}

/// Drives one post through validation and publishing
#[derive(Debug)]
pub struct PublishWorkflow {
    form: PostForm,
    phase: Phase,
}

impl PublishWorkflow {
    pub fn new(form: PostForm) -> Self {
        Self {
            form,
            phase: Phase::Editing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// Return to editing. After a successful publish the form holds the new
    /// revision, so the next submit updates the same post.
    pub fn edit(&mut self) -> &mut PostForm {
        self.transition(Phase::Editing);
        &mut self.form
    }

    pub fn into_form(self) -> PostForm {
        self.form
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "publish phase");
        self.phase = next;
    }

    /// Validate, build the stored document and write it.
    ///
    /// `message` overrides the default `Add`/`Update` commit message.
    pub async fn submit(
        &mut self,
        store: &dyn ContentStore,
        auth: &Authorized,
        today: NaiveDate,
        message: Option<&str>,
    ) -> Result<Published> {
        self.transition(Phase::Validating);
        if let Err(e) = self.form.validate() {
            self.transition(Phase::Failed(e.kind()));
            return Err(e);
        }

        self.transition(Phase::Publishing);
        let record = self.form.to_record(today, auth.identity().display());
        let handle = self.form.handle().map(RemoteFileHandle::duplicate);
        let action = if handle.is_some() {
            CommitAction::Update
        } else {
            CommitAction::Add
        };
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| default_commit_message(action, &record.filename));

        match store
            .write(&record.filename, &record.to_markdown(), handle, &message)
            .await
        {
            Ok(outcome) => {
                info!(filename = %record.filename, created = outcome.created, "post published");
                self.form.set_handle(outcome.handle);
                self.transition(Phase::Published);
                Ok(Published {
                    filename: record.filename,
                    html_url: outcome.html_url,
                    created: outcome.created,
                })
            }
            Err(e) => {
                warn!(filename = %record.filename, error = %e, "publish failed");
                self.transition(Phase::Failed(e.kind()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workflow_is_editing() {
        let workflow = PublishWorkflow::new(PostForm::new());
        assert_eq!(workflow.phase(), Phase::Editing);
        assert!(!workflow.phase().is_terminal());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Published.is_terminal());
        assert!(Phase::Failed(ErrorKind::Conflict).is_terminal());
        assert!(!Phase::Publishing.is_terminal());
    }
}
