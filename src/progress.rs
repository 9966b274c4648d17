//! Spinner shown while waiting on the hosting API

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

/// Spinner on stderr; hidden when stderr is not a terminal
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(TICK);
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

/// Run `fut` with a spinner showing `message`
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = Spinner::new(message);
    let out = fut.await;
    spinner.finish();
    out
}
