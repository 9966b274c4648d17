//! Title slugs and date-prefixed post filenames

use chrono::NaiveDate;

use super::POST_EXTENSION;

/// Lowercase, keep `[a-z0-9]`, whitespace and `-`, then hyphenate.
///
/// Whitespace runs become a single `-`, repeated hyphens collapse, and
/// leading or trailing hyphens are trimmed.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

/// `<date>-<slug>.md`
pub fn derive_filename(title: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}{}",
        date.format("%Y-%m-%d"),
        slugify(title),
        POST_EXTENSION
    )
}

/// Keeps the filename in sync with the title until the user overrides it.
///
/// The filename follows the title only while it still equals the value this
/// tracker last derived (or is empty). Any manual edit freezes it.
#[derive(Debug, Clone, Default)]
pub struct FilenameTracker {
    last_derived: Option<String>,
}

impl FilenameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute `filename` for a new title if it is still auto-derived.
    /// Returns whether the filename was changed.
    pub fn title_changed(&mut self, title: &str, date: NaiveDate, filename: &mut String) -> bool {
        let untouched = filename.is_empty() || self.last_derived.as_deref() == Some(filename);
        if !untouched || title.trim().is_empty() {
            return false;
        }
        let derived = derive_filename(title, date);
        filename.clone_from(&derived);
        self.last_derived = Some(derived);
        true
    }
}
