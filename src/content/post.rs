//! Blog post record and its Markdown representation

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frontmatter::{self, Frontmatter, quote};

/// Frontmatter keys in the order they are written
pub const FIELD_ORDER: [&str; 5] = ["title", "date", "genre", "excerpt", "author"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post category. The set is open; `tech` is the default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre(String);

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self::default()
        } else {
            Self(name.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Genre {
    fn default() -> Self {
        Self("tech".to_string())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub filename: String,
    pub title: String,
    pub publish_date: Option<NaiveDate>,
    pub genre: Genre,
    pub excerpt: String,
    pub author: String,
    pub body: String,
}

impl ContentRecord {
    /// Frontmatter in the fixed publish order, free text quoted
    pub fn frontmatter(&self) -> Frontmatter {
        let date = self
            .publish_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        Frontmatter::new()
            .with(FIELD_ORDER[0], quote(&self.title))
            .with(FIELD_ORDER[1], date)
            .with(FIELD_ORDER[2], self.genre.as_str())
            .with(FIELD_ORDER[3], quote(&self.excerpt))
            .with(FIELD_ORDER[4], quote(&self.author))
    }

    pub fn to_markdown(&self) -> String {
        frontmatter::encode(&self.frontmatter(), &self.body)
    }

    /// Rebuild a record from stored content. Missing fields become empty;
    /// a missing title falls back to the filename stem.
    pub fn from_markdown(filename: &str, raw: &str) -> Self {
        let doc = frontmatter::decode(raw);
        let fm = &doc.frontmatter;
        let field = |key: &str| fm.get(key).unwrap_or_default().to_string();

        let title = fm
            .get("title")
            .filter(|t| !t.is_empty())
            .map_or_else(|| file_stem(filename).to_string(), str::to_string);

        Self {
            filename: filename.to_string(),
            title,
            publish_date: fm
                .get("date")
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()),
            genre: Genre::new(field("genre")),
            excerpt: field("excerpt"),
            author: field("author"),
            body: doc.body,
        }
    }
}

/// Filename without the post extension
pub fn file_stem(filename: &str) -> &str {
    filename
        .strip_suffix(super::POST_EXTENSION)
        .unwrap_or(filename)
}
