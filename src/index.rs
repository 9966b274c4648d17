//! Static blog index
//!
//! Scans a local posts directory and writes `index.json`, the metadata file
//! the public site reads to render its post list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::content::{file_stem, frontmatter, is_post_file};
use crate::error::{QuireError, Result};

pub const INDEX_FILE: &str = "index.json";
pub const DEFAULT_IMAGE: &str = "assets/img/blog-default.jpg";
const EXCERPT_CHARS: usize = 150;

/// One post as the site sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub file: String,
    pub title: String,
    pub date: String,
    pub genre: String,
    pub image: String,
    #[serde(rename = "readTime")]
    pub read_time: String,
    pub excerpt: String,
}

impl IndexEntry {
    pub fn from_markdown(file: &str, raw: &str) -> Self {
        let doc = frontmatter::decode(raw);
        let field = |key: &str| {
            doc.frontmatter
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            file: file.to_string(),
            title: field("title").unwrap_or_else(|| file_stem(file).to_string()),
            date: field("date").unwrap_or_default(),
            genre: field("genre").unwrap_or_default(),
            image: field("image").unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            read_time: field("readTime").unwrap_or_default(),
            excerpt: field("excerpt").unwrap_or_else(|| body_excerpt(&doc.body)),
        }
    }
}

/// Leading characters of the body, heading marker removed, with `...`
pub fn body_excerpt(body: &str) -> String {
    let text = body.trim_start().trim_start_matches('#').trim_start();
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

/// Index every post file directly inside `dir`, sorted by filename
pub fn build_index(dir: &Path) -> Result<Vec<IndexEntry>> {
    if !dir.is_dir() {
        return Err(QuireError::FileReadFailed {
            path: dir.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| QuireError::FileReadFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !is_post_file(name) {
            continue;
        }

        let raw = fs::read_to_string(entry.path()).map_err(|e| QuireError::FileReadFailed {
            path: entry.path().display().to_string(),
            reason: e.to_string(),
        })?;
        entries.push(IndexEntry::from_markdown(name, &raw));
    }

    debug!(dir = %dir.display(), count = entries.len(), "indexed posts");
    Ok(entries)
}

/// Build the index for `dir` and write it to `output`, defaulting to
/// `dir/index.json`. Returns the written path and the entry count.
pub fn write_index(dir: &Path, output: Option<&Path>) -> Result<(PathBuf, usize)> {
    let entries = build_index(dir)?;
    let path = output.map_or_else(|| dir.join(INDEX_FILE), Path::to_path_buf);
    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(&path, json).map_err(|e| QuireError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok((path, entries.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_from_frontmatter() {
        let raw = "---\ntitle: \"Hello\"\ndate: 2024-01-15\ngenre: tech\nreadTime: 3 min\nexcerpt: \"Short\"\n---\n\nBody";
        let entry = IndexEntry::from_markdown("2024-01-15-hello.md", raw);
        assert_eq!(entry.title, "Hello");
        assert_eq!(entry.date, "2024-01-15");
        assert_eq!(entry.genre, "tech");
        assert_eq!(entry.read_time, "3 min");
        assert_eq!(entry.excerpt, "Short");
        assert_eq!(entry.image, DEFAULT_IMAGE);
    }

    #[test]
    fn test_entry_fallbacks() {
        let entry = IndexEntry::from_markdown("notes.md", "# Heading\nSome text");
        assert_eq!(entry.title, "notes");
        assert_eq!(entry.date, "");
        assert_eq!(entry.excerpt, "Heading\nSome text...");
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let body = "é".repeat(200);
        let excerpt = body_excerpt(&body);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_read_time_serialized_camel_case() {
        let entry = IndexEntry::from_markdown("a.md", "text");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("readTime").is_some());
        assert!(json.get("read_time").is_none());
    }

    #[test]
    fn test_build_index_skips_non_posts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.md"), "---\ntitle: B\n---\n\nb").unwrap();
        fs::write(temp.path().join("a.md"), "---\ntitle: A\n---\n\na").unwrap();
        fs::write(temp.path().join("index.json"), "[]").unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("drafts.md")).unwrap();

        let entries = build_index(temp.path()).unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_dir_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(build_index(&temp.path().join("nope")).is_err());
    }
}
