//! Post content: the frontmatter codec, the post record and filename slugs
//!
//! Posts are Markdown files headed by a `key: value` block between `---`
//! lines. Filenames are date-prefixed slugs of the title.

pub mod frontmatter;
mod post;
mod slug;

pub use frontmatter::{Document, Frontmatter};
pub use post::{ContentRecord, FIELD_ORDER, Genre, file_stem};
pub use slug::{FilenameTracker, derive_filename, slugify};

/// Extension every post filename must carry
pub const POST_EXTENSION: &str = ".md";

/// Whether `name` is a post file
pub fn is_post_file(name: &str) -> bool {
    name.len() > POST_EXTENSION.len() && name.ends_with(POST_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_post_file() {
        assert!(is_post_file("2024-01-15-a.md"));
        assert!(!is_post_file(".md"));
        assert!(!is_post_file("index.json"));
        assert!(!is_post_file("post.md.bak"));
    }
}
