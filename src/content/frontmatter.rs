//! Parse and emit the `key: value` frontmatter block that heads every post.
//!
//! The format is deliberately not YAML: one `key: value` pair per line,
//! split on the first colon, with optional surrounding double quotes on the
//! value. The block is opened and closed by a line containing `---`.

const DELIMITER: &str = "---";

/// Ordered frontmatter fields. Insertion order is preserved on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, replacing an existing value in place so order is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fm = Frontmatter::new();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

/// A decoded post: frontmatter fields plus the Markdown body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Wrap a value in double quotes, as the publish flow does for free text.
pub fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn parse_field(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unquote(value.trim()).to_string()))
}

/// Split raw content into frontmatter and body.
///
/// Without a complete leading `---` block the whole input is the body and
/// no fields are returned. The single blank line that [`encode`] places
/// after the closing delimiter is not part of the body.
pub fn decode(raw: &str) -> Document {
    let mut lines = raw.split_inclusive('\n');

    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return unframed(raw),
    }

    let mut offset = raw.find('\n').map_or(raw.len(), |i| i + 1);
    let mut frontmatter = Frontmatter::new();

    for line in lines {
        offset += line.len();
        if is_delimiter(line) {
            return Document {
                frontmatter,
                body: strip_line_ending(&raw[offset..]).to_string(),
            };
        }
        if let Some((key, value)) = parse_field(line) {
            frontmatter.insert(key, value);
        }
    }

    unframed(raw)
}

fn unframed(raw: &str) -> Document {
    Document {
        frontmatter: Frontmatter::new(),
        body: raw.to_string(),
    }
}

/// Prefix `body` with a frontmatter block. Values are written as given.
pub fn encode(frontmatter: &Frontmatter, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in frontmatter.iter() {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "just body\nno delimiters";
        let doc = decode(content);
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn parse_unterminated_block_is_body() {
        let content = "---\ntitle: hello\nstill going";
        let doc = decode(content);
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn parse_frontmatter_and_body() {
        let content = "---\ntitle: \"Hello\"\ngenre: tech\n---\n\n# Heading\n\nText";
        let doc = decode(content);
        assert_eq!(doc.frontmatter.get("title"), Some("Hello"));
        assert_eq!(doc.frontmatter.get("genre"), Some("tech"));
        assert_eq!(doc.body, "# Heading\n\nText");
    }

    #[test]
    fn value_keeps_later_colons() {
        let doc = decode("---\nexcerpt: \"Rust: a love story: part 2\"\nurl: https://x.dev\n---\n");
        assert_eq!(
            doc.frontmatter.get("excerpt"),
            Some("Rust: a love story: part 2")
        );
        assert_eq!(doc.frontmatter.get("url"), Some("https://x.dev"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let doc = decode("---\njunk line\ntitle: ok\n---\nbody");
        assert_eq!(doc.frontmatter.len(), 1);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn crlf_delimiters_are_recognized() {
        let doc = decode("---\r\ntitle: win\r\n---\r\n\r\nbody\r\n");
        assert_eq!(doc.frontmatter.get("title"), Some("win"));
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn encode_preserves_caller_order() {
        let fm = Frontmatter::new()
            .with("title", quote("Post"))
            .with("date", "2024-01-15")
            .with("genre", "tech");
        assert_eq!(
            encode(&fm, "Body"),
            "---\ntitle: \"Post\"\ndate: 2024-01-15\ngenre: tech\n---\n\nBody"
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut fm = Frontmatter::new().with("a", "1").with("b", "2");
        fm.insert("a", "3");
        let keys: Vec<_> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(fm.get("a"), Some("3"));
    }

    #[test]
    fn round_trip_reproduces_fields_and_body() {
        let cases = [
            ("", Frontmatter::new()),
            (
                "line one\n\n---\nnot frontmatter\n",
                Frontmatter::new().with("title", "x"),
            ),
            (
                "\n\nleading blank lines",
                [("title", "A: B"), ("date", "2024-01-15"), ("empty", "")]
                    .into_iter()
                    .collect(),
            ),
        ];
        for (body, fields) in cases {
            let doc = decode(&encode(&fields, body));
            assert_eq!(doc.frontmatter, fields);
            assert_eq!(doc.body, body);
        }
    }
}
