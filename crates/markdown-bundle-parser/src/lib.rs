//! Document parsing for the markdown-bundle pipeline.
//!
//! A [`Document`] is one collected Markdown file after frontmatter
//! extraction: typed metadata, the body with frontmatter removed, and the
//! heading-delimited sections derived from the body. Documents are created
//! once per build pass and never mutated afterwards.

use std::path::{Path, PathBuf};

use markdown_bundle_ast::{outline, MarkdownTree};
use serde::Deserialize;

/// One source Markdown file after parsing.
#[derive(Clone, Debug)]
pub struct Document {
    /// Relative path; unique identifier within a build.
    pub path: PathBuf,
    pub meta: DocumentMeta,
    /// Raw file contents, frontmatter included.
    pub raw: String,
    /// Markdown content with frontmatter removed.
    pub body: String,
    /// Heading-delimited outline of the body.
    pub sections: Vec<Section>,
}

/// Recognised frontmatter metadata. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentMeta {
    #[serde(alias = "dependsOn")]
    pub depends_on: Vec<String>,
    pub layer: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub strip: Option<bool>,
}

/// Heading-delimited section summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub depth: u8,
    pub title: String,
    pub anchor: String,
}

/// Outcome of splitting frontmatter off a raw file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontmatterOutcome {
    /// No frontmatter fence at the top of the file.
    Absent,
    /// Frontmatter parsed into metadata.
    Parsed,
    /// A fence was present but the YAML did not deserialise; the document
    /// falls back to empty metadata rather than failing the build.
    Malformed(String),
}

impl Document {
    /// Parse file contents into a document keyed by `path`.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> (Document, FrontmatterOutcome) {
        let (frontmatter, body) = split_frontmatter(contents);

        let (meta, outcome) = match frontmatter {
            None => (DocumentMeta::default(), FrontmatterOutcome::Absent),
            Some(yaml) => match serde_yaml::from_str::<DocumentMeta>(yaml) {
                Ok(meta) => (meta, FrontmatterOutcome::Parsed),
                Err(err) => (
                    DocumentMeta::default(),
                    FrontmatterOutcome::Malformed(err.to_string()),
                ),
            },
        };

        let sections = sections_of(body);

        (
            Document {
                path: path.into(),
                meta,
                raw: contents.to_string(),
                body: body.to_string(),
                sections,
            },
            outcome,
        )
    }

    /// Identifier used in `depends_on` references: the relative path with
    /// forward slashes.
    pub fn id(&self) -> String {
        path_id(&self.path)
    }
}

/// Normalise a relative path into the identifier form used by `depends_on`.
pub fn path_id(path: &Path) -> String {
    let mut id = String::new();
    for component in path.components() {
        if !id.is_empty() {
            id.push('/');
        }
        id.push_str(&component.as_os_str().to_string_lossy());
    }
    id
}

/// Split a leading YAML frontmatter block from `contents`. The opening fence
/// must be the very first line; a block that never closes is treated as
/// absent rather than swallowing the whole file.
pub fn split_frontmatter(contents: &str) -> (Option<&str>, &str) {
    let mut lines = contents.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, contents);
    };
    if first.trim_end() != "---" {
        return (None, contents);
    }

    let mut offset = first.len();
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &contents[first.len()..offset];
            let body = &contents[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, contents)
}

/// Derive the heading outline of a Markdown body.
pub fn sections_of(body: &str) -> Vec<Section> {
    let tree = MarkdownTree::parse(body);
    outline(&tree.blocks)
        .into_iter()
        .map(|entry| Section {
            depth: entry.level,
            anchor: generate_anchor(&entry.text),
            title: entry.text,
        })
        .collect()
}

/// Convert heading text into a stable anchor identifier.
pub fn generate_anchor(text: &str) -> String {
    let mut anchor = String::new();
    let mut last_was_dash = false;

    for ch in text.chars().flat_map(|c| c.to_lowercase()) {
        if ch.is_alphanumeric() {
            anchor.push(ch);
            last_was_dash = false;
        } else if (ch.is_whitespace() || ch == '-') && !anchor.is_empty() && !last_was_dash {
            anchor.push('-');
            last_was_dash = true;
        }
    }

    if anchor.ends_with('-') {
        anchor.pop();
    }

    anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frontmatter_metadata() {
        let contents = "---\ntitle: Guide\nlayer: core\ndependsOn:\n  - intro.md\n---\n\n# Guide\n";
        let (doc, outcome) = Document::parse("guide.md", contents);
        assert_eq!(outcome, FrontmatterOutcome::Parsed);
        assert_eq!(doc.meta.title.as_deref(), Some("Guide"));
        assert_eq!(doc.meta.layer.as_deref(), Some("core"));
        assert_eq!(doc.meta.depends_on, vec!["intro.md".to_string()]);
        assert_eq!(doc.body, "\n# Guide\n");
    }

    #[test]
    fn malformed_frontmatter_falls_back_to_empty_metadata() {
        let contents = "---\ntitle: [unclosed\n---\n\nBody.\n";
        let (doc, outcome) = Document::parse("bad.md", contents);
        assert!(matches!(outcome, FrontmatterOutcome::Malformed(_)));
        assert_eq!(doc.meta, DocumentMeta::default());
        assert_eq!(doc.body, "\nBody.\n");
    }

    #[test]
    fn unterminated_fence_is_not_frontmatter() {
        let contents = "---\ntitle: Guide\n\nBody without closing fence.\n";
        let (doc, outcome) = Document::parse("open.md", contents);
        assert_eq!(outcome, FrontmatterOutcome::Absent);
        assert_eq!(doc.body, contents);
    }

    #[test]
    fn fence_must_start_the_file() {
        let contents = "intro\n---\ntitle: Guide\n---\n";
        let (_, outcome) = Document::parse("mid.md", contents);
        assert_eq!(outcome, FrontmatterOutcome::Absent);
    }

    #[test]
    fn sections_skip_code_block_headings() {
        let body = "# One\n\n```\n# not a heading\n```\n\n## Two\n";
        let sections = sections_of(body);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "One");
        assert_eq!(sections[1].depth, 2);
        assert_eq!(sections[1].anchor, "two");
    }

    #[test]
    fn anchor_generation_handles_punctuation_and_case() {
        assert_eq!(generate_anchor("Getting Started"), "getting-started");
        assert_eq!(generate_anchor("São Tomé & Príncipe"), "são-tomé-príncipe");
        assert_eq!(generate_anchor("a - b"), "a-b");
    }

    #[test]
    fn path_id_uses_forward_slashes() {
        let path = Path::new("guides").join("setup.md");
        assert_eq!(path_id(&path), "guides/setup.md");
    }
}
