//! The optimizer pass implementations.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use markdown_bundle_ast::{each_inline_list_mut, plain_text, Block, Inline, MarkdownTree};
use regex::Regex;

use crate::TransformPass;

const HEADING_CONTEXT_SEPARATOR: &str = " / ";

/// Removes a paragraph when an earlier top-level paragraph carried identical
/// normalised text. The first occurrence is always kept; paragraphs whose
/// text trims to nothing are never treated as duplicates.
pub struct RemoveDuplicates;

impl TransformPass for RemoveDuplicates {
    fn name(&self) -> &'static str {
        "remove-duplicates"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        let mut seen: HashSet<String> = HashSet::new();
        tree.blocks.retain(|block| {
            let Block::Paragraph { content } = block else {
                return true;
            };
            let text = plain_text(content).trim().to_string();
            if text.is_empty() {
                return true;
            }
            seen.insert(text)
        });
    }
}

/// Unwraps links that point at relative `.md` targets, keeping the label.
/// Combined documents have no files to link to, so `[See docs](./guide.md)`
/// becomes plain `See docs`. Absolute URLs and non-Markdown targets stay.
pub struct RemoveInternalLinks;

impl RemoveInternalLinks {
    fn is_internal(destination: &str) -> bool {
        let path = destination.split('#').next().unwrap_or(destination);
        (path.starts_with("./") || path.starts_with("../")) && path.ends_with(".md")
    }

    fn unwrap_in(content: &mut Vec<Inline>) {
        let mut rewritten: Vec<Inline> = Vec::with_capacity(content.len());
        for mut inline in content.drain(..) {
            match &mut inline {
                Inline::Link {
                    destination,
                    content: children,
                    ..
                } if Self::is_internal(destination) => {
                    let mut children = std::mem::take(children);
                    Self::unwrap_in(&mut children);
                    rewritten.extend(children);
                    continue;
                }
                Inline::Emphasis(children)
                | Inline::Strong(children)
                | Inline::Strikethrough(children) => Self::unwrap_in(children),
                Inline::Link {
                    content: children, ..
                }
                | Inline::Image {
                    content: children, ..
                } => Self::unwrap_in(children),
                _ => {}
            }
            rewritten.push(inline);
        }
        *content = rewritten;
    }
}

impl TransformPass for RemoveInternalLinks {
    fn name(&self) -> &'static str {
        "remove-internal-links"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        each_inline_list_mut(&mut tree.blocks, &mut |content| {
            Self::unwrap_in(content);
        });
    }
}

/// Strips a leading `2.1. `-style numeric prefix from heading text. The
/// prefix is removed repeatedly until none remains so the pass converges in
/// a single application.
pub struct StripHeadingNumbers;

impl StripHeadingNumbers {
    fn prefix_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)*\.\s+").expect("valid heading prefix regex"))
    }

    fn strip(content: &mut [Inline]) {
        if let Some(Inline::Text(text)) = content.first_mut() {
            let regex = Self::prefix_regex();
            loop {
                match regex.replace(text.as_str(), "") {
                    Cow::Borrowed(_) => break,
                    Cow::Owned(stripped) => *text = stripped,
                }
            }
        }
    }
}

impl TransformPass for StripHeadingNumbers {
    fn name(&self) -> &'static str {
        "strip-heading-numbers"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        for_each_heading_mut(&mut tree.blocks, &mut |_, content| {
            Self::strip(content);
        });
    }
}

/// Removes `<!-- section-meta ... -->` comment blocks, single- or
/// multi-line. Any other HTML comment is preserved untouched.
pub struct StripSectionMeta;

impl StripSectionMeta {
    fn meta_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?s)^\s*<!--\s*section-meta\b.*-->\s*$")
                .expect("valid section-meta regex")
        })
    }

    fn is_meta(literal: &str) -> bool {
        Self::meta_regex().is_match(literal)
    }
}

impl TransformPass for StripSectionMeta {
    fn name(&self) -> &'static str {
        "strip-section-meta"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        markdown_bundle_ast::retain_blocks(&mut tree.blocks, &mut |block| match block {
            Block::HtmlBlock { literal } => !Self::is_meta(literal),
            _ => true,
        });
        each_inline_list_mut(&mut tree.blocks, &mut |content| {
            content.retain(|inline| match inline {
                Inline::Html(html) => !Self::is_meta(html),
                _ => true,
            });
        });
    }
}

/// Trims trailing spaces and tabs from text nodes at line ends. The
/// stringify-level companion, [`crate::collapse_blank_lines`], caps blank
/// runs in the rendered output.
pub struct NormalizeWhitespace;

impl NormalizeWhitespace {
    fn trim_in(content: &mut Vec<Inline>) {
        let len = content.len();
        for index in 0..len {
            let at_line_end = index + 1 == len
                || matches!(
                    content.get(index + 1),
                    Some(Inline::SoftBreak) | Some(Inline::HardBreak)
                );
            match &mut content[index] {
                Inline::Text(text) => {
                    if at_line_end {
                        let trimmed = text.trim_end_matches([' ', '\t']);
                        if trimmed.len() != text.len() {
                            *text = trimmed.to_string();
                        }
                    }
                }
                Inline::Emphasis(children)
                | Inline::Strong(children)
                | Inline::Strikethrough(children) => Self::trim_in(children),
                Inline::Link {
                    content: children, ..
                }
                | Inline::Image {
                    content: children, ..
                } => Self::trim_in(children),
                _ => {}
            }
        }
    }
}

impl TransformPass for NormalizeWhitespace {
    fn name(&self) -> &'static str {
        "normalize-whitespace"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        each_inline_list_mut(&mut tree.blocks, &mut |content| {
            Self::trim_in(content);
        });
    }
}

/// Rewrites nested heading text to carry its ancestor context, so hierarchy
/// survives when the combined document is later chunked. `## Usage` under
/// `# Parser` becomes `## Parser / Usage`; top-level headings are left
/// alone. Headings already carrying their prefix are not rewritten again.
pub struct NormalizeHeadings;

impl TransformPass for NormalizeHeadings {
    fn name(&self) -> &'static str {
        "normalize-headings"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        let mut ancestors: Vec<(u8, String)> = Vec::new();
        for block in &mut tree.blocks {
            let Block::Heading { level, content } = block else {
                continue;
            };
            let level = *level;
            while ancestors
                .last()
                .is_some_and(|(ancestor_level, _)| *ancestor_level >= level)
            {
                ancestors.pop();
            }

            let own = plain_text(content);
            let full = match ancestors.last() {
                None => own,
                Some((_, parent_full)) => {
                    let prefix = format!("{parent_full}{HEADING_CONTEXT_SEPARATOR}");
                    if own.starts_with(&prefix) {
                        own
                    } else {
                        let full = format!("{prefix}{own}");
                        *content = vec![Inline::Text(full.clone())];
                        full
                    }
                }
            };
            ancestors.push((level, full));
        }
    }
}

/// Drops badge images (shields and CI status icons) and prunes paragraphs
/// left empty by the removal. A link wrapping nothing but a badge is removed
/// with it.
pub struct RemoveBadges;

const BADGE_HOSTS: &[&str] = &[
    "img.shields.io",
    "shields.io",
    "badge.fury.io",
    "badgen.net",
    "api.travis-ci.org",
    "api.travis-ci.com",
    "circleci.com",
    "codecov.io",
    "coveralls.io",
];

impl RemoveBadges {
    fn is_badge(destination: &str) -> bool {
        let Some(rest) = destination
            .strip_prefix("https://")
            .or_else(|| destination.strip_prefix("http://"))
        else {
            return false;
        };
        let host = rest.split('/').next().unwrap_or(rest);
        BADGE_HOSTS.contains(&host)
    }

    fn remove_in(content: &mut Vec<Inline>) {
        content.retain_mut(|inline| match inline {
            Inline::Image { destination, .. } => !Self::is_badge(destination),
            Inline::Link {
                content: children, ..
            } => {
                let had_images = children
                    .iter()
                    .any(|child| matches!(child, Inline::Image { .. }));
                Self::remove_in(children);
                // A wrapper link whose badge content vanished goes with it.
                !(had_images && children.is_empty())
            }
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children) => {
                Self::remove_in(children);
                true
            }
            _ => true,
        });
    }

    fn is_blank(content: &[Inline]) -> bool {
        content.iter().all(|inline| match inline {
            Inline::Text(text) => text.trim().is_empty(),
            Inline::SoftBreak | Inline::HardBreak => true,
            _ => false,
        })
    }
}

impl TransformPass for RemoveBadges {
    fn name(&self) -> &'static str {
        "remove-badges"
    }

    fn apply(&self, tree: &mut MarkdownTree) {
        each_inline_list_mut(&mut tree.blocks, &mut |content| {
            Self::remove_in(content);
        });
        tree.blocks.retain(|block| match block {
            Block::Paragraph { content } => !Self::is_blank(content),
            _ => true,
        });
    }
}

/// Apply `func` to every heading in the tree, including headings nested in
/// quotes and list items.
fn for_each_heading_mut<F>(blocks: &mut [Block], func: &mut F)
where
    F: FnMut(u8, &mut Vec<Inline>),
{
    for block in blocks {
        match block {
            Block::Heading { level, content } => func(*level, content),
            Block::BlockQuote { blocks } => for_each_heading_mut(blocks, func),
            Block::List { items, .. } => {
                for item in items {
                    for_each_heading_mut(item, func);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_bundle_ast::MarkdownTree;

    fn apply_pass(pass: &dyn TransformPass, input: &str) -> String {
        let mut tree = MarkdownTree::parse(input);
        pass.apply(&mut tree);
        tree.render()
    }

    fn assert_idempotent(pass: &dyn TransformPass, input: &str) {
        let mut once = MarkdownTree::parse(input);
        pass.apply(&mut once);
        let mut twice = once.clone();
        pass.apply(&mut twice);
        assert_eq!(once, twice, "pass {} is not idempotent", pass.name());
    }

    #[test]
    fn remove_duplicates_keeps_first_occurrence() {
        let output = apply_pass(&RemoveDuplicates, "X\n\n## H\n\nX\n");
        assert_eq!(output.matches('X').count(), 1);
        assert!(output.contains("## H"));
    }

    #[test]
    fn remove_duplicates_ignores_empty_paragraphs() {
        // Image-only paragraphs have empty plain text; neither is removed.
        let input = "![](a.png)\n\ntext\n\n![](b.png)\n";
        let output = apply_pass(&RemoveDuplicates, input);
        assert!(output.contains("a.png"));
        assert!(output.contains("b.png"));
    }

    #[test]
    fn remove_internal_links_unwraps_relative_md_targets() {
        let output = apply_pass(&RemoveInternalLinks, "[See docs](./guide.md)\n");
        assert!(output.contains("See docs"));
        assert!(!output.contains("./guide.md"));

        let output = apply_pass(&RemoveInternalLinks, "[deep](../../api/ref.md#anchor)\n");
        assert!(output.contains("deep"));
        assert!(!output.contains("ref.md"));
    }

    #[test]
    fn remove_internal_links_keeps_external_targets() {
        let input = "[GitHub](https://github.com)\n";
        assert_eq!(apply_pass(&RemoveInternalLinks, input), input);

        let input = "[asset](./logo.png)\n";
        assert_eq!(apply_pass(&RemoveInternalLinks, input), input);
    }

    #[test]
    fn strip_heading_numbers_removes_numeric_prefix() {
        let output = apply_pass(&StripHeadingNumbers, "## 2.1. Getting Started\n");
        assert_eq!(output, "## Getting Started\n");
    }

    #[test]
    fn strip_heading_numbers_leaves_plain_headings() {
        let input = "## Getting Started\n";
        assert_eq!(apply_pass(&StripHeadingNumbers, input), input);
        // No trailing dot means no prefix.
        let input = "## 42 is the answer\n";
        assert_eq!(apply_pass(&StripHeadingNumbers, input), input);
    }

    #[test]
    fn strip_heading_numbers_never_touches_code() {
        let input = "```\n## 1. keep\n```\n";
        assert_eq!(apply_pass(&StripHeadingNumbers, input), input);
    }

    #[test]
    fn strip_section_meta_removes_matching_comments() {
        let input = "<!-- section-meta owner: docs -->\n\ntext\n";
        let output = apply_pass(&StripSectionMeta, input);
        assert!(!output.contains("section-meta"));
        assert!(output.contains("text"));
    }

    #[test]
    fn strip_section_meta_handles_multi_line_blocks() {
        let input = "<!-- section-meta\nowner: docs\nreviewed: 2024\n-->\n\ntext\n";
        let output = apply_pass(&StripSectionMeta, input);
        assert!(!output.contains("owner: docs"));
        assert!(output.contains("text"));
    }

    #[test]
    fn strip_section_meta_preserves_other_comments() {
        let input = "<!-- plain note -->\n\ntext\n";
        let output = apply_pass(&StripSectionMeta, input);
        assert!(output.contains("<!-- plain note -->"));
    }

    #[test]
    fn normalize_headings_prepends_ancestor_context() {
        let output = apply_pass(&NormalizeHeadings, "# Parser\n\n## Usage\n\n### Flags\n");
        assert!(output.contains("# Parser\n"));
        assert!(output.contains("## Parser / Usage\n"));
        assert!(output.contains("### Parser / Usage / Flags\n"));
    }

    #[test]
    fn normalize_headings_leaves_top_level_alone() {
        let input = "# One\n\n# Two\n";
        assert_eq!(apply_pass(&NormalizeHeadings, input), input);
    }

    #[test]
    fn remove_badges_drops_shield_images() {
        let input = "[![CI](https://img.shields.io/badge/ci-green)](https://ci.example.com)\n\ntext\n";
        let output = apply_pass(&RemoveBadges, input);
        assert!(!output.contains("shields.io"));
        assert!(!output.contains("ci.example.com"));
        assert!(output.contains("text"));
    }

    #[test]
    fn remove_badges_keeps_ordinary_images() {
        let input = "![diagram](./assets/flow.png)\n";
        assert_eq!(apply_pass(&RemoveBadges, input), input);
    }

    #[test]
    fn every_pass_is_idempotent() {
        let input = concat!(
            "# 1. Top\n\n",
            "<!-- section-meta owner: docs -->\n\n",
            "Shared paragraph.\n\n",
            "## 1.1. Nested   \n\n",
            "Shared paragraph.\n\n",
            "[See docs](./guide.md) and [GitHub](https://github.com)\n\n",
            "[![CI](https://img.shields.io/badge/ci-green)](https://ci.example.com)\n\n",
            "```\n## 2. untouched   \n```\n",
        );
        let passes: Vec<Box<dyn TransformPass>> = vec![
            Box::new(RemoveDuplicates),
            Box::new(RemoveInternalLinks),
            Box::new(StripHeadingNumbers),
            Box::new(StripSectionMeta),
            Box::new(NormalizeWhitespace),
            Box::new(NormalizeHeadings),
            Box::new(RemoveBadges),
        ];
        for pass in &passes {
            assert_idempotent(pass.as_ref(), input);
        }
    }
}
