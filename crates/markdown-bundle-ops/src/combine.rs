//! Document combination and table-of-contents generation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use markdown_bundle_config::BuildSettings;
use markdown_bundle_parser::Document;

/// Join the sorted documents into the final bundle body. Bodies are joined
/// with the configured file separator; when TOC generation is enabled the
/// generated block is prepended, separated the same way.
pub fn combine(documents: &[Document], build: &BuildSettings) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(documents.len() + 1);

    if build.toc.enabled {
        let toc = generate_toc(documents, build);
        if !toc.is_empty() {
            segments.push(toc);
        }
    }

    for document in documents {
        // Per-document `strip` frontmatter overrides the global setting.
        let strip = document.meta.strip.unwrap_or(build.frontmatter.strip);
        let content = if strip {
            document.body.as_str()
        } else {
            document.raw.as_str()
        };
        segments.push(content.trim_matches('\n').to_string());
    }

    let mut combined = segments.join(&build.file_separator);
    if !combined.is_empty() && !combined.ends_with('\n') {
        combined.push('\n');
    }
    combined
}

/// Render a nested link list over every heading in the sorted sequence, up
/// to the configured depth. Anchors are slugified heading text; duplicate
/// headings get `-1`, `-2`, … suffixes so every entry stays addressable.
pub fn generate_toc(documents: &[Document], build: &BuildSettings) -> String {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut lines: Vec<String> = Vec::new();

    for document in documents {
        for section in &document.sections {
            if section.depth > build.toc.depth {
                continue;
            }
            let anchor = match seen.entry(section.anchor.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(0usize);
                    section.anchor.clone()
                }
                Entry::Occupied(mut entry) => {
                    *entry.get_mut() += 1;
                    format!("{}-{}", section.anchor, entry.get())
                }
            };
            let indent = "  ".repeat(usize::from(section.depth.saturating_sub(1)));
            lines.push(format!("{indent}- [{}](#{anchor})", section.title));
        }
    }

    if lines.is_empty() {
        return String::new();
    }

    format!("## {}\n\n{}", build.toc.title, lines.join("\n"))
}
