//! Optimizer passes for the combined bundle document.
//!
//! Every pass is a pure tree rewrite and idempotent: applying a pass twice
//! produces the same tree as applying it once. Passes never see the inside
//! of code blocks or code spans; those are separate node types in the ast
//! crate and no pass visits their content.
//!
//! Passes are registered through a compile-time table selected by build
//! settings. Additional passes can be attached with
//! [`TransformRegistry::register`] before the build runs; there is no
//! runtime module loading.

mod passes;

use markdown_bundle_ast::MarkdownTree;
use markdown_bundle_config::BuildSettings;

pub use passes::{
    NormalizeHeadings, NormalizeWhitespace, RemoveBadges, RemoveDuplicates, RemoveInternalLinks,
    StripHeadingNumbers, StripSectionMeta,
};

/// A single optimizer pass.
pub trait TransformPass {
    fn name(&self) -> &'static str;
    fn apply(&self, tree: &mut MarkdownTree);
}

/// Ordered collection of passes applied to the combined document.
pub struct TransformRegistry {
    passes: Vec<Box<dyn TransformPass>>,
}

impl TransformRegistry {
    /// Assemble the standard pass pipeline for the given settings.
    /// Link unwrapping, duplicate removal, and whitespace normalisation
    /// always run; the remaining passes are toggled by configuration.
    pub fn from_settings(build: &BuildSettings) -> Self {
        let mut registry = TransformRegistry { passes: Vec::new() };
        registry.register(Box::new(RemoveInternalLinks));
        if build.remove_badges {
            registry.register(Box::new(RemoveBadges));
        }
        if build.strip_section_meta {
            registry.register(Box::new(StripSectionMeta));
        }
        if build.strip_heading_numbers {
            registry.register(Box::new(StripHeadingNumbers));
        }
        if build.normalize_headings {
            registry.register(Box::new(NormalizeHeadings));
        }
        registry.register(Box::new(RemoveDuplicates));
        registry.register(Box::new(NormalizeWhitespace));
        registry
    }

    /// Attach an additional pass to the end of the pipeline.
    pub fn register(&mut self, pass: Box<dyn TransformPass>) {
        self.passes.push(pass);
    }

    /// Names of the registered passes, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass over the tree, in order.
    pub fn apply(&self, tree: &mut MarkdownTree) {
        for pass in &self.passes {
            pass.apply(tree);
        }
    }
}

/// Post-stringify cleanup: collapse runs of three or more blank lines down
/// to two. Lines inside fenced code blocks are left untouched.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    let mut fence: Option<(char, usize)> = None;

    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        let trimmed = body.trim_start();

        match fence {
            Some((fence_char, fence_len)) => {
                out.push_str(line);
                let run = leading_run(trimmed, fence_char);
                if run >= fence_len && trimmed.chars().all(|ch| ch == fence_char) {
                    fence = None;
                }
                blank_run = 0;
                continue;
            }
            None => {
                if let Some(opened) = detect_fence(trimmed) {
                    fence = Some(opened);
                    out.push_str(line);
                    blank_run = 0;
                    continue;
                }
            }
        }

        if body.trim().is_empty() {
            blank_run += 1;
            if blank_run <= 2 {
                out.push_str(line);
            }
        } else {
            blank_run = 0;
            out.push_str(line);
        }
    }

    out
}

fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = leading_run(trimmed, first);
    if run >= 3 {
        Some((first, run))
    } else {
        None
    }
}

fn leading_run(text: &str, marker: char) -> usize {
    text.chars().take_while(|ch| *ch == marker).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_bundle_config::{Config, LoadOptions};

    fn default_build() -> markdown_bundle_config::BuildSettings {
        let temp = tempfile::TempDir::new().expect("tempdir");
        Config::load(LoadOptions::default().with_working_dir(temp.path()))
            .expect("default config")
            .build
    }

    #[test]
    fn registry_respects_toggles() {
        let mut build = default_build();
        build.strip_section_meta = false;
        build.strip_heading_numbers = false;
        let names = TransformRegistry::from_settings(&build).names();
        assert!(names.contains(&"remove-duplicates"));
        assert!(names.contains(&"remove-internal-links"));
        assert!(names.contains(&"normalize-whitespace"));
        assert!(!names.contains(&"strip-section-meta"));
        assert!(!names.contains(&"strip-heading-numbers"));
    }

    #[test]
    fn collapse_blank_lines_caps_runs_at_two() {
        let collapsed = collapse_blank_lines("a\n\n\n\n\nb\n");
        assert_eq!(collapsed, "a\n\n\nb\n");
    }

    #[test]
    fn collapse_blank_lines_skips_fenced_code() {
        let input = "```\nx\n\n\n\ny\n```\n";
        assert_eq!(collapse_blank_lines(input), input);
    }

    #[test]
    fn collapse_blank_lines_is_idempotent() {
        let input = "a\n\n\n\nb\n\n```\n\n\n\n\n```\n\n\n\nc\n";
        let once = collapse_blank_lines(input);
        assert_eq!(collapse_blank_lines(&once), once);
    }
}
