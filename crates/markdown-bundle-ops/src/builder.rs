//! The build orchestrator.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use markdown_bundle_ast::MarkdownTree;
use markdown_bundle_config::Config;
use markdown_bundle_format::BuildReport;
use markdown_bundle_graph::toposort;
use markdown_bundle_parser::{split_frontmatter, Document, FrontmatterOutcome};
use markdown_bundle_transform::{collapse_blank_lines, TransformPass, TransformRegistry};
use markdown_bundle_utils::{atomic_write, estimate_tokens};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{collect, combine, BuildError};

/// Wires the pipeline stages together. One `Builder` owns its configuration
/// and pass registry; nothing is shared across instances.
pub struct Builder {
    config: Config,
    registry: TransformRegistry,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        let registry = TransformRegistry::from_settings(&config.build);
        debug!(passes = ?registry.names(), "assembled optimizer pipeline");
        Builder { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Attach an extra optimizer pass ahead of the build. This is the
    /// extension point replacing runtime plugin loading.
    pub fn register_pass(&mut self, pass: Box<dyn TransformPass>) {
        self.registry.register(pass);
    }

    /// Run a single build pass. Fails without writing anything if any stage
    /// fails; the output file is replaced atomically on success.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let started = Instant::now();
        let source_dir = &self.config.directories.source;
        let output_path = &self.config.directories.output;

        let mut files = collect(source_dir, &self.config.build);
        // An output path inside the source tree must not feed back into the
        // next build.
        if let Ok(output_relative) = output_path.strip_prefix(source_dir) {
            files.retain(|file| file != output_relative);
        }
        if files.is_empty() {
            return Err(BuildError::NoInputs {
                dir: source_dir.clone(),
                patterns: self.config.build.include.originals(),
            });
        }

        let documents = self.parse_stage(&files)?;
        debug!(count = documents.len(), "parsed documents");

        let sorted = toposort(documents, self.config.build.sort);
        if sorted.had_cycle() {
            warn!(
                members = ?sorted.cycle_members,
                "dependency cycle detected; affected documents placed in fallback order"
            );
        }

        let combined = combine(&sorted.documents, &self.config.build);
        let optimized = self.optimize(&combined);

        atomic_write(output_path, &optimized).map_err(|source| BuildError::Write {
            path: output_path.clone(),
            source,
        })?;

        let report = BuildReport::new(
            files.len(),
            estimate_tokens(&optimized),
            started.elapsed().as_millis(),
            output_path.clone(),
        );
        info!(
            files = report.file_count,
            tokens = report.token_count,
            elapsed_ms = report.build_time_ms,
            "build complete"
        );
        Ok(report)
    }

    /// Run the watch loop: rebuild on debounced file-system changes, never
    /// returning under normal operation. See [`crate::watch`].
    pub fn watch(&self) -> Result<(), BuildError> {
        crate::watch::run(self)
    }

    fn parse_stage(&self, files: &[PathBuf]) -> Result<Vec<Document>, BuildError> {
        let source_dir = &self.config.directories.source;
        files
            .par_iter()
            .map(|relative| {
                let absolute = source_dir.join(relative);
                let contents = fs::read_to_string(&absolute).map_err(|source| BuildError::Io {
                    path: absolute.clone(),
                    source,
                })?;
                let (document, outcome) = Document::parse(relative.clone(), &contents);
                if let FrontmatterOutcome::Malformed(message) = &outcome {
                    warn!(
                        path = %relative.display(),
                        error = %message,
                        "malformed frontmatter; treating document as metadata-free"
                    );
                }
                Ok(document)
            })
            .collect()
    }

    /// Run the optimizer pipeline over the combined document. Frontmatter
    /// blocks that survived combination are shielded behind placeholder
    /// comments so the Markdown parser never sees their fences.
    fn optimize(&self, combined: &str) -> String {
        let (shielded, frontmatter) =
            shield_frontmatter(combined, &self.config.build.file_separator);
        let mut tree = MarkdownTree::parse(&shielded);
        self.registry.apply(&mut tree);
        let rendered = tree.render();
        let restored = restore_frontmatter(&rendered, &frontmatter);
        collapse_blank_lines(&restored)
    }
}

const FRONTMATTER_SHIELD_PREFIX: &str = "<!-- markdown-bundle:frontmatter:";

/// Replace each segment-leading frontmatter block with a placeholder
/// comment. Returns the shielded text and the extracted blocks in order.
fn shield_frontmatter(combined: &str, separator: &str) -> (String, Vec<String>) {
    let mut extracted: Vec<String> = Vec::new();
    let shielded: Vec<String> = combined
        .split(separator)
        .map(|segment| match split_frontmatter(segment) {
            (Some(yaml), body) => {
                let index = extracted.len();
                extracted.push(format!("---\n{yaml}---"));
                format!("{FRONTMATTER_SHIELD_PREFIX}{index} -->\n{body}")
            }
            (None, _) => segment.to_string(),
        })
        .collect();
    (shielded.join(separator), extracted)
}

/// Swap placeholder comments back for the original frontmatter blocks.
fn restore_frontmatter(rendered: &str, frontmatter: &[String]) -> String {
    let mut restored = rendered.to_string();
    for (index, block) in frontmatter.iter().enumerate() {
        let placeholder = format!("{FRONTMATTER_SHIELD_PREFIX}{index} -->");
        restored = restored.replace(&placeholder, block);
    }
    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_and_restore_round_trip() {
        let separator = "\n\n---\n\n";
        let combined = "---\ntitle: A\n---\n\nAlpha.\n\n---\n\n---\ntitle: B\n---\n\nBeta.";
        let (shielded, frontmatter) = shield_frontmatter(combined, separator);
        assert_eq!(frontmatter.len(), 2);
        assert!(!shielded.contains("title: A"));
        assert!(shielded.contains(FRONTMATTER_SHIELD_PREFIX));

        let restored = restore_frontmatter(&shielded, &frontmatter);
        assert!(restored.contains("---\ntitle: A\n---"));
        assert!(restored.contains("---\ntitle: B\n---"));
    }

    #[test]
    fn shield_is_a_no_op_without_frontmatter() {
        let (shielded, frontmatter) = shield_frontmatter("Alpha.\n\n---\n\nBeta.", "\n\n---\n\n");
        assert_eq!(shielded, "Alpha.\n\n---\n\nBeta.");
        assert!(frontmatter.is_empty());
    }
}
