//! Core orchestration layer for markdown-bundle.

use markdown_bundle_config::Config;
use markdown_bundle_ops::Builder;

/// Entry point for higher-level consumers (CLI, embedding tools, etc.).
pub struct MarkdownBundle {
    builder: Builder,
}

impl MarkdownBundle {
    /// Bootstrap the bundle engine from configuration.
    pub fn bootstrap(config: Config) -> Self {
        Self {
            builder: Builder::new(config),
        }
    }

    /// Access the build pipeline.
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Mutable access, for registering extra optimizer passes before a build.
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
}
