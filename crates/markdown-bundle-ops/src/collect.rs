//! File collection: resolve include/exclude globs into a deduplicated list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use markdown_bundle_config::BuildSettings;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Resolve the configured include/exclude patterns against `source_dir`.
///
/// Returns paths relative to `source_dir`, sorted and deduplicated: a file
/// matched by two overlapping include patterns appears once. Only regular
/// files are returned. An empty result is not an error here; the
/// orchestrator decides whether that fails the build.
pub fn collect(source_dir: &Path, build: &BuildSettings) -> Vec<PathBuf> {
    let include = build.include.build_set();
    let exclude = build.exclude.build_set();

    let mut collected: BTreeSet<PathBuf> = BTreeSet::new();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_dir) else {
            continue;
        };
        if is_hidden(relative) {
            continue;
        }
        if !include.is_match(relative) {
            continue;
        }
        if exclude.is_match(relative) {
            continue;
        }
        collected.insert(relative.to_path_buf());
    }

    debug!(
        count = collected.len(),
        source = %source_dir.display(),
        "collected input files"
    );
    collected.into_iter().collect()
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
    })
}
