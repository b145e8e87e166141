use std::fs;
use std::path::{Path, PathBuf};

use markdown_bundle_config::{Config, ConfigError, ConfigSourceKind, LoadOptions, SortOrder};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    fs::write(path, contents).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.directories.source, working_dir.join("."));
    assert_eq!(config.directories.output, working_dir.join("BUNDLE.md"));
    assert_eq!(
        config.build.include.originals(),
        vec!["**/*.md".to_string()]
    );
    assert!(config
        .build
        .exclude
        .originals()
        .contains(&"**/node_modules/**".to_string()));
    assert_eq!(config.build.file_separator, "\n\n---\n\n");
    assert_eq!(config.build.sort, SortOrder::Metadata);
    assert!(config.build.strip_section_meta);
    assert!(config.build.strip_heading_numbers);
    assert!(!config.build.normalize_headings);
    assert!(!config.build.remove_badges);
    assert!(!config.build.toc.enabled);
    assert_eq!(config.build.toc.depth, 3);
    assert_eq!(config.build.toc.title, "Table of Contents");
    assert!(config.build.frontmatter.strip);
    assert_eq!(config.build.watch_debounce_ms, 300);

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn local_config_overrides_defaults() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        r#"
        [directories]
        source = "docs"
        output = "dist/bundle.md"

        [build]
        include = ["guides/**/*.md"]
        sort = "path"
        file_separator = "\n\n***\n\n"

        [build.toc]
        enabled = true
        depth = 2
        "#,
    );
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load local config");

    assert_eq!(config.directories.source, working_dir.join("docs"));
    assert_eq!(config.directories.output, working_dir.join("dist/bundle.md"));
    assert_eq!(
        config.build.include.originals(),
        vec!["guides/**/*.md".to_string()]
    );
    assert_eq!(config.build.sort, SortOrder::Path);
    assert_eq!(config.build.file_separator, "\n\n***\n\n");
    assert!(config.build.toc.enabled);
    assert_eq!(config.build.toc.depth, 2);
    // Unset fields keep their defaults.
    assert_eq!(config.build.toc.title, "Table of Contents");
    assert!(config.build.frontmatter.strip);

    assert_eq!(config.sources.layers.len(), 2);
    assert_eq!(config.sources.layers[1].kind, ConfigSourceKind::Local);
}

#[test]
fn override_path_takes_highest_precedence() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        "[build]\nsort = \"path\"\n",
    );
    write_file(
        temp.path().join("override.toml"),
        "[build]\nsort = \"metadata\"\n",
    );
    let working_dir = canonical(temp.path());

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(working_dir)
            .with_override_path(temp.path().join("override.toml")),
    )
    .expect("load with override");

    assert_eq!(config.build.sort, SortOrder::Metadata);
    assert_eq!(
        config.sources.layers.last().map(|layer| layer.kind),
        Some(ConfigSourceKind::Override)
    );
}

#[test]
fn missing_override_path_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let result = Config::load(
        LoadOptions::default()
            .with_working_dir(canonical(temp.path()))
            .with_override_path(temp.path().join("absent.toml")),
    );
    assert!(matches!(result, Err(ConfigError::OverrideNotFound { .. })));
}

#[test]
fn invalid_glob_pattern_fails_validation() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        "[build]\ninclude = [\"**/*.{md\"]\n",
    );

    let result = Config::load(LoadOptions::default().with_working_dir(canonical(temp.path())));
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors
                .iter()
                .any(|err| err.message.contains("invalid glob pattern")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn empty_include_list_fails_validation() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        "[build]\ninclude = []\n",
    );

    let result = Config::load(LoadOptions::default().with_working_dir(canonical(temp.path())));
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors
                .iter()
                .any(|err| err.message.contains("at least one include pattern")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn out_of_range_toc_depth_fails_validation() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        "[build.toc]\ndepth = 7\n",
    );

    let result = Config::load(LoadOptions::default().with_working_dir(canonical(temp.path())));
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors
                .iter()
                .any(|err| err.message.contains("between 1 and 6")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn unknown_sort_order_fails_validation() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".markdown-bundle.toml"),
        "[build]\nsort = \"alphabetical\"\n",
    );

    let result = Config::load(LoadOptions::default().with_working_dir(canonical(temp.path())));
    match result {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors
                .iter()
                .any(|err| err.message.contains("unknown sort order")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    write_file(temp.path().join(".markdown-bundle.toml"), "not toml = [");

    let result = Config::load(LoadOptions::default().with_working_dir(canonical(temp.path())));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
