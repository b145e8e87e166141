//! Configuration primitives and loader for the markdown-bundle toolkit.
//!
//! The loader resolves configuration using a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so downstream crates
//! can operate without touching raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".markdown-bundle.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub directories: DirectorySettings,
    pub build: BuildSettings,
    pub sources: ConfigSources,
}

/// Base paths the builder reads from and writes to.
#[derive(Clone, Debug)]
pub struct DirectorySettings {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Settings that govern a single build pass.
#[derive(Clone, Debug)]
pub struct BuildSettings {
    pub include: PatternList,
    pub exclude: PatternList,
    pub file_separator: String,
    pub sort: SortOrder,
    pub strip_section_meta: bool,
    pub strip_heading_numbers: bool,
    pub normalize_headings: bool,
    pub remove_badges: bool,
    pub watch_debounce_ms: u64,
    pub toc: TocSettings,
    pub frontmatter: FrontmatterSettings,
}

/// Table-of-contents generation settings.
#[derive(Clone, Debug)]
pub struct TocSettings {
    pub enabled: bool,
    pub depth: u8,
    pub title: String,
}

/// Frontmatter handling during combination.
#[derive(Clone, Debug)]
pub struct FrontmatterSettings {
    pub strip: bool,
}

/// Secondary sort key used by the topological sorter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    /// Order purely by relative path.
    Path,
    /// Order by (layer, category, title, path) from document metadata.
    Metadata,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortOrder::Path => "path",
            SortOrder::Metadata => "metadata",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "path" => Ok(SortOrder::Path),
            "metadata" => Ok(SortOrder::Metadata),
            _ => Err(()),
        }
    }
}

/// Pattern plus compiled matcher helper.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    glob: Glob,
}

impl Pattern {
    fn new(source: ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                original: value,
                glob,
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn glob(&self) -> &Glob {
        &self.glob
    }
}

/// Ordered list of glob patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Self {
        PatternList { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn originals(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|pattern| pattern.original.clone())
            .collect()
    }

    /// Compile the list into a single matcher set. An empty list produces an
    /// empty set that matches nothing.
    pub fn build_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            builder.add(pattern.glob.clone());
        }
        builder
            .build()
            .expect("globs validated at configuration load")
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {}: {source}", attempted.display())]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {} not found", path.display())]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            directories: resolved.directories,
            build: resolved.build,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let directories = DirectoriesPartial {
        source: Some(Located::new(PathBuf::from("."), source.clone())),
        output: Some(Located::new(PathBuf::from("BUNDLE.md"), source.clone())),
    };

    let build = BuildPartial {
        include: Some(Located::new(vec!["**/*.md".into()], source.clone())),
        exclude: Some(Located::new(
            vec![
                "**/node_modules/**".into(),
                "**/target/**".into(),
                "**/vendor/**".into(),
            ],
            source.clone(),
        )),
        file_separator: Some(Located::new("\n\n---\n\n".into(), source.clone())),
        sort: Some(Located::new("metadata".into(), source.clone())),
        strip_section_meta: Some(Located::new(true, source.clone())),
        strip_heading_numbers: Some(Located::new(true, source.clone())),
        normalize_headings: Some(Located::new(false, source.clone())),
        remove_badges: Some(Located::new(false, source.clone())),
        watch_debounce_ms: Some(Located::new(300, source.clone())),
        toc_enabled: Some(Located::new(false, source.clone())),
        toc_depth: Some(Located::new(3, source.clone())),
        toc_title: Some(Located::new("Table of Contents".into(), source.clone())),
        frontmatter_strip: Some(Located::new(true, source)),
    };

    PartialConfig {
        directories: Some(directories),
        build: Some(build),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    directories: Option<DirectoriesPartial>,
    build: Option<BuildPartial>,
}

impl PartialConfig {
    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_directories) = other.directories.take() {
            match &mut self.directories {
                Some(directories) => directories.merge(other_directories),
                None => self.directories = Some(other_directories),
            }
        }

        if let Some(other_build) = other.build.take() {
            match &mut self.build {
                Some(build) => build.merge(other_build),
                None => self.build = Some(other_build),
            }
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let fallback = ConfigSource::default(PathBuf::from("."));

        let directories_partial = self.directories.unwrap_or_default();
        let source_loc = directories_partial
            .source
            .unwrap_or_else(|| Located::new(PathBuf::from("."), fallback.clone()));
        let output_loc = directories_partial
            .output
            .unwrap_or_else(|| Located::new(PathBuf::from("BUNDLE.md"), fallback.clone()));

        if source_loc.value.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(source_loc.source.clone()),
                    "source directory cannot be empty".into(),
                )
                .with_context("directories.source"),
            );
        }
        if output_loc.value.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(output_loc.source.clone()),
                    "output path cannot be empty".into(),
                )
                .with_context("directories.output"),
            );
        }

        let source_dir = resolve_path(&source_loc);
        let output_path = resolve_path(&output_loc);

        let build_partial = self.build.unwrap_or_default();

        let include_loc = build_partial
            .include
            .unwrap_or_else(|| Located::new(vec!["**/*.md".into()], fallback.clone()));
        if include_loc.value.is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(include_loc.source.clone()),
                    "at least one include pattern is required".into(),
                )
                .with_context("build.include"),
            );
        }
        let include = compile_patterns(include_loc, "build.include", &mut errors);
        let exclude = compile_patterns(
            build_partial.exclude.unwrap_or_default(),
            "build.exclude",
            &mut errors,
        );

        let file_separator = build_partial
            .file_separator
            .map(|located| located.value)
            .unwrap_or_else(|| "\n\n---\n\n".into());

        let sort_loc = build_partial
            .sort
            .unwrap_or_else(|| Located::new("metadata".into(), fallback.clone()));
        let sort = match sort_loc.value.parse::<SortOrder>() {
            Ok(order) => order,
            Err(_) => {
                errors.push(
                    ConfigValidationError::new(
                        Some(sort_loc.source.clone()),
                        format!(
                            "unknown sort order '{}' (expected 'path' or 'metadata')",
                            sort_loc.value
                        ),
                    )
                    .with_context("build.sort"),
                );
                SortOrder::Metadata
            }
        };

        let toc_depth = build_partial
            .toc_depth
            .unwrap_or_else(|| Located::new(3, fallback.clone()));
        if toc_depth.value == 0 || toc_depth.value > 6 {
            errors.push(
                ConfigValidationError::new(
                    Some(toc_depth.source.clone()),
                    format!(
                        "toc depth must be between 1 and 6 (received {})",
                        toc_depth.value
                    ),
                )
                .with_context("build.toc.depth"),
            );
        }

        let watch_debounce_ms = build_partial
            .watch_debounce_ms
            .unwrap_or_else(|| Located::new(300, fallback.clone()));
        if watch_debounce_ms.value == 0 {
            errors.push(
                ConfigValidationError::new(
                    Some(watch_debounce_ms.source.clone()),
                    "watch debounce must be nonzero".into(),
                )
                .with_context("build.watch_debounce_ms"),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            directories: DirectorySettings {
                source: source_dir,
                output: output_path,
            },
            build: BuildSettings {
                include: PatternList::new(include),
                exclude: PatternList::new(exclude),
                file_separator,
                sort,
                strip_section_meta: build_partial
                    .strip_section_meta
                    .map(|located| located.value)
                    .unwrap_or(true),
                strip_heading_numbers: build_partial
                    .strip_heading_numbers
                    .map(|located| located.value)
                    .unwrap_or(true),
                normalize_headings: build_partial
                    .normalize_headings
                    .map(|located| located.value)
                    .unwrap_or(false),
                remove_badges: build_partial
                    .remove_badges
                    .map(|located| located.value)
                    .unwrap_or(false),
                watch_debounce_ms: watch_debounce_ms.value,
                toc: TocSettings {
                    enabled: build_partial
                        .toc_enabled
                        .map(|located| located.value)
                        .unwrap_or(false),
                    depth: toc_depth.value,
                    title: build_partial
                        .toc_title
                        .map(|located| located.value)
                        .unwrap_or_else(|| "Table of Contents".into()),
                },
                frontmatter: FrontmatterSettings {
                    strip: build_partial
                        .frontmatter_strip
                        .map(|located| located.value)
                        .unwrap_or(true),
                },
            },
        })
    }
}

#[derive(Clone, Debug, Default)]
struct DirectoriesPartial {
    source: Option<Located<PathBuf>>,
    output: Option<Located<PathBuf>>,
}

impl DirectoriesPartial {
    fn merge(&mut self, other: DirectoriesPartial) {
        if other.source.is_some() {
            self.source = other.source;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct BuildPartial {
    include: Option<Located<Vec<String>>>,
    exclude: Option<Located<Vec<String>>>,
    file_separator: Option<Located<String>>,
    sort: Option<Located<String>>,
    strip_section_meta: Option<Located<bool>>,
    strip_heading_numbers: Option<Located<bool>>,
    normalize_headings: Option<Located<bool>>,
    remove_badges: Option<Located<bool>>,
    watch_debounce_ms: Option<Located<u64>>,
    toc_enabled: Option<Located<bool>>,
    toc_depth: Option<Located<u8>>,
    toc_title: Option<Located<String>>,
    frontmatter_strip: Option<Located<bool>>,
}

impl BuildPartial {
    fn merge(&mut self, other: BuildPartial) {
        if other.include.is_some() {
            self.include = other.include;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.file_separator.is_some() {
            self.file_separator = other.file_separator;
        }
        if other.sort.is_some() {
            self.sort = other.sort;
        }
        if other.strip_section_meta.is_some() {
            self.strip_section_meta = other.strip_section_meta;
        }
        if other.strip_heading_numbers.is_some() {
            self.strip_heading_numbers = other.strip_heading_numbers;
        }
        if other.normalize_headings.is_some() {
            self.normalize_headings = other.normalize_headings;
        }
        if other.remove_badges.is_some() {
            self.remove_badges = other.remove_badges;
        }
        if other.watch_debounce_ms.is_some() {
            self.watch_debounce_ms = other.watch_debounce_ms;
        }
        if other.toc_enabled.is_some() {
            self.toc_enabled = other.toc_enabled;
        }
        if other.toc_depth.is_some() {
            self.toc_depth = other.toc_depth;
        }
        if other.toc_title.is_some() {
            self.toc_title = other.toc_title;
        }
        if other.frontmatter_strip.is_some() {
            self.frontmatter_strip = other.frontmatter_strip;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

impl Default for Located<Vec<String>> {
    fn default() -> Self {
        Located::new(Vec::new(), ConfigSource::default(PathBuf::from(".")))
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

fn compile_patterns(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in located.value {
        match Pattern::new(located.source.clone(), pattern.clone()) {
            Ok(compiled) => patterns.push(compiled),
            Err(err) => errors.push(err.with_context(context)),
        }
    }
    patterns
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    directories: DirectorySettings,
    build: BuildSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    directories: Option<RawDirectories>,
    #[serde(default)]
    build: Option<RawBuild>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            directories: self
                .directories
                .map(|directories| directories.into_partial(source.clone())),
            build: self.build.map(|build| build.into_partial(source)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDirectories {
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    output: Option<PathBuf>,
}

impl RawDirectories {
    fn into_partial(self, source: ConfigSource) -> DirectoriesPartial {
        DirectoriesPartial {
            source: self
                .source
                .map(|value| Located::new(value, source.clone())),
            output: self.output.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBuild {
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    file_separator: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    strip_section_meta: Option<bool>,
    #[serde(default)]
    strip_heading_numbers: Option<bool>,
    #[serde(default)]
    normalize_headings: Option<bool>,
    #[serde(default)]
    remove_badges: Option<bool>,
    #[serde(default)]
    watch_debounce_ms: Option<u64>,
    #[serde(default)]
    toc: Option<RawToc>,
    #[serde(default)]
    frontmatter: Option<RawFrontmatter>,
}

impl RawBuild {
    fn into_partial(self, source: ConfigSource) -> BuildPartial {
        let toc = self.toc.unwrap_or_default();
        let frontmatter = self.frontmatter.unwrap_or_default();
        BuildPartial {
            include: self
                .include
                .map(|value| Located::new(value, source.clone())),
            exclude: self
                .exclude
                .map(|value| Located::new(value, source.clone())),
            file_separator: self
                .file_separator
                .map(|value| Located::new(value, source.clone())),
            sort: self.sort.map(|value| Located::new(value, source.clone())),
            strip_section_meta: self
                .strip_section_meta
                .map(|value| Located::new(value, source.clone())),
            strip_heading_numbers: self
                .strip_heading_numbers
                .map(|value| Located::new(value, source.clone())),
            normalize_headings: self
                .normalize_headings
                .map(|value| Located::new(value, source.clone())),
            remove_badges: self
                .remove_badges
                .map(|value| Located::new(value, source.clone())),
            watch_debounce_ms: self
                .watch_debounce_ms
                .map(|value| Located::new(value, source.clone())),
            toc_enabled: toc
                .enabled
                .map(|value| Located::new(value, source.clone())),
            toc_depth: toc.depth.map(|value| Located::new(value, source.clone())),
            toc_title: toc.title.map(|value| Located::new(value, source.clone())),
            frontmatter_strip: frontmatter
                .strip
                .map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawToc {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    depth: Option<u8>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    #[serde(default)]
    strip: Option<bool>,
}
