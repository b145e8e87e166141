use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use markdown_bundle_config::{Config, LoadOptions};
use markdown_bundle_core::MarkdownBundle;
use markdown_bundle_format::{render_report, ReportFormat};
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            init_tracing(args.verbose);
            let config = load_config(&args.common)?;
            let engine = MarkdownBundle::bootstrap(config);
            handle_build(&engine, args)
        }
        Command::Watch(args) => {
            init_tracing(args.verbose);
            let config = load_config(&args.common)?;
            let engine = MarkdownBundle::bootstrap(config);
            handle_watch(&engine)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut options = LoadOptions::default();
    if let Some(path) = &common.config {
        options = options.with_override_path(path);
    }
    let mut config = Config::load(options)?;
    if let Some(output) = &common.output {
        config.directories.output = output.clone();
    }
    Ok(config)
}

fn handle_build(engine: &MarkdownBundle, args: BuildArgs) -> Result<i32> {
    let format = match args.format.unwrap_or(ReportFormatValue::Plain) {
        ReportFormatValue::Plain => ReportFormat::Plain,
        ReportFormatValue::Json => ReportFormat::Json,
    };

    let report = engine.builder().build()?;
    emit(&render_report(&report, format))?;
    Ok(0)
}

fn handle_watch(engine: &MarkdownBundle) -> Result<i32> {
    engine.builder().watch()?;
    Ok(0)
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "markdown-bundle documentation builder",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single build pass
    Build(BuildArgs),
    /// Rebuild continuously on file-system changes
    Watch(WatchArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Path to an explicit configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured output path
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Select build summary format
    #[arg(long, value_enum)]
    format: Option<ReportFormatValue>,
    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormatValue {
    Plain,
    Json,
}
