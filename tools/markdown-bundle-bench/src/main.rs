use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use markdown_bundle_config::{Config, LoadOptions};
use markdown_bundle_core::MarkdownBundle;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Benchmark harness for markdown-bundle builds"
)]
struct Args {
    /// Project directory to benchmark against
    #[arg(long, value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Number of warm-up iterations (not counted in results)
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Number of measured iterations
    #[arg(long, default_value_t = 3)]
    iterations: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(LoadOptions::default().with_working_dir(&args.path))
        .context("load configuration for benchmark target")?;
    let engine = MarkdownBundle::bootstrap(config);

    for _ in 0..args.warmup {
        engine.builder().build().context("warm-up build")?;
    }

    let mut samples: Vec<Duration> = Vec::with_capacity(args.iterations);
    for _ in 0..args.iterations {
        let started = Instant::now();
        engine.builder().build().context("measured build")?;
        samples.push(started.elapsed());
    }

    report("build", &samples);
    Ok(())
}

fn report(label: &str, samples: &[Duration]) {
    let total: Duration = samples.iter().sum();
    let mean = total / samples.len().max(1) as u32;
    let fastest = samples.iter().min().copied().unwrap_or_default();
    let slowest = samples.iter().max().copied().unwrap_or_default();
    println!(
        "{label}: mean {:?} | fastest {:?} | slowest {:?} over {} iterations",
        mean,
        fastest,
        slowest,
        samples.len()
    );
}
