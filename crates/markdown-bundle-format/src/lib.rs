//! Output formatters for markdown-bundle commands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of a completed build pass.
#[derive(Clone, Debug, Serialize)]
pub struct BuildReport {
    pub file_count: usize,
    pub token_count: usize,
    pub build_time_ms: u128,
    pub output_path: PathBuf,
    pub completed_at: DateTime<Utc>,
}

impl BuildReport {
    pub fn new(
        file_count: usize,
        token_count: usize,
        build_time_ms: u128,
        output_path: PathBuf,
    ) -> Self {
        BuildReport {
            file_count,
            token_count,
            build_time_ms,
            output_path,
            completed_at: Utc::now(),
        }
    }
}

/// Rendering styles for the build summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Plain,
    Json,
}

/// Render a build report in the requested format.
pub fn render_report(report: &BuildReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Plain => format!(
            "bundled {} files into {} ({} tokens, {} ms)",
            report.file_count,
            report.output_path.display(),
            report.token_count,
            report.build_time_ms,
        ),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).expect("report serialisation cannot fail")
        }
    }
}
