use super::RunReport;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Envelope<'a> {
    finished_at: String,
    benchmark: &'a str,
    #[serde(flatten)]
    report: &'a RunReport,
}

pub fn write_json(report: &RunReport, benchmark: &str, path: &Path) -> anyhow::Result<()> {
    let envelope = Envelope {
        finished_at: chrono::Utc::now().to_rfc3339(),
        benchmark,
        report,
    };
    let body = serde_json::to_string_pretty(&envelope)?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write run report {}", path.display()))
}
