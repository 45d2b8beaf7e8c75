use crate::application::report::LoanReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `{report_id}.txt` and `{report_id}.json` into one directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the paths of the text and JSON renderings.
    pub fn write(&self, report: &LoanReport) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create report directory {:?}", self.dir))?;

        let text_path = self.dir.join(format!("{}.txt", report.report_id));
        let json_path = self.dir.join(format!("{}.json", report.report_id));

        fs::write(&text_path, report.render_text())
            .with_context(|| format!("Failed to write {:?}", text_path))?;
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        fs::write(&json_path, json).with_context(|| format!("Failed to write {:?}", json_path))?;

        info!("Wrote report {} to {:?}", report.report_id, self.dir);
        Ok((text_path, json_path))
    }
}
