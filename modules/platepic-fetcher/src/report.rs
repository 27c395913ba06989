//! Per-run outcome report: `report.csv` plus a `report.md` summary.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use platepic_common::{OutcomeRecord, OutcomeStatus, PlatepicError};
use tracing::info;

pub const CSV_HEADER: [&str; 6] = ["name", "status", "source", "meta_or_query", "asset_path", "error"];

/// Failing names listed in the summary.
pub const FAILURE_EXCERPT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub exists: usize,
    pub downloaded: usize,
    pub not_found: usize,
    pub download_failed: usize,
}

impl RunSummary {
    pub fn successes(&self) -> usize {
        self.exists + self.downloaded
    }

    pub fn failures(&self) -> usize {
        self.not_found + self.download_failed
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        match status {
            OutcomeStatus::Exists => self.exists,
            OutcomeStatus::Downloaded => self.downloaded,
            OutcomeStatus::NotFound => self.not_found,
            OutcomeStatus::DownloadFailed => self.download_failed,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total={} exists={} downloaded={} not_found={} download_failed={}",
            self.total, self.exists, self.downloaded, self.not_found, self.download_failed
        )
    }
}

pub struct ReportGenerator {
    started_at: DateTime<Utc>,
    records: Vec<OutcomeRecord>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.records.len(),
            ..RunSummary::default()
        };
        for record in &self.records {
            match record.status {
                OutcomeStatus::Exists => summary.exists += 1,
                OutcomeStatus::Downloaded => summary.downloaded += 1,
                OutcomeStatus::NotFound => summary.not_found += 1,
                OutcomeStatus::DownloadFailed => summary.download_failed += 1,
            }
        }
        summary
    }

    pub fn to_csv(&self) -> String {
        let mut out = csv_row(&CSV_HEADER);
        for r in &self.records {
            out.push_str(&csv_row(&[
                r.name.as_str(),
                r.status.as_str(),
                r.source.as_str(),
                r.meta.as_str(),
                r.asset_path.as_str(),
                r.error.as_str(),
            ]));
        }
        out
    }

    pub fn to_markdown(&self) -> String {
        let summary = self.summary();
        let failures: Vec<&OutcomeRecord> = self
            .records
            .iter()
            .filter(|r| !r.status.is_success())
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "# Image fetch report\n");
        let _ = writeln!(out, "Run started: {}\n", self.started_at.to_rfc3339());
        let _ = writeln!(out, "- Total: {}", summary.total);
        let _ = writeln!(out, "- Success: {} (including cached)", summary.successes());
        let _ = writeln!(out, "- Failed: {}", summary.failures());
        for status in OutcomeStatus::ALL {
            let _ = writeln!(out, "  - {status}: {}", summary.count(status));
        }

        if !failures.is_empty() {
            let _ = writeln!(
                out,
                "\n## Failures (first {} of {})\n",
                failures.len().min(FAILURE_EXCERPT),
                failures.len()
            );
            for r in failures.iter().take(FAILURE_EXCERPT) {
                let _ = writeln!(out, "- {} ({})", r.name, r.status);
            }
        }
        out
    }

    /// Overwrite `report.csv` and `report.md` in `dir`.
    pub fn write(&self, dir: &Path) -> Result<ReportPaths, PlatepicError> {
        std::fs::create_dir_all(dir)?;
        let paths = ReportPaths {
            csv: dir.join("report.csv"),
            summary: dir.join("report.md"),
        };
        std::fs::write(&paths.csv, self.to_csv())
            .map_err(|e| PlatepicError::Report(format!("{}: {e}", paths.csv.display())))?;
        std::fs::write(&paths.summary, self.to_markdown())
            .map_err(|e| PlatepicError::Report(format!("{}: {e}", paths.summary.display())))?;

        info!(
            csv = %paths.csv.display(),
            summary = %paths.summary.display(),
            rows = self.records.len(),
            "Report written"
        );
        Ok(paths)
    }
}

#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub summary: PathBuf,
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",");
    row.push('\n');
    row
}

/// Quote fields containing a delimiter, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
