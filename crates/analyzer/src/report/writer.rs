use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use shared::models::Score;
use std::fs;
use std::path::{Path, PathBuf};

pub const INVALID_ADDRESSES_FILE: &str = "invalid_addresses.txt";
pub const SUMMARY_FILE: &str = "summary.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub address: String,
    pub score: Score,
}

/// Persists reports and run artifacts under one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory {output_dir:?}"))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report_path(&self, address: &str) -> PathBuf {
        self.output_dir.join(format!("report_{address}.txt"))
    }

    pub fn write_report(&self, address: &str, report: &str) -> Result<PathBuf> {
        let path = self.report_path(address);
        fs::write(&path, report).with_context(|| format!("Failed to write report {path:?}"))?;
        debug!("Wrote report {path:?}");
        Ok(path)
    }

    /// Writes the addresses that failed validation. Nothing is written for an
    /// empty list.
    pub fn write_invalid_addresses(&self, addresses: &[String]) -> Result<Option<PathBuf>> {
        if addresses.is_empty() {
            return Ok(None);
        }
        let path = self.output_dir.join(INVALID_ADDRESSES_FILE);
        fs::write(&path, addresses.join("\n"))
            .with_context(|| format!("Failed to write {path:?}"))?;
        Ok(Some(path))
    }

    /// Writes `summary.csv` with one `address,score` row per scored wallet, in
    /// the order given. Nothing is written when there are no rows.
    pub fn write_summary(&self, rows: &[SummaryRow]) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            return Ok(None);
        }
        let path = self.output_dir.join(SUMMARY_FILE);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {path:?}"))?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(Some(path))
    }
}
