//! Run reports for the Euler security upload.

use crate::export::Operator;
use crate::summary::DatasetSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A report of one upload run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Operator who produced the upload.
    pub operator: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Upload files written by the run.
    pub files: Vec<String>,

    /// Run summary.
    pub summary: DatasetSummary,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(operator: &Operator, files: Vec<String>, summary: DatasetSummary) -> Self {
        Self {
            operator: operator.full_name(),
            timestamp: Utc::now(),
            files,
            summary,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    operator: Option<Operator>,
    files: Vec<String>,
    summary: Option<DatasetSummary>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operator.
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Record an upload file written by the run.
    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.files.push(name.into());
        self
    }

    /// Set the run summary.
    pub fn summary(mut self, summary: DatasetSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let operator = self.operator.ok_or(ReportError::MissingField("operator"))?;
        let summary = self.summary.ok_or(ReportError::MissingField("summary"))?;
        Ok(Report::new(&operator, self.files, summary))
    }
}
