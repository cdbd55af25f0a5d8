//! Export functionality for the upload tables.
//!
//! This module provides CSV and JSON export of the security upload and the
//! long-form attribute upload, and the naming scheme for upload files.

use euler_reconcile::{AttributeRow, ReconciledSecurity};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Header of the security upload.
pub const SECURITY_UPLOAD_HEADER: [&str; 5] = ["EulerId", "RequestId", "Symbol", "QUEUESIP", "MIC"];

/// Header of the attribute upload.
pub const ATTRIBUTE_UPLOAD_HEADER: [&str; 3] = ["EulerId", "AttributeName", "AttributeValue"];

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        write_file(path, &content)
    }
}

impl Exporter for [ReconciledSecurity] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        serialize_rows(self, &SECURITY_UPLOAD_HEADER, format)
    }
}

impl Exporter for [AttributeRow] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        serialize_rows(self, &ATTRIBUTE_UPLOAD_HEADER, format)
    }
}

/// Serialize rows, always emitting the CSV header even when `rows` is empty.
fn serialize_rows<T: Serialize>(
    rows: &[T],
    header: &[&str],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(vec![]);
            wtr.write_record(header)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
            String::from_utf8(bytes)
                .map_err(|e| ExportError::InvalidFormat(format!("CSV output is not UTF-8: {}", e)))
        }
        ExportFormat::Json => Ok(serde_json::to_string(rows)?),
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// Write `content` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_file(path: &Path, content: &str) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Operator whose name prefixes the upload files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl Operator {
    /// Create a new operator.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display name, `"{first} {last}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Files produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFile {
    /// Security upload (section 1).
    SecurityUpload,
    /// Attribute upload (section 2).
    AttributeUpload,
    /// JSON run report.
    Summary,
}

impl UploadFile {
    /// Fixed suffix following the operator name.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::SecurityUpload => "section1",
            Self::AttributeUpload => "section2",
            Self::Summary => "summary",
        }
    }

    /// Format the file is written in.
    pub const fn format(&self) -> ExportFormat {
        match self {
            Self::SecurityUpload | Self::AttributeUpload => ExportFormat::Csv,
            Self::Summary => ExportFormat::PrettyJson,
        }
    }

    /// File name, `"{first}_{last}_{suffix}.{ext}"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use euler_output::{Operator, UploadFile};
    ///
    /// let operator = Operator::new("Ada", "Lovelace");
    /// assert_eq!(UploadFile::SecurityUpload.file_name(&operator), "Ada_Lovelace_section1.csv");
    /// ```
    pub fn file_name(&self, operator: &Operator) -> String {
        format!(
            "{}_{}_{}.{}",
            operator.first_name,
            operator.last_name,
            self.suffix(),
            self.format().extension()
        )
    }

    /// Full path inside `dir`.
    pub fn path(&self, dir: &Path, operator: &Operator) -> PathBuf {
        dir.join(self.file_name(operator))
    }
}
