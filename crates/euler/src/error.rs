//! Error types for a pipeline run.

use euler_data::DataError;
use euler_output::{ExportError, ReportError};
use euler_reconcile::ReconcileError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input table could not be loaded.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A lookup failed while assembling attributes.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// An upload table could not be rendered or written.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The run report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}
