#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{
    ATTRIBUTE_UPLOAD_HEADER, ExportError, ExportFormat, Exporter, Operator,
    SECURITY_UPLOAD_HEADER, UploadFile, write_file,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{AssetClassCount, DatasetSummary, InputCounts, summarize};
