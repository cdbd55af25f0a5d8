#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pipeline;
pub mod universe;

// Re-export main types from sub-crates
pub use euler_data as data;
pub use euler_output as output;
pub use euler_reconcile as reconcile;

pub use error::{PipelineError, Result};
pub use pipeline::{PipelineConfig, PipelineOutput, RenderedUploads, run};
pub use universe::{ExchangeUniverse, Region, Universe, UnknownRegion};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
