#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod records;

pub use error::{DataError, Result};
pub use loader::{DataSource, InputFile, InputTables, read_table};
pub use records::{AttributeRecord, ExchangeRecord, SecurityMasterRecord, StockListRecord};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
