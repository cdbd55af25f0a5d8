#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assembler;
pub mod error;
pub mod reconciler;
pub mod symbol;

pub use assembler::{AttributeAssembler, AttributeName, AttributeRow, AttributeValue, TieBreak};
pub use error::{LookupTable, ReconcileError, Result};
pub use reconciler::{
    EulerId, ReconcileStats, ReconciledSecurity, Reconciliation, SecurityMatch, reconcile,
};
pub use symbol::SymbolNormalizer;
