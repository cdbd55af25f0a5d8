//! Error types for reconciliation and attribute assembly.

use std::fmt;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Table a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    /// Strong Oak security master, keyed by QUEUESIP or Symbol.
    SecurityMaster,
    /// Attribute table, keyed by RequestId.
    Attributes,
    /// Exchange reference, keyed by MIC.
    Exchanges,
}

impl LookupTable {
    /// Human-readable table name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SecurityMaster => "security master",
            Self::Attributes => "attribute",
            Self::Exchanges => "exchange",
        }
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors that can occur while assembling upload tables.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A reconciled security has no row in a lookup table
    #[error("No {table} row found for {key}")]
    LookupNotFound {
        /// Table that was searched
        table: LookupTable,
        /// Key that was searched for
        key: String,
    },

    /// Several rows in a lookup table share the key
    #[error("{count} {table} rows found for {key}, expected exactly one")]
    AmbiguousLookup {
        /// Table that was searched
        table: LookupTable,
        /// Key that was searched for
        key: String,
        /// Number of matching rows
        count: usize,
    },
}
