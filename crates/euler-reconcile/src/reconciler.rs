//! Security reconciliation.
//!
//! Security master rows are matched to the geography-filtered stock list in
//! two ordered stages:
//!
//! 1. rows with a QUEUESIP are inner-joined on QUEUESIP,
//! 2. rows without a QUEUESIP, whose symbol was not already resolved by
//!    stage 1, are inner-joined on Symbol.
//!
//! Both joins keep stock list order, with security master order among rows
//! that match the same stock list entry. Stage 1 matches come first and
//! EulerIds are assigned densely from 1 over the concatenated result. Joins
//! preserve cardinality: a security master row matching several stock list
//! rows, or several master rows matching one stock list row, each produce
//! their own security.

use derive_more::{Display, From, Into};
use euler_data::{SecurityMasterRecord, StockListRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Platform-internal sequential security identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct EulerId(u64);

impl EulerId {
    /// The underlying integer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A stock list row matched to a security master row, tagged by the key
/// that produced the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityMatch {
    /// Matched on QUEUESIP.
    ById {
        /// Stock list request.
        request_id: String,
        /// Shared QUEUESIP.
        queuesip: String,
        /// Stock list symbol, else the security master symbol.
        symbol: Option<String>,
        /// Stock list venue.
        mic: String,
    },

    /// Matched on Symbol.
    BySymbol {
        /// Stock list request.
        request_id: String,
        /// Shared symbol.
        symbol: String,
        /// Stock list QUEUESIP, else the security master QUEUESIP.
        queuesip: Option<String>,
        /// Stock list venue.
        mic: String,
    },
}

impl SecurityMatch {
    /// Symbol carried by the match.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::ById { symbol, .. } => symbol.as_deref(),
            Self::BySymbol { symbol, .. } => Some(symbol),
        }
    }

    /// Convert into a reconciled security with the given id.
    pub fn into_security(self, euler_id: EulerId) -> ReconciledSecurity {
        match self {
            Self::ById {
                request_id,
                queuesip,
                symbol,
                mic,
            } => ReconciledSecurity {
                euler_id,
                request_id,
                symbol,
                queuesip: Some(queuesip),
                mic,
            },
            Self::BySymbol {
                request_id,
                symbol,
                queuesip,
                mic,
            } => ReconciledSecurity {
                euler_id,
                request_id,
                symbol: Some(symbol),
                queuesip,
                mic,
            },
        }
    }
}

/// A security accepted for upload. Serializes as a row of the security
/// upload table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledSecurity {
    /// Assigned identifier.
    #[serde(rename = "EulerId")]
    pub euler_id: EulerId,

    /// Stock list request.
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,

    /// Numeric security identifier.
    #[serde(rename = "QUEUESIP")]
    pub queuesip: Option<String>,

    /// Venue.
    #[serde(rename = "MIC")]
    pub mic: String,
}

/// Row counts recorded while reconciling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Security master rows received.
    pub master_rows: usize,
    /// Master rows dropped for having neither Symbol nor QUEUESIP.
    pub dropped_without_key: usize,
    /// Master rows keyed by QUEUESIP.
    pub keyed_by_id: usize,
    /// Master rows keyed by Symbol only.
    pub keyed_by_symbol: usize,
    /// Symbol-keyed rows skipped because stage 1 already resolved the symbol.
    pub suppressed_by_id_match: usize,
    /// Securities produced by the QUEUESIP join.
    pub id_matches: usize,
    /// Securities produced by the Symbol join.
    pub symbol_matches: usize,
}

impl ReconcileStats {
    /// Master rows eligible for matching.
    pub const fn eligible(&self) -> usize {
        self.master_rows - self.dropped_without_key
    }

    /// Total securities produced.
    pub const fn reconciled(&self) -> usize {
        self.id_matches + self.symbol_matches
    }
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Securities in EulerId order.
    pub securities: Vec<ReconciledSecurity>,
    /// Stage counters.
    pub stats: ReconcileStats,
}

/// Reconcile cleaned security master rows against the filtered stock list.
///
/// Empty inputs yield an empty reconciliation.
///
/// # Examples
///
/// ```
/// use euler_data::{SecurityMasterRecord, StockListRecord};
/// use euler_reconcile::reconcile;
///
/// let master = vec![SecurityMasterRecord::new(Some("AAPL"), None, "SO1")];
/// let stocks = vec![StockListRecord::new("R1", Some("AAPL"), None, "XNYS")];
///
/// let result = reconcile(&master, &stocks);
/// assert_eq!(result.securities.len(), 1);
/// assert_eq!(result.securities[0].euler_id.get(), 1);
/// ```
pub fn reconcile(
    security_master: &[SecurityMasterRecord],
    stock_list: &[StockListRecord],
) -> Reconciliation {
    let mut stats = ReconcileStats {
        master_rows: security_master.len(),
        ..ReconcileStats::default()
    };

    let (keyed_by_id, mut keyed_by_symbol): (Vec<_>, Vec<_>) = security_master
        .iter()
        .filter(|row| row.has_join_key())
        .partition(|row| row.queuesip.is_some());

    stats.dropped_without_key = security_master.len() - keyed_by_id.len() - keyed_by_symbol.len();
    stats.keyed_by_id = keyed_by_id.len();
    stats.keyed_by_symbol = keyed_by_symbol.len();
    if stats.dropped_without_key > 0 {
        debug!(
            "Dropped {} security master rows without Symbol or QUEUESIP",
            stats.dropped_without_key
        );
    }

    let by_id = match_by_id(&keyed_by_id, stock_list);

    let resolved: HashSet<&str> = by_id.iter().filter_map(SecurityMatch::symbol).collect();
    keyed_by_symbol.retain(|row| {
        row.symbol
            .as_deref()
            .is_some_and(|symbol| !resolved.contains(symbol))
    });
    stats.suppressed_by_id_match = stats.keyed_by_symbol - keyed_by_symbol.len();

    let by_symbol = match_by_symbol(&keyed_by_symbol, stock_list);

    stats.id_matches = by_id.len();
    stats.symbol_matches = by_symbol.len();

    let securities: Vec<ReconciledSecurity> = by_id
        .into_iter()
        .chain(by_symbol)
        .zip(1u64..)
        .map(|(matched, id)| matched.into_security(EulerId::from(id)))
        .collect();

    info!(
        id_matches = stats.id_matches,
        symbol_matches = stats.symbol_matches,
        suppressed = stats.suppressed_by_id_match,
        "Reconciled {} securities from {} security master rows",
        securities.len(),
        stats.master_rows
    );

    Reconciliation { securities, stats }
}

/// Group rows by a key, keeping row order within each group.
fn index_by<'a, F>(
    rows: &[&'a SecurityMasterRecord],
    key: F,
) -> HashMap<&'a str, Vec<&'a SecurityMasterRecord>>
where
    F: Fn(&'a SecurityMasterRecord) -> Option<&'a str>,
{
    let mut index: HashMap<&str, Vec<&SecurityMasterRecord>> = HashMap::new();
    for &row in rows {
        if let Some(k) = key(row) {
            index.entry(k).or_default().push(row);
        }
    }
    index
}

fn match_by_id(
    keyed_by_id: &[&SecurityMasterRecord],
    stock_list: &[StockListRecord],
) -> Vec<SecurityMatch> {
    let index = index_by(keyed_by_id, |row| row.queuesip.as_deref());

    let mut matches = Vec::new();
    for stock in stock_list {
        let Some(queuesip) = stock.queuesip.as_deref() else {
            continue;
        };
        let Some(masters) = index.get(queuesip) else {
            continue;
        };
        for master in masters {
            matches.push(SecurityMatch::ById {
                request_id: stock.request_id.clone(),
                queuesip: queuesip.to_string(),
                symbol: stock.symbol.clone().or_else(|| master.symbol.clone()),
                mic: stock.mic.clone(),
            });
        }
    }
    matches
}

fn match_by_symbol(
    keyed_by_symbol: &[&SecurityMasterRecord],
    stock_list: &[StockListRecord],
) -> Vec<SecurityMatch> {
    let index = index_by(keyed_by_symbol, |row| row.symbol.as_deref());

    let mut matches = Vec::new();
    for stock in stock_list {
        let Some(symbol) = stock.symbol.as_deref() else {
            continue;
        };
        let Some(masters) = index.get(symbol) else {
            continue;
        };
        for master in masters {
            matches.push(SecurityMatch::BySymbol {
                request_id: stock.request_id.clone(),
                symbol: symbol.to_string(),
                queuesip: stock.queuesip.clone().or_else(|| master.queuesip.clone()),
                mic: stock.mic.clone(),
            });
        }
    }
    matches
}
