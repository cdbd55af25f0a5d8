//! Ticker symbol normalization.
//!
//! Symbols from the security master and the stock list carry noise
//! characters that break exact-match joins. Both tables are cleaned with the
//! same normalizer before reconciliation.

use euler_data::{SecurityMasterRecord, StockListRecord};
use std::fmt;

/// Policy for removing noise characters from symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolNormalizer {
    /// Remove ASCII lowercase letters.
    #[default]
    StripLowercase,

    /// Remove every occurrence of one character.
    StripChar(char),
}

impl SymbolNormalizer {
    /// Normalize a symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use euler_reconcile::SymbolNormalizer;
    ///
    /// assert_eq!(SymbolNormalizer::StripLowercase.normalize("BRKpB"), "BRKB");
    /// assert_eq!(SymbolNormalizer::StripChar('p').normalize("pAAPL"), "AAPL");
    /// ```
    pub fn normalize(&self, symbol: &str) -> String {
        match self {
            Self::StripLowercase => symbol.chars().filter(|c| !c.is_ascii_lowercase()).collect(),
            Self::StripChar(noise) => symbol.chars().filter(|c| c != noise).collect(),
        }
    }

    /// Normalize an optional symbol. A symbol left empty becomes `None`.
    pub fn normalize_opt(&self, symbol: Option<&str>) -> Option<String> {
        symbol
            .map(|s| self.normalize(s))
            .filter(|s| !s.is_empty())
    }

    /// Clean the symbol of every security master row in place.
    pub fn clean_security_master(&self, rows: &mut [SecurityMasterRecord]) {
        for row in rows {
            self.clean(&mut row.symbol);
        }
    }

    /// Clean the symbol of every stock list row in place.
    pub fn clean_stock_list(&self, rows: &mut [StockListRecord]) {
        for row in rows {
            self.clean(&mut row.symbol);
        }
    }

    fn clean(&self, slot: &mut Option<String>) {
        *slot = self.normalize_opt(slot.as_deref());
    }
}

impl fmt::Display for SymbolNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StripLowercase => write!(f, "strip lowercase letters"),
            Self::StripChar(c) => write!(f, "strip '{}'", c),
        }
    }
}
