//! Exchange universe built from the exchange reference table.

use crate::universe::Universe;
use crate::universe::region::Region;
use euler_data::{ExchangeRecord, StockListRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Exchanges domiciled in a set of target countries.
#[derive(Debug, Clone)]
pub struct ExchangeUniverse {
    countries: Vec<String>,
    mics: Vec<String>,
    mic_to_domicile: HashMap<String, String>,
    known_mics: HashSet<String>,
}

impl ExchangeUniverse {
    /// Build the universe of exchanges whose domicile is one of `countries`.
    ///
    /// MICs keep exchange table order.
    ///
    /// # Examples
    ///
    /// ```
    /// use euler::ExchangeUniverse;
    /// use euler::data::ExchangeRecord;
    ///
    /// let exchanges = vec![
    ///     ExchangeRecord::new("XTSE", "Toronto Stock Exchange", "Canada", "Toronto"),
    ///     ExchangeRecord::new("XLON", "London Stock Exchange", "United Kingdom", "London"),
    /// ];
    ///
    /// let universe = ExchangeUniverse::from_exchanges(&exchanges, &["Canada"]);
    /// assert_eq!(universe.mics(), ["XTSE".to_string()]);
    /// ```
    pub fn from_exchanges<S: AsRef<str>>(exchanges: &[ExchangeRecord], countries: &[S]) -> Self {
        let countries: Vec<String> = countries.iter().map(|c| c.as_ref().to_string()).collect();

        let mut mics = Vec::new();
        let mut mic_to_domicile = HashMap::new();
        for exchange in exchanges {
            let eligible = countries.contains(&exchange.domicile);
            if eligible && !mic_to_domicile.contains_key(&exchange.mic) {
                mics.push(exchange.mic.clone());
                mic_to_domicile.insert(exchange.mic.clone(), exchange.domicile.clone());
            }
        }

        let known_mics = exchanges.iter().map(|e| e.mic.clone()).collect();

        Self {
            countries,
            mics,
            mic_to_domicile,
            known_mics,
        }
    }

    /// Build the universe for a named region.
    pub fn for_region(exchanges: &[ExchangeRecord], region: Region) -> Self {
        Self::from_exchanges(exchanges, region.countries())
    }

    /// Target countries.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// MICs in the universe.
    pub fn mics(&self) -> &[String] {
        &self.mics
    }

    /// Domicile of a MIC, if it is in the universe.
    pub fn domicile(&self, mic: &str) -> Option<&str> {
        self.mic_to_domicile.get(mic).map(String::as_str)
    }

    /// Get the count of MICs per country.
    pub fn country_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for domicile in self.mic_to_domicile.values() {
            *counts.entry(domicile.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Stock list rows listed on an exchange in the universe, in input order.
    ///
    /// Rows whose MIC is missing from the exchange table are excluded like
    /// any other out-of-universe row, and counted in a warning.
    pub fn filter_stock_list(&self, stock_list: &[StockListRecord]) -> Vec<StockListRecord> {
        let mut unknown = 0;
        let filtered: Vec<StockListRecord> = stock_list
            .iter()
            .filter(|row| {
                if !self.known_mics.contains(&row.mic) {
                    unknown += 1;
                }
                Universe::contains(self, &row.mic)
            })
            .cloned()
            .collect();

        if unknown > 0 {
            warn!(
                "{} stock list rows have a MIC missing from the exchange table",
                unknown
            );
        }
        debug!(
            "Excluded {} stock list rows outside {}",
            stock_list.len() - filtered.len(),
            self.countries.join(", ")
        );
        info!(
            exchanges = self.mics.len(),
            "Kept {} of {} stock list rows",
            filtered.len(),
            stock_list.len()
        );

        filtered
    }
}
