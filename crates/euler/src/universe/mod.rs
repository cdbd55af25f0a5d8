//! Exchange universes for the geography filter.
//!
//! A universe is the set of exchanges (by MIC) whose listings are eligible
//! for upload.

pub mod exchange;
pub mod region;

pub use exchange::ExchangeUniverse;
pub use region::{Region, UnknownRegion};

/// Trait for exchange universes.
pub trait Universe {
    /// Get all MICs in the universe.
    fn mics(&self) -> Vec<String>;

    /// Check if a MIC is in the universe.
    fn contains(&self, mic: &str) -> bool {
        self.mics().iter().any(|m| m == mic)
    }

    /// Get the number of exchanges.
    fn size(&self) -> usize {
        self.mics().len()
    }
}

impl Universe for ExchangeUniverse {
    fn mics(&self) -> Vec<String> {
        self.mics().to_vec()
    }

    fn contains(&self, mic: &str) -> bool {
        self.domicile(mic).is_some()
    }

    fn size(&self) -> usize {
        self.mics().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euler_data::ExchangeRecord;

    #[test]
    fn test_universe_trait() {
        let exchanges = vec![
            ExchangeRecord::new("XNYS", "New York Stock Exchange", "United States", "New York"),
            ExchangeRecord::new("XLON", "London Stock Exchange", "United Kingdom", "London"),
        ];
        let universe = ExchangeUniverse::for_region(&exchanges, Region::NorthAmerica);

        assert!(Universe::contains(&universe, "XNYS"));
        assert!(!Universe::contains(&universe, "XLON"));
        assert_eq!(Universe::size(&universe), 1);
        assert_eq!(Universe::mics(&universe), vec!["XNYS".to_string()]);
    }
}
