//! Named geographic regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown region name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown region '{0}', expected one of: north-america, united-states, canada")]
pub struct UnknownRegion(pub String);

/// Regions whose exchanges can be selected for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// United States and Canada.
    #[default]
    NorthAmerica,

    /// United States
    UnitedStates,

    /// Canada
    Canada,
}

impl Region {
    /// Returns all regions.
    pub const fn all() -> [Self; 3] {
        [Self::NorthAmerica, Self::UnitedStates, Self::Canada]
    }

    /// Country names as they appear in the exchange domicile column.
    pub const fn countries(&self) -> &'static [&'static str] {
        match self {
            Self::NorthAmerica => &["United States", "Canada"],
            Self::UnitedStates => &["United States"],
            Self::Canada => &["Canada"],
        }
    }

    /// Returns the region name used on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "north-america",
            Self::UnitedStates => "united-states",
            Self::Canada => "canada",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::all()
            .into_iter()
            .find(|region| region.name() == wanted)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}
