//! Typed rows of the four input tables.
//!
//! Headers follow the source files. Compact spellings (`Symbol`,
//! `StrongOakIdentifier`, `AssetClass`, ...) are accepted as aliases. Every
//! optional field decodes an empty cell as `None`.

use serde::{Deserialize, Serialize};

/// A trading venue from the exchange reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// Market Identifier Code, unique per venue.
    #[serde(rename = "MIC")]
    pub mic: String,

    /// Venue name.
    #[serde(default)]
    pub name: String,

    /// Country the venue is domiciled in.
    #[serde(default)]
    pub domicile: String,

    /// City the venue is located in.
    #[serde(default)]
    pub city: String,
}

impl ExchangeRecord {
    /// Create a new exchange record.
    pub fn new(
        mic: impl Into<String>,
        name: impl Into<String>,
        domicile: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            mic: mic.into(),
            name: name.into(),
            domicile: domicile.into(),
            city: city.into(),
        }
    }

    /// Composite location in the form `"{domicile} - {city}"`.
    pub fn location(&self) -> String {
        format!("{} - {}", self.domicile, self.city)
    }
}

/// A security from the external stock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockListRecord {
    /// Request identifier, unique per row.
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Ticker symbol.
    #[serde(rename = "Symbol", default)]
    pub symbol: Option<String>,

    /// Numeric security identifier.
    #[serde(rename = "QUEUESIP", default)]
    pub queuesip: Option<String>,

    /// Venue the security trades on.
    #[serde(rename = "MIC")]
    pub mic: String,
}

impl StockListRecord {
    /// Create a new stock list record.
    pub fn new(
        request_id: impl Into<String>,
        symbol: Option<&str>,
        queuesip: Option<&str>,
        mic: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            symbol: symbol.map(str::to_string),
            queuesip: queuesip.map(str::to_string),
            mic: mic.into(),
        }
    }

    /// Whether either join key is populated.
    pub const fn has_join_key(&self) -> bool {
        self.symbol.is_some() || self.queuesip.is_some()
    }
}

/// A row of the Strong Oak security master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityMasterRecord {
    /// Ticker symbol.
    #[serde(rename = "Ticker", alias = "Symbol", default)]
    pub symbol: Option<String>,

    /// Numeric security identifier.
    #[serde(rename = "QUEUESIP", default)]
    pub queuesip: Option<String>,

    /// Strong Oak's own identifier for the security.
    #[serde(
        rename = "Strong Oak Identifier",
        alias = "StrongOakIdentifier",
        default
    )]
    pub strong_oak_identifier: Option<String>,
}

impl SecurityMasterRecord {
    /// Create a new security master record.
    pub fn new(symbol: Option<&str>, queuesip: Option<&str>, identifier: &str) -> Self {
        Self {
            symbol: symbol.map(str::to_string),
            queuesip: queuesip.map(str::to_string),
            strong_oak_identifier: Some(identifier.to_string()),
        }
    }

    /// Whether either join key is populated.
    pub const fn has_join_key(&self) -> bool {
        self.symbol.is_some() || self.queuesip.is_some()
    }
}

/// Descriptive attributes for one stock list request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Stock list request this row describes.
    #[serde(rename = "RequestId")]
    pub request_id: String,

    /// Asset class, e.g. `ETF` or `Domestic Equity`.
    #[serde(rename = "Asset Class", alias = "AssetClass", default)]
    pub asset_class: Option<String>,

    /// Inception date as written in the source file.
    #[serde(rename = "Inception Date", alias = "InceptionDate", default)]
    pub inception_date: Option<String>,

    /// Security name.
    #[serde(rename = "Security Name", alias = "SecurityName", default)]
    pub security_name: Option<String>,

    /// Return since inception as written in the source file.
    #[serde(
        rename = "Return Since Inception",
        alias = "ReturnSinceInception",
        default
    )]
    pub return_since_inception: Option<String>,
}

impl AttributeRecord {
    /// Create an attribute record with no attribute values set.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Set the asset class.
    pub fn asset_class(mut self, value: &str) -> Self {
        self.asset_class = Some(value.to_string());
        self
    }

    /// Set the inception date.
    pub fn inception_date(mut self, value: &str) -> Self {
        self.inception_date = Some(value.to_string());
        self
    }

    /// Set the security name.
    pub fn security_name(mut self, value: &str) -> Self {
        self.security_name = Some(value.to_string());
        self
    }

    /// Set the return since inception.
    pub fn return_since_inception(mut self, value: &str) -> Self {
        self.return_since_inception = Some(value.to_string());
        self
    }
}
