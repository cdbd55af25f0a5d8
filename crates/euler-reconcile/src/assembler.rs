//! Attribute assembly.
//!
//! Each reconciled security is joined to its Strong Oak identifier, its
//! attribute row and its exchange, then flattened into sparse long form:
//! one [`AttributeRow`] per populated attribute.

use crate::error::{LookupTable, ReconcileError, Result};
use crate::reconciler::{EulerId, ReconciledSecurity};
use euler_data::{AttributeRecord, ExchangeRecord, SecurityMasterRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// Attribute names of the attribute upload, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeName {
    /// Exchange name.
    #[serde(rename = "Exchange Name")]
    ExchangeName,

    /// Exchange domicile and city.
    #[serde(rename = "Exchange Location")]
    ExchangeLocation,

    /// Asset class.
    #[serde(rename = "Asset Class")]
    AssetClass,

    /// Inception date.
    #[serde(rename = "Inception Date")]
    InceptionDate,

    /// Security name.
    #[serde(rename = "Security Name")]
    SecurityName,

    /// Return since inception.
    #[serde(rename = "Return Since Inception")]
    ReturnSinceInception,

    /// Strong Oak identifier.
    #[serde(rename = "Strong Oak Identifier")]
    StrongOakIdentifier,
}

impl AttributeName {
    /// Returns all attribute names in emission order.
    pub const fn all() -> [Self; 7] {
        [
            Self::ExchangeName,
            Self::ExchangeLocation,
            Self::AssetClass,
            Self::InceptionDate,
            Self::SecurityName,
            Self::ReturnSinceInception,
            Self::StrongOakIdentifier,
        ]
    }

    /// Returns the attribute name as written to the upload.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExchangeName => "Exchange Name",
            Self::ExchangeLocation => "Exchange Location",
            Self::AssetClass => "Asset Class",
            Self::InceptionDate => "Inception Date",
            Self::SecurityName => "Security Name",
            Self::ReturnSinceInception => "Return Since Inception",
            Self::StrongOakIdentifier => "Strong Oak Identifier",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl AttributeValue {
    /// Text value, or `None` when absent or empty.
    pub fn text(value: Option<&str>) -> Option<Self> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| Self::Text(v.to_string()))
    }

    /// Numeric value when `value` parses as a finite number, text otherwise.
    pub fn numeric(value: Option<&str>) -> Option<Self> {
        let value = value.filter(|v| !v.is_empty())?;
        Some(match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(value.to_string()),
        })
    }

    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

/// Formats numbers the way the CSV upload writes them: whole numbers keep
/// one decimal place (`5.0`).
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => write!(f, "{:.1}", n),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the attribute upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    /// Security the attribute belongs to.
    #[serde(rename = "EulerId")]
    pub euler_id: EulerId,

    /// Attribute name.
    #[serde(rename = "AttributeName")]
    pub name: AttributeName,

    /// Attribute value, never null.
    #[serde(rename = "AttributeValue")]
    pub value: AttributeValue,
}

/// How to resolve a lookup key shared by several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Fail with [`ReconcileError::AmbiguousLookup`].
    #[default]
    Reject,
    /// Use the first row in file order.
    FirstMatch,
}

/// Rows grouped by a string key, in file order.
#[derive(Debug)]
struct KeyIndex<'a, T> {
    table: LookupTable,
    rows: HashMap<&'a str, Vec<&'a T>>,
}

impl<'a, T> KeyIndex<'a, T> {
    fn build(table: LookupTable, rows: &'a [T], key: impl Fn(&'a T) -> &'a str) -> Self {
        let mut index: HashMap<&'a str, Vec<&'a T>> = HashMap::new();
        for row in rows {
            index.entry(key(row)).or_default().push(row);
        }
        Self { table, rows: index }
    }

    fn get(&self, key: &str, tie_break: TieBreak) -> Result<&'a T> {
        let rows = self.rows.get(key).map(Vec::as_slice).unwrap_or_default();
        match rows {
            [] => Err(ReconcileError::LookupNotFound {
                table: self.table,
                key: key.to_string(),
            }),
            [row] => Ok(*row),
            [first, ..] => match tie_break {
                TieBreak::FirstMatch => Ok(*first),
                TieBreak::Reject => Err(ReconcileError::AmbiguousLookup {
                    table: self.table,
                    key: key.to_string(),
                    count: rows.len(),
                }),
            },
        }
    }
}

/// First security master position per QUEUESIP and per Symbol.
#[derive(Debug)]
struct IdentifierIndex<'a> {
    rows: &'a [SecurityMasterRecord],
    by_queuesip: HashMap<&'a str, usize>,
    by_symbol: HashMap<&'a str, usize>,
}

impl<'a> IdentifierIndex<'a> {
    fn build(rows: &'a [SecurityMasterRecord]) -> Self {
        let mut by_queuesip = HashMap::new();
        let mut by_symbol = HashMap::new();
        for (pos, row) in rows.iter().enumerate() {
            if let Some(queuesip) = row.queuesip.as_deref() {
                by_queuesip.entry(queuesip).or_insert(pos);
            }
            if let Some(symbol) = row.symbol.as_deref() {
                by_symbol.entry(symbol).or_insert(pos);
            }
        }
        Self {
            rows,
            by_queuesip,
            by_symbol,
        }
    }

    /// First row whose QUEUESIP or Symbol equals the security's.
    fn get(&self, security: &ReconciledSecurity) -> Result<&'a SecurityMasterRecord> {
        let by_queuesip = security
            .queuesip
            .as_deref()
            .and_then(|q| self.by_queuesip.get(q).copied());
        let by_symbol = security
            .symbol
            .as_deref()
            .and_then(|s| self.by_symbol.get(s).copied());

        let pos = match (by_queuesip, by_symbol) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => {
                return Err(ReconcileError::LookupNotFound {
                    table: LookupTable::SecurityMaster,
                    key: format!(
                        "QUEUESIP {} / Symbol {}",
                        security.queuesip.as_deref().unwrap_or("<none>"),
                        security.symbol.as_deref().unwrap_or("<none>")
                    ),
                });
            }
        };
        let rows = self.rows;
        Ok(&rows[pos])
    }
}

/// Joins reconciled securities to identifiers, attributes and exchanges.
#[derive(Debug)]
pub struct AttributeAssembler<'a> {
    identifiers: IdentifierIndex<'a>,
    attributes: KeyIndex<'a, AttributeRecord>,
    exchanges: KeyIndex<'a, ExchangeRecord>,
    tie_break: TieBreak,
}

impl<'a> AttributeAssembler<'a> {
    /// Build the lookup indices.
    ///
    /// `security_master` must already be symbol-cleaned with the normalizer
    /// used for reconciliation.
    pub fn new(
        security_master: &'a [SecurityMasterRecord],
        attributes: &'a [AttributeRecord],
        exchanges: &'a [ExchangeRecord],
    ) -> Self {
        Self {
            identifiers: IdentifierIndex::build(security_master),
            attributes: KeyIndex::build(LookupTable::Attributes, attributes, |r| {
                r.request_id.as_str()
            }),
            exchanges: KeyIndex::build(LookupTable::Exchanges, exchanges, |r| r.mic.as_str()),
            tie_break: TieBreak::default(),
        }
    }

    /// Set the policy for keys shared by several attribute or exchange rows.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Wide attribute row for one security, in [`AttributeName::all`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if any lookup finds no row, or several rows under
    /// [`TieBreak::Reject`].
    pub fn attributes_of(
        &self,
        security: &ReconciledSecurity,
    ) -> Result<[(AttributeName, Option<AttributeValue>); 7]> {
        let master = self.identifiers.get(security)?;
        let attrs = self.attributes.get(&security.request_id, self.tie_break)?;
        let exchange = self.exchanges.get(&security.mic, self.tie_break)?;

        Ok([
            (
                AttributeName::ExchangeName,
                AttributeValue::text(Some(exchange.name.as_str())),
            ),
            (
                AttributeName::ExchangeLocation,
                AttributeValue::text(Some(exchange.location().as_str())),
            ),
            (
                AttributeName::AssetClass,
                AttributeValue::text(attrs.asset_class.as_deref()),
            ),
            (
                AttributeName::InceptionDate,
                AttributeValue::text(attrs.inception_date.as_deref()),
            ),
            (
                AttributeName::SecurityName,
                AttributeValue::text(attrs.security_name.as_deref()),
            ),
            (
                AttributeName::ReturnSinceInception,
                AttributeValue::numeric(attrs.return_since_inception.as_deref()),
            ),
            (
                AttributeName::StrongOakIdentifier,
                AttributeValue::text(master.strong_oak_identifier.as_deref()),
            ),
        ])
    }

    /// Assemble the long-form attribute upload.
    ///
    /// Absent values produce no row. The first failing lookup aborts
    /// assembly.
    ///
    /// # Errors
    ///
    /// See [`Self::attributes_of`].
    pub fn assemble(&self, securities: &[ReconciledSecurity]) -> Result<Vec<AttributeRow>> {
        let mut rows = Vec::with_capacity(securities.len() * AttributeName::all().len());
        for security in securities {
            for (name, value) in self.attributes_of(security)? {
                if let Some(value) = value {
                    rows.push(AttributeRow {
                        euler_id: security.euler_id,
                        name,
                        value,
                    });
                }
            }
        }

        info!(
            "Assembled {} attribute rows for {} securities",
            rows.len(),
            securities.len()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile;
    use euler_data::StockListRecord;
    use rstest::rstest;

    fn exchanges() -> Vec<ExchangeRecord> {
        vec![
            ExchangeRecord::new("XNYS", "New York Stock Exchange", "United States", "New York"),
            ExchangeRecord::new("XTSE", "Toronto Stock Exchange", "Canada", "Toronto"),
        ]
    }

    fn security(
        id: u64,
        request_id: &str,
        symbol: Option<&str>,
        queuesip: Option<&str>,
        mic: &str,
    ) -> ReconciledSecurity {
        ReconciledSecurity {
            euler_id: EulerId::from(id),
            request_id: request_id.to_string(),
            symbol: symbol.map(str::to_string),
            queuesip: queuesip.map(str::to_string),
            mic: mic.to_string(),
        }
    }

    #[test]
    fn test_assemble_full_row() {
        let master = vec![SecurityMasterRecord::new(Some("AAPL"), None, "SO1")];
        let attributes = vec![
            AttributeRecord::new("R1")
                .asset_class("Domestic Equity")
                .inception_date("1980-12-12")
                .security_name("Apple Inc")
                .return_since_inception("12.5"),
        ];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let rows = assembler
            .assemble(&[security(1, "R1", Some("AAPL"), None, "XNYS")])
            .unwrap();

        let names: Vec<AttributeName> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, AttributeName::all().to_vec());
        assert_eq!(
            rows[1].value,
            AttributeValue::Text("United States - New York".to_string())
        );
        assert_eq!(rows[5].value, AttributeValue::Number(12.5));
        assert_eq!(rows[6].value, AttributeValue::Text("SO1".to_string()));
        assert!(rows.iter().all(|r| r.euler_id == EulerId::from(1)));
    }

    #[test]
    fn test_absent_values_emit_no_rows() {
        let master = vec![SecurityMasterRecord {
            symbol: Some("AAPL".to_string()),
            queuesip: None,
            strong_oak_identifier: None,
        }];
        let attributes = vec![AttributeRecord::new("R1").asset_class("ETF")];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let rows = assembler
            .assemble(&[security(1, "R1", Some("AAPL"), None, "XNYS")])
            .unwrap();

        let names: Vec<AttributeName> = rows.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                AttributeName::ExchangeName,
                AttributeName::ExchangeLocation,
                AttributeName::AssetClass
            ]
        );
    }

    #[test]
    fn test_missing_attribute_row_fails() {
        let master = vec![SecurityMasterRecord::new(Some("AAPL"), None, "SO1")];
        let attributes = vec![AttributeRecord::new("R9").asset_class("ETF")];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let err = assembler
            .assemble(&[security(1, "R1", Some("AAPL"), None, "XNYS")])
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::LookupNotFound {
                table: LookupTable::Attributes,
                ref key,
            } if key == "R1"
        ));
    }

    #[test]
    fn test_missing_exchange_fails() {
        let master = vec![SecurityMasterRecord::new(Some("AAPL"), None, "SO1")];
        let attributes = vec![AttributeRecord::new("R1")];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let err = assembler
            .assemble(&[security(1, "R1", Some("AAPL"), None, "XLON")])
            .unwrap_err();

        assert!(err.to_string().contains("XLON"));
    }

    #[test]
    fn test_missing_identifier_fails() {
        let master = vec![SecurityMasterRecord::new(Some("MSFT"), None, "SO1")];
        let attributes = vec![AttributeRecord::new("R1")];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let err = assembler
            .assemble(&[security(1, "R1", Some("AAPL"), Some("77"), "XNYS")])
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::LookupNotFound {
                table: LookupTable::SecurityMaster,
                ..
            }
        ));
    }

    #[test]
    fn test_identifier_takes_earliest_match() {
        let master = vec![
            SecurityMasterRecord::new(Some("AAPL"), None, "BY_SYMBOL"),
            SecurityMasterRecord::new(Some("OTHER"), Some("55"), "BY_QUEUESIP"),
        ];
        let attributes = vec![AttributeRecord::new("R1")];
        let exchanges = exchanges();
        let assembler = AttributeAssembler::new(&master, &attributes, &exchanges);

        let attrs = assembler
            .attributes_of(&security(1, "R1", Some("AAPL"), Some("55"), "XNYS"))
            .unwrap();

        assert_eq!(
            attrs[6].1,
            Some(AttributeValue::Text("BY_SYMBOL".to_string()))
        );
    }

    #[test]
    fn test_duplicate_attribute_rows() {
        let master = vec![SecurityMasterRecord::new(Some("AAPL"), None, "SO1")];
        let attributes = vec![
            AttributeRecord::new("R1").asset_class("ETF"),
            AttributeRecord::new("R1").asset_class("Domestic Equity"),
        ];
        let exchanges = exchanges();
        let securities = [security(1, "R1", Some("AAPL"), None, "XNYS")];

        let err = AttributeAssembler::new(&master, &attributes, &exchanges)
            .assemble(&securities)
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::AmbiguousLookup { count: 2, .. }
        ));

        let rows = AttributeAssembler::new(&master, &attributes, &exchanges)
            .with_tie_break(TieBreak::FirstMatch)
            .assemble(&securities)
            .unwrap();
        let asset_class = rows
            .iter()
            .find(|r| r.name == AttributeName::AssetClass)
            .unwrap();
        assert_eq!(asset_class.value, AttributeValue::Text("ETF".to_string()));
    }

    #[test]
    fn test_reconciled_securities_always_find_identifier() {
        let mut master = vec![
            SecurityMasterRecord::new(Some("AAPL"), None, "SO1"),
            SecurityMasterRecord::new(None, Some("12345"), "SO2"),
        ];
        let stocks = vec![
            StockListRecord::new("R1", Some("AAPL"), None, "XNYS"),
            StockListRecord::new("R2", Some("SHOP"), Some("12345"), "XTSE"),
        ];
        crate::SymbolNormalizer::default().clean_security_master(&mut master);
        let result = reconcile(&master, &stocks);
        let attributes = vec![AttributeRecord::new("R1"), AttributeRecord::new("R2")];
        let exchanges = exchanges();

        let rows = AttributeAssembler::new(&master, &attributes, &exchanges)
            .assemble(&result.securities)
            .unwrap();

        let identifiers: Vec<&str> = rows
            .iter()
            .filter(|r| r.name == AttributeName::StrongOakIdentifier)
            .filter_map(|r| r.value.as_text())
            .collect();
        assert_eq!(identifiers, vec!["SO2", "SO1"]);
    }

    #[test]
    fn test_numeric_value_parsing() {
        assert_eq!(AttributeValue::numeric(Some("0.5")), Some(AttributeValue::Number(0.5)));
        assert_eq!(
            AttributeValue::numeric(Some("n/a")),
            Some(AttributeValue::Text("n/a".to_string()))
        );
        assert_eq!(AttributeValue::numeric(Some("")), None);
        assert_eq!(AttributeValue::text(None), None);
    }

    #[rstest]
    #[case(AttributeValue::Number(5.0), "5.0")]
    #[case(AttributeValue::Number(-3.0), "-3.0")]
    #[case(AttributeValue::Number(0.25), "0.25")]
    #[case(AttributeValue::Text("5".to_string()), "5")]
    fn test_value_display(#[case] value: AttributeValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}
