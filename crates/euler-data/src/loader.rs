//! Delimited-file loaders for the four input tables.

use crate::error::{DataError, Result};
use crate::records::{AttributeRecord, ExchangeRecord, SecurityMasterRecord, StockListRecord};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The input files read by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFile {
    /// Exchange reference (pipe-delimited).
    Exchange,
    /// External stock list.
    StockList,
    /// Strong Oak security master.
    SecurityMaster,
    /// Security attributes.
    Attributes,
}

impl InputFile {
    /// File name inside the data directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Exchange => "exchange.data",
            Self::StockList => "stock.data",
            Self::SecurityMaster => "strong_oak_security_master.csv",
            Self::Attributes => "attributes.data",
        }
    }

    /// Field delimiter used by the file.
    pub const fn delimiter(&self) -> u8 {
        match self {
            Self::Exchange => b'|',
            Self::StockList | Self::SecurityMaster | Self::Attributes => b',',
        }
    }
}

/// Read every row of a delimited table from `reader`.
///
/// Fields are trimmed and the first row is the header.
///
/// # Errors
///
/// Returns an error if a row cannot be decoded into `T`.
pub fn read_table<T, R>(reader: R, delimiter: u8) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.deserialize::<T>() {
        rows.push(record?);
    }
    Ok(rows)
}

/// All four input tables of a run.
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    /// Exchange reference.
    pub exchanges: Vec<ExchangeRecord>,
    /// External stock list.
    pub stock_list: Vec<StockListRecord>,
    /// Strong Oak security master.
    pub security_master: Vec<SecurityMasterRecord>,
    /// Security attributes.
    pub attributes: Vec<AttributeRecord>,
}

/// Reads the input tables from a data directory.
#[derive(Debug, Clone)]
pub struct DataSource {
    data_dir: PathBuf,
}

impl DataSource {
    /// Create a source rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of an input file.
    pub fn path(&self, file: InputFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// Load the exchange reference. Rows without a MIC are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn exchanges(&self) -> Result<Vec<ExchangeRecord>> {
        let rows: Vec<ExchangeRecord> = self.load(InputFile::Exchange)?;
        Ok(drop_keyless(InputFile::Exchange, "MIC", rows, |row| row.mic.as_str()))
    }

    /// Load the stock list.
    ///
    /// A blank MIC is kept as an empty string; the geography filter
    /// excludes such rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or has a row
    /// without a RequestId.
    pub fn stock_list(&self) -> Result<Vec<StockListRecord>> {
        let rows: Vec<StockListRecord> = self.load(InputFile::StockList)?;
        for (idx, row) in rows.iter().enumerate() {
            require(InputFile::StockList, idx, "RequestId", &row.request_id)?;
        }
        Ok(rows)
    }

    /// Load the security master.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn security_master(&self) -> Result<Vec<SecurityMasterRecord>> {
        self.load(InputFile::SecurityMaster)
    }

    /// Load the attribute table. Rows without a RequestId are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn attributes(&self) -> Result<Vec<AttributeRecord>> {
        let rows: Vec<AttributeRecord> = self.load(InputFile::Attributes)?;
        Ok(drop_keyless(InputFile::Attributes, "RequestId", rows, |row| row.request_id.as_str()))
    }

    /// Load all four tables.
    ///
    /// # Errors
    ///
    /// Returns the first loading error encountered.
    pub fn load_all(&self) -> Result<InputTables> {
        let tables = InputTables {
            exchanges: self.exchanges()?,
            stock_list: self.stock_list()?,
            security_master: self.security_master()?,
            attributes: self.attributes()?,
        };

        info!(
            exchanges = tables.exchanges.len(),
            stock_list = tables.stock_list.len(),
            security_master = tables.security_master.len(),
            attributes = tables.attributes.len(),
            "Loaded input tables from {}",
            self.data_dir.display()
        );

        Ok(tables)
    }

    fn load<T: DeserializeOwned>(&self, file: InputFile) -> Result<Vec<T>> {
        let path = self.path(file);
        debug!("Reading {}", path.display());

        let handle = match File::open(&path) {
            Ok(handle) => handle,
            Err(source) => return Err(DataError::Open { path, source }),
        };
        read_table(handle, file.delimiter()).map_err(|e| match e {
            DataError::Csv(source) => DataError::Read { path, source },
            other => other,
        })
    }
}

/// Drop rows whose lookup key is blank; they can never be matched.
fn drop_keyless<T>(
    file: InputFile,
    field: &str,
    rows: Vec<T>,
    key: impl Fn(&T) -> &str,
) -> Vec<T> {
    let total = rows.len();
    let kept: Vec<T> = rows.into_iter().filter(|row| !key(row).is_empty()).collect();
    if kept.len() < total {
        debug!(
            "Skipped {} rows without a {} in {}",
            total - kept.len(),
            field,
            file.file_name()
        );
    }
    kept
}

fn require(file: InputFile, idx: usize, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        // Header is line 1, so data row `idx` is line `idx + 2`.
        return Err(DataError::Parse(format!(
            "{}: line {} has an empty {}",
            file.file_name(),
            idx + 2,
            field
        )));
    }
    Ok(())
}
