//! End-to-end upload pipeline.
//!
//! Cleans symbols, applies the geography filter, reconciles, assembles the
//! attribute upload and summarizes the run. Nothing is written until both
//! upload tables have been rendered.

use crate::error::Result;
use crate::universe::{ExchangeUniverse, Region};
use euler_data::InputTables;
use euler_output::{
    DatasetSummary, Exporter, InputCounts, Operator, ReportBuilder, UploadFile,
    summarize, write_file,
};
use euler_reconcile::{
    AttributeAssembler, AttributeRow, ReconcileStats, ReconciledSecurity, SymbolNormalizer,
    TieBreak, reconcile,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Exchange domiciles whose listings are eligible.
    pub countries: Vec<String>,

    /// Symbol cleaning applied to the stock list and security master.
    pub normalizer: SymbolNormalizer,

    /// Policy for duplicate attribute or exchange keys.
    pub tie_break: TieBreak,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

impl PipelineConfig {
    /// Default settings targeting `region`.
    pub fn for_region(region: Region) -> Self {
        Self {
            countries: region.countries().iter().map(|c| c.to_string()).collect(),
            normalizer: SymbolNormalizer::default(),
            tie_break: TieBreak::default(),
        }
    }
}

/// Tables and statistics produced by a run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Security upload rows in EulerId order.
    pub securities: Vec<ReconciledSecurity>,

    /// Long-form attribute upload rows.
    pub attributes: Vec<AttributeRow>,

    /// Reconciliation stage counters.
    pub stats: ReconcileStats,

    /// Run summary.
    pub summary: DatasetSummary,
}

impl PipelineOutput {
    /// Render both upload tables as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if either table fails to serialize.
    pub fn render(&self) -> Result<RenderedUploads> {
        Ok(RenderedUploads {
            securities: self
                .securities
                .export_to_string(UploadFile::SecurityUpload.format())?,
            attributes: self
                .attributes
                .export_to_string(UploadFile::AttributeUpload.format())?,
        })
    }

    /// Write the JSON run report next to the uploads and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or written.
    pub fn write_report(&self, dir: &Path, operator: &Operator) -> Result<PathBuf> {
        let path = UploadFile::Summary.path(dir, operator);
        ReportBuilder::new()
            .operator(operator.clone())
            .file(UploadFile::SecurityUpload.file_name(operator))
            .file(UploadFile::AttributeUpload.file_name(operator))
            .summary(self.summary.clone())
            .build()?
            .write_to(&path)?;
        info!("Wrote run report to {}", path.display());
        Ok(path)
    }
}

/// Upload tables rendered in memory, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUploads {
    /// Security upload CSV.
    pub securities: String,

    /// Attribute upload CSV.
    pub attributes: String,
}

impl RenderedUploads {
    /// Write both uploads into `dir` and return their paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn write_to(&self, dir: &Path, operator: &Operator) -> Result<[PathBuf; 2]> {
        let securities = UploadFile::SecurityUpload.path(dir, operator);
        let attributes = UploadFile::AttributeUpload.path(dir, operator);
        write_file(&securities, &self.securities)?;
        write_file(&attributes, &self.attributes)?;
        Ok([securities, attributes])
    }
}

/// Run the pipeline over loaded input tables.
///
/// # Errors
///
/// Returns an error if an attribute, exchange or identifier lookup fails for
/// a reconciled security.
pub fn run(tables: InputTables, config: &PipelineConfig) -> Result<PipelineOutput> {
    let InputTables {
        exchanges,
        mut stock_list,
        mut security_master,
        attributes,
    } = tables;

    info!(normalizer = %config.normalizer, "Cleaning symbols");
    config.normalizer.clean_security_master(&mut security_master);
    config.normalizer.clean_stock_list(&mut stock_list);

    let universe = ExchangeUniverse::from_exchanges(&exchanges, &config.countries);
    let filtered = universe.filter_stock_list(&stock_list);

    let reconciliation = reconcile(&security_master, &filtered);

    let attribute_rows = AttributeAssembler::new(&security_master, &attributes, &exchanges)
        .with_tie_break(config.tie_break)
        .assemble(&reconciliation.securities)?;

    let counts = InputCounts {
        stock_list: stock_list.len(),
        filtered_stock_list: filtered.len(),
        security_master: security_master.len(),
        eligible_master: reconciliation.stats.eligible(),
    };
    let summary = summarize(counts, &reconciliation.securities, &attribute_rows);

    Ok(PipelineOutput {
        securities: reconciliation.securities,
        attributes: attribute_rows,
        stats: reconciliation.stats,
        summary,
    })
}
