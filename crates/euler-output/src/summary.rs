//! Dataset summary for a reconciliation run.
//!
//! Summarizes how much of the stock list could be loaded and how the
//! reconciled securities split across asset classes.

use euler_reconcile::{AttributeName, AttributeRow, EulerId, ReconciledSecurity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sizes of the input tables at the points the pipeline measures them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCounts {
    /// Rows in the stock list as loaded.
    pub stock_list: usize,

    /// Stock list rows left after the geography filter.
    pub filtered_stock_list: usize,

    /// Rows in the security master as loaded.
    pub security_master: usize,

    /// Security master rows with at least one join key.
    pub eligible_master: usize,
}

/// Number of reconciled securities in one asset class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClassCount {
    /// Asset class name.
    pub asset_class: String,

    /// Reconciled securities in the class.
    pub count: usize,
}

impl fmt::Display for AssetClassCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.asset_class, self.count)
    }
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Input table sizes.
    pub inputs: InputCounts,

    /// Rows in the security upload.
    pub reconciled: usize,

    /// Reconciled securities per asset class, largest first.
    pub asset_classes: Vec<AssetClassCount>,

    /// Reconciled securities without an asset class.
    pub missing_asset_class: usize,
}

impl DatasetSummary {
    /// Stock list securities that cannot be loaded.
    ///
    /// Fan-out can push the reconciled count past the stock list size, so
    /// this floors at zero.
    pub const fn unloadable(&self) -> usize {
        self.inputs.stock_list.saturating_sub(self.reconciled)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nEuler Upload Summary\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nInputs:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  Stock list:               {}\n",
            self.inputs.stock_list
        ));
        output.push_str(&format!(
            "  In configured geography:  {}\n",
            self.inputs.filtered_stock_list
        ));
        output.push_str(&format!(
            "  Security master:          {} ({} with a join key)\n",
            self.inputs.security_master, self.inputs.eligible_master
        ));

        output.push_str("\nUpload:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("  Reconciled:               {}\n", self.reconciled));
        output.push_str(&format!("  Cannot be loaded:         {}\n", self.unloadable()));

        if !self.asset_classes.is_empty() || self.missing_asset_class > 0 {
            output.push_str("\nAsset Classes:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!("{:<60} {:>12}\n", "Asset Class", "Securities"));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for class in &self.asset_classes {
                output.push_str(&format!("{:<60} {:>12}\n", class.asset_class, class.count));
            }
            if self.missing_asset_class > 0 {
                output.push_str(&format!("{:<60} {:>12}\n", "(none)", self.missing_asset_class));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stock list securities: {}", self.inputs.stock_list)?;
        writeln!(f, "Reconciled securities: {}", self.reconciled)?;
        writeln!(f, "Securities that cannot be loaded: {}", self.unloadable())?;
        for class in &self.asset_classes {
            writeln!(f, "  {}", class)?;
        }
        Ok(())
    }
}

/// Build the run summary from the input sizes and the two upload tables.
///
/// Asset classes are read back from the attribute upload, so the counts
/// reflect exactly what gets loaded.
pub fn summarize(
    inputs: InputCounts,
    securities: &[ReconciledSecurity],
    attributes: &[AttributeRow],
) -> DatasetSummary {
    let class_of: HashMap<EulerId, &str> = attributes
        .iter()
        .filter(|row| row.name == AttributeName::AssetClass)
        .filter_map(|row| row.value.as_text().map(|class| (row.euler_id, class)))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut missing_asset_class = 0;
    for security in securities {
        match class_of.get(&security.euler_id) {
            Some(&class) => *counts.entry(class).or_insert(0) += 1,
            None => missing_asset_class += 1,
        }
    }

    let mut asset_classes: Vec<AssetClassCount> = counts
        .into_iter()
        .map(|(asset_class, count)| AssetClassCount {
            asset_class: asset_class.to_string(),
            count,
        })
        .collect();
    asset_classes.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.asset_class.cmp(&b.asset_class))
    });

    DatasetSummary {
        inputs,
        reconciled: securities.len(),
        asset_classes,
        missing_asset_class,
    }
}
