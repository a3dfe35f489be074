use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gpred_core::utils::DelimitedTable;

use crate::errors::{AccuracyError, Result};

/// Columns of a target signal summary, one row per region.
pub const SIGNAL_COLUMNS: [&str; 6] = ["name", "size", "covered", "sum", "mean0", "mean"];
pub const SUM_COLUMN: &str = "sum";

///
/// Summed target signal per region name, read from a headerless
/// `name size covered sum mean0 mean` table.
///
#[derive(Debug, Clone)]
pub struct TargetSignal {
    pub path: PathBuf,
    sums: HashMap<String, f64>,
}

impl TargetSignal {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = DelimitedTable::from_path(path, Some(&SIGNAL_COLUMNS[..]))?;
        let sums = table
            .column(SUM_COLUMN)
            .ok_or_else(|| AccuracyError::MissingColumn {
                path: path.to_path_buf(),
                column: SUM_COLUMN.to_string(),
            })?;

        let mut by_name = HashMap::with_capacity(table.len());
        for (name, sum) in table.index().into_iter().zip(sums) {
            let sum = sum
                .parse::<f64>()
                .map_err(|_| AccuracyError::InvalidValue {
                    path: path.to_path_buf(),
                    value: sum.to_string(),
                })?;
            // first row wins for repeated names
            by_name.entry(name.to_string()).or_insert(sum);
        }

        Ok(TargetSignal {
            path: path.to_path_buf(),
            sums: by_name,
        })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.sums.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}
