use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::{AccuracyError, Result};

///
/// Correlation per (cluster, cell type), filled one cluster row at a time.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMatrix {
    pub cell_types: Vec<String>,
    pub clusters: Vec<String>,
    values: Vec<f64>,
}

impl AccuracyMatrix {
    pub fn new(cell_types: Vec<String>) -> Self {
        AccuracyMatrix {
            cell_types,
            clusters: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append the row of a cluster; `row` holds one value per cell type.
    pub fn push_row(&mut self, cluster: impl Into<String>, row: &[f64]) -> Result<()> {
        if row.len() != self.cell_types.len() {
            return Err(AccuracyError::LengthMismatch(
                row.len(),
                self.cell_types.len(),
            ));
        }
        self.clusters.push(cluster.into());
        self.values.extend_from_slice(row);
        Ok(())
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let width = self.cell_types.len();
        &self.values[index * width..(index + 1) * width]
    }

    pub fn get(&self, cluster: &str, cell_type: &str) -> Option<f64> {
        let row = self.clusters.iter().position(|c| c == cluster)?;
        let column = self.cell_types.iter().position(|c| c == cell_type)?;
        Some(self.row(row)[column])
    }

    ///
    /// Write as a tab-separated table: a header of cell types after an empty
    /// corner cell, then one row per cluster. Undefined values are `NaN`.
    ///
    pub fn write_tsv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(out);

        let mut header = vec![""];
        header.extend(self.cell_types.iter().map(|c| c.as_str()));
        writer.write_record(&header)?;

        for (i, cluster) in self.clusters.iter().enumerate() {
            let mut record = vec![cluster.to_string()];
            record.extend(self.row(i).iter().map(|v| match v.is_nan() {
                true => "NaN".to_string(),
                false => v.to_string(),
            }));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        self.write_tsv(BufWriter::new(File::create(path)?))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
