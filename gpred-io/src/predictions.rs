use std::collections::HashMap;
use std::fs::{File, create_dir_all, remove_file, rename};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, FixedSizeListArray, Float16Array, Float32Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use half::f16;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use gpred_core::models::GenomicSpan;

use crate::consts::*;
use crate::error::{PredictionsError, Result};

///
/// Shape of one prediction row.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionShape {
    pub site_bins: usize,
    pub depth: usize,
    pub summed: bool,
}

impl PredictionShape {
    /// Number of values stored per row.
    pub fn row_width(&self) -> usize {
        match self.summed {
            true => self.depth,
            false => self.site_bins * self.depth,
        }
    }

    /// Whether a row holds exactly one value per channel.
    pub fn is_squeezable(&self) -> bool {
        self.summed || self.site_bins == 1
    }

    fn to_metadata(self) -> HashMap<String, String> {
        HashMap::from([
            (META_SITE_BINS.to_string(), self.site_bins.to_string()),
            (META_DEPTH.to_string(), self.depth.to_string()),
            (META_SUMMED.to_string(), self.summed.to_string()),
        ])
    }

    fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self> {
        fn get<T: std::str::FromStr>(metadata: &HashMap<String, String>, key: &str) -> Result<T> {
            let value = metadata
                .get(key)
                .ok_or_else(|| PredictionsError::MissingMetadata(key.to_string()))?;
            value.parse::<T>().map_err(|_| PredictionsError::InvalidMetadata {
                key: key.to_string(),
                value: value.clone(),
            })
        }

        Ok(PredictionShape {
            site_bins: get(metadata, META_SITE_BINS)?,
            depth: get(metadata, META_DEPTH)?,
            summed: get(metadata, META_SUMMED)?,
        })
    }
}

fn item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Float16, true))
}

fn prediction_schema(shape: PredictionShape) -> SchemaRef {
    let fields = vec![
        Field::new(CHROM_COLUMN, DataType::Utf8, false),
        Field::new(START_COLUMN, DataType::Int64, false),
        Field::new(END_COLUMN, DataType::Int64, false),
        Field::new(
            PREDS_COLUMN,
            DataType::FixedSizeList(item_field(), shape.row_width() as i32),
            false,
        ),
    ];
    Arc::new(Schema::new_with_metadata(fields, shape.to_metadata()))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

///
/// Owned writer for a prediction table.
///
/// Rows are written to a sibling `.partial` file which is renamed into
/// place by [`PredictionWriter::finish`]. Dropping the writer without
/// finishing removes the partial file, so an aborted run leaves no output.
///
pub struct PredictionWriter {
    path: PathBuf,
    partial: PathBuf,
    writer: Option<ArrowWriter<File>>,
    schema: SchemaRef,
    shape: PredictionShape,
    batch_rows: usize,
    rows_written: usize,

    chroms: Vec<String>,
    starts: Vec<i64>,
    ends: Vec<i64>,
    values: Vec<f16>,
}

impl PredictionWriter {
    ///
    /// Create a writer, replacing any existing file at `path`.
    ///
    pub fn create<P: AsRef<Path>>(path: P, shape: PredictionShape) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        if path.is_file() {
            log::info!("Removing existing predictions {}", path.display());
            remove_file(&path)?;
        }

        let partial = partial_path(&path);
        let schema = prediction_schema(shape);
        let file = File::create(&partial)?;
        let writer = ArrowWriter::try_new(file, schema.clone(), None)?;

        Ok(PredictionWriter {
            path,
            partial,
            writer: Some(writer),
            schema,
            shape,
            batch_rows: DEFAULT_BATCH_ROWS,
            rows_written: 0,
            chroms: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            values: Vec::new(),
        })
    }

    pub fn with_batch_rows(mut self, batch_rows: usize) -> Self {
        self.batch_rows = batch_rows.max(1);
        self
    }

    pub fn shape(&self) -> PredictionShape {
        self.shape
    }

    /// Number of rows accepted so far.
    pub fn len(&self) -> usize {
        self.rows_written + self.chroms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Append the row for sequence `index`. Rows must arrive in index order.
    ///
    pub fn write_row(&mut self, index: usize, span: &GenomicSpan, values: &[f32]) -> Result<()> {
        if index != self.len() {
            return Err(PredictionsError::OutOfOrder {
                expected: self.len(),
                found: index,
            });
        }
        if values.len() != self.shape.row_width() {
            return Err(PredictionsError::WidthMismatch {
                expected: self.shape.row_width(),
                found: values.len(),
            });
        }

        self.chroms.push(span.chr.clone());
        self.starts.push(span.start);
        self.ends.push(span.end);
        self.values.extend(values.iter().map(|v| f16::from_f32(*v)));

        if self.chroms.len() >= self.batch_rows {
            self.flush()?;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.chroms.is_empty() {
            return Ok(());
        }

        let n_rows = self.chroms.len();
        let values = Float16Array::from(std::mem::take(&mut self.values));
        let preds = FixedSizeListArray::try_new(
            item_field(),
            self.shape.row_width() as i32,
            Arc::new(values),
            None,
        )?;

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.chroms))),
            Arc::new(Int64Array::from(std::mem::take(&mut self.starts))),
            Arc::new(Int64Array::from(std::mem::take(&mut self.ends))),
            Arc::new(preds),
        ];
        let batch = RecordBatch::try_new(self.schema.clone(), columns)?;

        if let Some(writer) = self.writer.as_mut() {
            writer.write(&batch)?;
        }
        self.rows_written += n_rows;

        Ok(())
    }

    ///
    /// Flush remaining rows, close the file and move it into place.
    ///
    pub fn finish(mut self) -> Result<PathBuf> {
        self.flush()?;
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.close() {
                self.remove_partial();
                return Err(e.into());
            }
        }
        if let Err(e) = rename(&self.partial, &self.path) {
            self.remove_partial();
            return Err(e.into());
        }

        log::info!(
            "Wrote {} prediction rows to {}",
            self.rows_written,
            self.path.display()
        );

        Ok(self.path.clone())
    }

    fn remove_partial(&self) {
        if let Err(e) = remove_file(&self.partial) {
            log::warn!(
                "Could not remove partial predictions {}: {}",
                self.partial.display(),
                e
            );
        }
    }
}

impl Drop for PredictionWriter {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            self.remove_partial();
        }
    }
}

///
/// A prediction table read fully into memory.
///
/// Values are widened to `f32`; null entries become NaN.
///
#[derive(Debug, Clone)]
pub struct PredictionTable {
    pub chroms: Vec<String>,
    pub starts: Vec<i64>,
    pub ends: Vec<i64>,
    pub values: Vec<f32>,
    pub shape: PredictionShape,
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| PredictionsError::MissingColumn(name.to_string()))?;
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| PredictionsError::UnexpectedType {
            column: name.to_string(),
            found: array.data_type().to_string(),
        })
}

fn extend_values(out: &mut Vec<f32>, values: &ArrayRef) -> Result<()> {
    match values.data_type() {
        DataType::Float16 => {
            let values = values
                .as_any()
                .downcast_ref::<Float16Array>()
                .ok_or_else(|| PredictionsError::UnexpectedType {
                    column: PREDS_COLUMN.to_string(),
                    found: values.data_type().to_string(),
                })?;
            out.extend(values.iter().map(|v| v.map_or(f32::NAN, |v| v.to_f32())));
        }
        DataType::Float32 => {
            let values = values
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| PredictionsError::UnexpectedType {
                    column: PREDS_COLUMN.to_string(),
                    found: values.data_type().to_string(),
                })?;
            out.extend(values.iter().map(|v| v.unwrap_or(f32::NAN)));
        }
        other => {
            return Err(PredictionsError::UnexpectedType {
                column: PREDS_COLUMN.to_string(),
                found: other.to_string(),
            });
        }
    }
    Ok(())
}

impl PredictionTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let shape = PredictionShape::from_metadata(builder.schema().metadata())?;
        let reader = builder.build()?;

        let mut table = PredictionTable {
            chroms: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            values: Vec::new(),
            shape,
        };

        for batch in reader {
            let batch = batch?;

            let chroms = column::<StringArray>(&batch, CHROM_COLUMN)?;
            let starts = column::<Int64Array>(&batch, START_COLUMN)?;
            let ends = column::<Int64Array>(&batch, END_COLUMN)?;
            let preds = column::<FixedSizeListArray>(&batch, PREDS_COLUMN)?;

            if preds.value_length() as usize != shape.row_width() {
                return Err(PredictionsError::WidthMismatch {
                    expected: shape.row_width(),
                    found: preds.value_length() as usize,
                });
            }

            table
                .chroms
                .extend(chroms.iter().map(|c| c.unwrap_or_default().to_string()));
            table.starts.extend(starts.values().iter().copied());
            table.ends.extend(ends.values().iter().copied());
            extend_values(&mut table.values, preds.values())?;
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.chroms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chroms.is_empty()
    }

    pub fn span(&self, index: usize) -> GenomicSpan {
        GenomicSpan::new(
            self.chroms[index].clone(),
            self.starts[index],
            self.ends[index],
        )
    }

    /// All values stored for one row.
    pub fn row(&self, index: usize) -> &[f32] {
        let width = self.shape.row_width();
        &self.values[index * width..(index + 1) * width]
    }

    ///
    /// Number of channels once the site axis is squeezed away; fails unless
    /// each row holds exactly one value per channel.
    ///
    pub fn squeezed_depth(&self) -> Result<usize> {
        match self.shape.is_squeezable() {
            true => Ok(self.shape.depth),
            false => Err(PredictionsError::NotSqueezable {
                site_bins: self.shape.site_bins,
                depth: self.shape.depth,
            }),
        }
    }

    ///
    /// One score per row, for tables with a single value per row such as a
    /// binary classifier's output. NaN scores are reported as 0.
    ///
    pub fn scores(&self) -> Result<Vec<f32>> {
        if self.shape.row_width() != 1 {
            return Err(PredictionsError::NotSqueezable {
                site_bins: self.shape.site_bins,
                depth: self.shape.depth,
            });
        }
        Ok(self
            .values
            .iter()
            .map(|v| if v.is_nan() { 0.0 } else { *v })
            .collect())
    }
}
