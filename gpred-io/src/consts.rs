pub const PREDICTIONS_FILE_NAME: &str = "predict.parquet";
pub const PARTIAL_SUFFIX: &str = "partial";

pub const CHROM_COLUMN: &str = "chrom";
pub const START_COLUMN: &str = "start";
pub const END_COLUMN: &str = "end";
pub const PREDS_COLUMN: &str = "preds";

pub const META_SITE_BINS: &str = "gpred.site_bins";
pub const META_DEPTH: &str = "gpred.depth";
pub const META_SUMMED: &str = "gpred.summed";

/// Rows buffered before a record batch is handed to the Parquet writer.
pub const DEFAULT_BATCH_ROWS: usize = 1024;
