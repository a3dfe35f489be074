use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::{File, create_dir_all, remove_file};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use std::str::FromStr;

use bigtools::beddata::BedParserStreamingIterator;
use bigtools::{BigWigWrite, InputSortType};
use tokio::runtime;

use gpred_core::utils::get_chrom_sizes;

use crate::entries::TrackEntry;
use crate::errors::{Result, TrackError};

/// Default number of zoom levels written to each bigWig.
pub const DEFAULT_ZOOMS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackFormat {
    BigWig,
    BedGraph,
}

impl TrackFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TrackFormat::BigWig => "bw",
            TrackFormat::BedGraph => "bedGraph",
        }
    }
}

impl FromStr for TrackFormat {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bigwig" | "bw" => Ok(TrackFormat::BigWig),
            "bedgraph" => Ok(TrackFormat::BedGraph),
            _ => Err(TrackError::UnknownFormat(s.to_string())),
        }
    }
}

/// File name of the track for one (sequence, target) pair, e.g. `s12_t3.bw`.
pub fn track_file_name(seq_index: usize, target_index: usize, format: TrackFormat) -> String {
    format!("s{}_t{}.{}", seq_index, target_index, format.extension())
}

///
/// Writes tracks against a fixed chromosome sizes reference.
///
pub struct TrackWriter {
    chrom_sizes: HashMap<String, u32>,
    format: TrackFormat,
    zooms: u32,
}

impl TrackWriter {
    pub fn new(chrom_sizes: HashMap<String, u32>, format: TrackFormat) -> Self {
        TrackWriter {
            chrom_sizes,
            format,
            zooms: DEFAULT_ZOOMS,
        }
    }

    pub fn from_chrom_sizes<P: AsRef<Path>>(path: P, format: TrackFormat) -> Result<Self> {
        Ok(TrackWriter::new(get_chrom_sizes(path)?, format))
    }

    pub fn with_zooms(mut self, zooms: u32) -> Self {
        self.zooms = zooms;
        self
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    ///
    /// Write one track. Entries are clipped to the chromosome; entries that
    /// fall entirely outside it are dropped.
    ///
    /// Returns the number of entries written. No file is created when every
    /// entry falls outside the chromosome.
    ///
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        chrom: &str,
        entries: &[TrackEntry],
    ) -> Result<usize> {
        let path = path.as_ref();
        let chrom_len = *self
            .chrom_sizes
            .get(chrom)
            .ok_or_else(|| TrackError::UnknownChromosome(chrom.to_string()))?;

        let bedgraph = bedgraph_records(chrom, entries, chrom_len);
        if bedgraph.len() < entries.len() {
            log::debug!(
                "Clipped {} entries outside {} for {}",
                entries.len() - bedgraph.len(),
                chrom,
                path.display()
            );
        }

        if bedgraph.is_empty() {
            log::warn!(
                "Skipping {}: no entries overlap {} (length {})",
                path.display(),
                chrom,
                chrom_len
            );
            return Ok(0);
        }

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let text = bedgraph.join("");
        match self.format {
            TrackFormat::BedGraph => {
                let mut buf = BufWriter::new(File::create(path)?);
                buf.write_all(text.as_bytes())?;
                buf.flush()?;
            }
            TrackFormat::BigWig => self.write_bigwig(path, text)?,
        }

        Ok(bedgraph.len())
    }

    fn write_bigwig(&self, path: &Path, bedgraph: String) -> Result<()> {
        let bigwig_error = |message: String| TrackError::BigWig {
            path: path.display().to_string(),
            message,
        };

        let mut outb = BigWigWrite::create_file(
            path.to_string_lossy().to_string(),
            self.chrom_sizes.clone(),
        )
        .map_err(|e| bigwig_error(e.to_string()))?;
        outb.options.max_zooms = self.zooms;
        outb.options.compress = true;
        outb.options.input_sort_type = InputSortType::START;
        outb.options.channel_size = 0;

        let runtime = runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| bigwig_error(e.to_string()))?;

        let allow_out_of_order_chroms = !matches!(outb.options.input_sort_type, InputSortType::ALL);
        let vals = BedParserStreamingIterator::from_bedgraph_file(
            Cursor::new(bedgraph.into_bytes()),
            allow_out_of_order_chroms,
        );

        if let Err(err) = outb.write(vals, runtime) {
            // delete the partially written file
            if let Err(e) = remove_file(path) {
                log::warn!("Could not remove {}: {}", path.display(), e);
            }
            return Err(bigwig_error(err.to_string()));
        }

        Ok(())
    }
}

/// bedGraph lines for the entries that overlap `[0, chrom_len)`.
fn bedgraph_records(chrom: &str, entries: &[TrackEntry], chrom_len: u32) -> Vec<String> {
    let chrom_len = chrom_len as i64;
    entries
        .iter()
        .filter_map(|entry| {
            let start = entry.start.max(0);
            let end = entry.end.min(chrom_len);
            if start >= end {
                return None;
            }
            let mut line = String::new();
            let _ = writeln!(line, "{}\t{}\t{}\t{}", chrom, start, end, entry.value);
            Some(line)
        })
        .collect()
}
