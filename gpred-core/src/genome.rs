//! In-memory genome sequence access.
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use crate::errors::{GenomeError, GenomeResult};
use crate::models::GenomicSpan;
use crate::utils::get_dynamic_reader;

/// Base used to fill positions that fall outside a chromosome.
pub const PAD_BASE: u8 = b'N';

///
/// Chromosome sequences loaded from a FASTA file.
///
#[derive(Debug, Clone, Default)]
pub struct Genome {
    sequences: HashMap<String, Vec<u8>>,
}

impl Genome {
    ///
    /// Load sequences from a (optionally gzipped) FASTA file.
    ///
    /// # Arguments
    /// - path: the FASTA file
    /// - keep: when given, only chromosomes in this set are kept in memory
    ///
    pub fn from_fasta<T: AsRef<Path>>(path: T, keep: Option<&HashSet<String>>) -> GenomeResult<Self> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)
            .map_err(|e| GenomeError::Io(std::io::Error::other(e.to_string())))?;

        let mut sequences: HashMap<String, Vec<u8>> = HashMap::new();
        let mut current: Option<(String, Vec<u8>)> = None;
        let mut skipping = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end();

            if let Some(definition) = line.strip_prefix('>') {
                if let Some((name, seq)) = current.take() {
                    sequences.insert(name, seq);
                }
                // the name is the first word of the definition line
                let name = definition.split_whitespace().next().unwrap_or("").to_string();
                skipping = keep.is_some_and(|keep| !keep.contains(&name));
                if !skipping {
                    current = Some((name, Vec::new()));
                }
                continue;
            }

            if skipping || line.is_empty() {
                continue;
            }

            match current.as_mut() {
                Some((_, seq)) => seq.extend_from_slice(line.as_bytes()),
                None => return Err(GenomeError::MissingHeader(path.display().to_string())),
            }
        }

        if let Some((name, seq)) = current.take() {
            sequences.insert(name, seq);
        }

        log::debug!(
            "Loaded {} sequences from {}",
            sequences.len(),
            path.display()
        );

        Ok(Genome { sequences })
    }

    ///
    /// Fetch the sequence of a span, filling positions before the chromosome
    /// start or past its end with [`PAD_BASE`]. The result always has
    /// `span.width()` bases.
    ///
    pub fn fetch_padded(&self, span: &GenomicSpan) -> GenomeResult<Vec<u8>> {
        let seq = self
            .sequences
            .get(&span.chr)
            .ok_or_else(|| GenomeError::MissingChromosome(span.chr.clone()))?;

        let width = span.width().max(0) as usize;
        let mut out = Vec::with_capacity(width);

        let chrom_len = seq.len() as i64;
        let left_pad = (-span.start).clamp(0, width as i64) as usize;
        let fetch_start = span.start.clamp(0, chrom_len);
        let fetch_end = span.end.clamp(fetch_start, chrom_len);

        out.resize(left_pad, PAD_BASE);
        out.extend_from_slice(&seq[fetch_start as usize..fetch_end as usize]);
        out.resize(width, PAD_BASE);

        Ok(out)
    }
}

impl From<HashMap<String, Vec<u8>>> for Genome {
    fn from(sequences: HashMap<String, Vec<u8>>) -> Self {
        Genome { sequences }
    }
}
