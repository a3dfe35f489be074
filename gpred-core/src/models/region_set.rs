use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::RegionSetError;
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the representation of a BED file.
///
/// Regions are kept in the order they appear in the file: row `i` of every
/// output derived from a region set refers to `regions[i]`.
///
#[derive(Clone, Debug)]
pub struct RegionSet {
    pub regions: Vec<Region>,
}

pub struct RegionSetIterator<'a> {
    region_set: &'a RegionSet,
    index: usize,
}

fn parse_coordinate(value: Option<&str>, line: &str) -> Result<u32, RegionSetError> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or_else(|| RegionSetError::RegionParseError(line.to_string()))
}

/// A first row naming its columns, e.g. `chrom start end`.
fn is_column_header(parts: &[&str]) -> bool {
    let first = parts[0].trim().to_ascii_lowercase();
    let coordinates_named = parts[1].trim().parse::<u32>().is_err()
        && parts[2].trim().parse::<u32>().is_err();

    coordinates_named || matches!(first.as_str(), "chrom" | "chr" | "chromosome")
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk (optionally gzipped).
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let path = value;

        if !path.is_file() {
            return Err(RegionSetError::FileReadError(path.display().to_string()));
        }

        let reader = get_dynamic_reader(path)
            .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;

        let mut new_regions: Vec<Region> = Vec::new();

        for line in reader.lines() {
            let string_line = line?;

            if string_line.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = string_line.split('\t').collect();

            if string_line.starts_with("browser")
                | string_line.starts_with("track")
                | string_line.starts_with('#')
            {
                continue;
            }

            // column headers like `chrom start end` without #
            if new_regions.is_empty() && parts.len() >= 3 && is_column_header(&parts) {
                log::debug!("Skipping column header in {}: {}", path.display(), string_line);
                continue;
            }

            if parts.len() < 3 {
                return Err(RegionSetError::RegionParseError(string_line));
            }

            let start = parse_coordinate(parts.get(1).copied(), &string_line)?;
            let end = parse_coordinate(parts.get(2).copied(), &string_line)?;

            if start >= end {
                return Err(RegionSetError::EmptyRegion(string_line));
            }

            new_regions.push(Region {
                chr: parts[0].to_owned(),
                start,
                end,
                rest: Some(parts[3..].join("\t")).filter(|s| !s.is_empty()),
            });
        }

        if new_regions.is_empty() {
            return Err(RegionSetError::EmptyRegionSet(path.display().to_string()));
        }

        Ok(RegionSet {
            regions: new_regions,
        })
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        RegionSet::try_from(value.as_path())
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet { regions }
    }
}

impl<'a> Iterator for RegionSetIterator<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.region_set.regions.len() {
            let region = &self.region_set.regions[self.index];
            self.index += 1;
            Some(region)
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = RegionSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        RegionSetIterator {
            region_set: self,
            index: 0,
        }
    }
}

impl RegionSet {
    ///
    /// Unique chromosomes referenced by the region set
    ///
    pub fn chroms(&self) -> HashSet<String> {
        self.regions.iter().map(|r| r.chr.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
