use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::errors::{GenomeError, GenomeResult};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Read a chromosome sizes file (`chrom<whitespace>length` per line) keeping
/// the order of the file.
///
pub fn read_chrom_sizes<T: AsRef<Path>>(path: T) -> GenomeResult<Vec<(String, u32)>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut chrom_sizes = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (chrom, size) = match (parts.next(), parts.next()) {
            (Some(chrom), Some(size)) => (chrom, size),
            _ => return Err(GenomeError::ChromSizesParseError(line)),
        };
        let size = size
            .parse::<u32>()
            .map_err(|_| GenomeError::ChromSizesParseError(line.clone()))?;

        chrom_sizes.push((chrom.to_string(), size));
    }

    Ok(chrom_sizes)
}

pub fn get_chrom_sizes<T: AsRef<Path>>(path: T) -> GenomeResult<HashMap<String, u32>> {
    Ok(read_chrom_sizes(path)?.into_iter().collect())
}

///
/// A small tab-delimited table, read fully into memory.
///
/// Used for the targets tables and the per-region signal summaries, which
/// are indexed by their first column.
///
#[derive(Debug, Clone, Default)]
pub struct DelimitedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    ///
    /// Read a tab-delimited table.
    ///
    /// # Arguments
    /// - path: table on disk (optionally gzipped)
    /// - columns: `None` to take column names from the first line, or the
    ///   names to assign to a headerless table
    ///
    pub fn from_path<T: AsRef<Path>>(path: T, columns: Option<&[&str]>) -> GenomeResult<Self> {
        let path = path.as_ref();
        let parse_error = |message: String| GenomeError::TableParseError {
            path: path.display().to_string(),
            message,
        };

        let reader = get_dynamic_reader(path).map_err(|e| parse_error(e.to_string()))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(columns.is_none())
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = match columns {
            Some(columns) => columns.iter().map(|c| c.to_string()).collect(),
            None => reader
                .headers()
                .map_err(|e| parse_error(e.to_string()))?
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| parse_error(e.to_string()))?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            if record.len() < columns.len() {
                return Err(parse_error(format!(
                    "expected {} columns but found {}: {}",
                    columns.len(),
                    record.len(),
                    record.iter().collect::<Vec<_>>().join("\t")
                )));
            }
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Ok(DelimitedTable { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Values of the first column, the table index.
    pub fn index(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(|s| s.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[rstest]
    fn test_read_chrom_sizes_keeps_order() {
        let file = write_temp("chr2\t300\nchr1  100\n\n", ".sizes");
        let sizes = read_chrom_sizes(file.path()).unwrap();
        assert_eq!(
            sizes,
            vec![("chr2".to_string(), 300), ("chr1".to_string(), 100)]
        );

        let map = get_chrom_sizes(file.path()).unwrap();
        assert_eq!(map.get("chr1"), Some(&100));
    }

    #[rstest]
    fn test_read_chrom_sizes_bad_line() {
        let file = write_temp("chr2\n", ".sizes");
        assert!(matches!(
            read_chrom_sizes(file.path()),
            Err(GenomeError::ChromSizesParseError(_))
        ));
    }

    #[rstest]
    fn test_table_with_header() {
        let file = write_temp(
            "index\tidentifier\tdescription\n0\tCT1\tfirst\n1\tCT2\tsecond\n",
            ".txt",
        );
        let table = DelimitedTable::from_path(file.path(), None).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("identifier").unwrap(), vec!["CT1", "CT2"]);
        assert_eq!(table.index(), vec!["0", "1"]);
        assert!(table.column("missing").is_none());
    }

    #[rstest]
    fn test_table_with_given_columns() {
        let file = write_temp("r1\t10\t10\t4.5\t0.4\t0.4\n", ".out");
        let names = ["name", "size", "covered", "sum", "mean0", "mean"];
        let table = DelimitedTable::from_path(file.path(), Some(&names[..])).unwrap();

        assert_eq!(table.column("sum").unwrap(), vec!["4.5"]);
    }

    #[rstest]
    fn test_table_unquotes_fields() {
        let file = write_temp("index\tidentifier\n0\t\"CT1\"\n\n1\t\"CT 2\"\n", ".txt");
        let table = DelimitedTable::from_path(file.path(), None).unwrap();

        assert_eq!(table.column("identifier").unwrap(), vec!["CT1", "CT 2"]);
    }

    #[rstest]
    fn test_table_short_row() {
        let file = write_temp("a\tb\n1\n", ".txt");
        assert!(DelimitedTable::from_path(file.path(), None).is_err());
    }

    #[rstest]
    fn test_dynamic_reader_gz() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("table.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"hello\n").unwrap();
        encoder.finish().unwrap();

        let mut line = String::new();
        get_dynamic_reader(&path).unwrap().read_line(&mut line).unwrap();
        assert_eq!(line, "hello\n");
    }
}
