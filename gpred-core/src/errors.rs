use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionSetError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Region start must be smaller than its end: {0}")]
    EmptyRegion(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyRegionSet(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GenomeError {
    #[error("Chromosome {0} is not present in the genome FASTA")]
    MissingChromosome(String),

    #[error("FASTA file contains sequence data before the first header: {0}")]
    MissingHeader(String),

    #[error("Malformed chromosome sizes line: {0}")]
    ChromSizesParseError(String),

    #[error("Malformed table in {path}: {message}")]
    TableParseError { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GenomeResult<T> = std::result::Result<T, GenomeError>;
