//! Core data structures for gpred.
//!
//! This crate holds the pieces every other gpred crate needs: genomic
//! [`Region`](models::Region)s read from BED files in their original order,
//! centered [`GenomicSpan`](models::GenomicSpan)s that may run off the end
//! of a chromosome, chromosome size references, an in-memory
//! [`Genome`](genome::Genome) loaded from FASTA, and small readers for
//! tab-delimited tables.
pub mod errors;
pub mod genome;
pub mod models;
pub mod utils;

pub use errors::*;
