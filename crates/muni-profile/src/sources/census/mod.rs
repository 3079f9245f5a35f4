//! Ward-level census CSV ingestion.
//!
//! Census offices publish ward-wise tables as spreadsheet exports; this
//! module turns such an export into the ward slice of [`RawFacts`] so a
//! directory-backed provider (or the demo CLI) can serve it.

mod normalizer;
mod parser;

pub use normalizer::normalize_identifier;

use std::io::Read;
use std::path::Path;

use crate::sections::introduction::domain::WardFacts;

/// Error enumeration for census import failures.
#[derive(Debug, thiserror::Error)]
pub enum CensusImportError {
    #[error("failed to read census export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid census CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("census export lists ward {0} more than once")]
    DuplicateWard(u16),
    #[error("census export contains no ward rows")]
    Empty,
}

pub struct CensusCsvImporter;

impl CensusCsvImporter {
    pub fn wards_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<WardFacts>, CensusImportError> {
        let file = std::fs::File::open(path)?;
        Self::wards_from_reader(file)
    }

    /// Parse and canonicalize ward rows: sorted by ward number, duplicates
    /// rejected so downstream derivation never sees an ill-formed table.
    pub fn wards_from_reader<R: Read>(reader: R) -> Result<Vec<WardFacts>, CensusImportError> {
        let mut wards = parser::parse_ward_rows(reader)?;
        if wards.is_empty() {
            return Err(CensusImportError::Empty);
        }

        wards.sort_by_key(|ward| ward.number);
        for pair in wards.windows(2) {
            if pair[0].number == pair[1].number {
                return Err(CensusImportError::DuplicateWard(pair[0].number));
            }
        }

        Ok(wards)
    }
}
