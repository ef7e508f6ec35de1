use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, info};

use crate::error::{Error, Result};

pub use fasta::FastaRecord;

pub mod fasta;

/// The regular gap character.
pub const GAP: char = '-';
/// Terminator character, treated like a gap.
pub const TERMINATOR: char = '*';

pub fn is_gap(c: char) -> bool {
    c == GAP || c == TERMINATOR
}

/// Returns the sequence with all gap and terminator characters removed.
pub fn ungapped(sequence: &str) -> String {
    sequence.chars().filter(|&c| !is_gap(c)).collect()
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AlignmentRecord {
    pub id: String,
    pub sequence: String,
}

/// A multiple sequence alignment.
///
/// Records keep their input order.
/// All aligned sequences have the same length, and identifiers are unique.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Alignment {
    records: Vec<AlignmentRecord>,
    width: usize,
}

impl Alignment {
    /// Reads an alignment from a fasta file.
    pub fn read_fasta(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::AlignmentFileNotFound {
                path: path.to_path_buf(),
            });
        }

        info!("Loading alignment file {path:?}");
        let file = File::open(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                Error::AlignmentFileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(error)
            }
        })?;
        Self::parse_fasta(BufReader::new(file), &path.to_string_lossy())
    }

    pub fn parse_fasta(input: impl BufRead, source_name: &str) -> Result<Self> {
        let records = fasta::parse_fasta(input, source_name)?;
        Self::from_records(records.into_iter().map(|FastaRecord { id, sequence, .. }| {
            AlignmentRecord { id, sequence }
        }))
    }

    pub fn from_records(records: impl IntoIterator<Item = AlignmentRecord>) -> Result<Self> {
        let records: Vec<_> = records.into_iter().collect();
        let Some(first) = records.first() else {
            return Err(Error::EmptyAlignment);
        };
        let width = first.sequence.chars().count();

        let mut ids = HashSet::new();
        for record in &records {
            if !ids.insert(record.id.as_str()) {
                return Err(Error::DuplicateSequenceId(record.id.clone()));
            }

            let length = record.sequence.chars().count();
            if length != width {
                return Err(Error::AlignmentLengthMismatch {
                    id: record.id.clone(),
                    expected: width,
                    actual: length,
                });
            }
        }

        debug!(
            "Alignment has {} sequences with {width} columns",
            records.len()
        );
        Ok(Self { records, width })
    }

    pub fn get(&self, id: &str) -> Option<&AlignmentRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.id.as_str())
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    /// The number of sequences.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The number of alignment columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the record with the given id, or [`Error::ReferenceNotFound`].
    pub fn reference(&self, reference: &str) -> Result<&AlignmentRecord> {
        self.get(reference).ok_or_else(|| Error::ReferenceNotFound {
            reference: reference.to_string(),
            available: self.ids().map(ToString::to_string).collect(),
        })
    }
}

impl AlignmentRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn ungapped(&self) -> String {
        ungapped(&self.sequence)
    }
}
