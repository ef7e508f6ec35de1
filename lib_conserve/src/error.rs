use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("Alignment file not found: {path:?}.")]
    AlignmentFileNotFound { path: PathBuf },

    #[error("Malformed fasta input {source_name}: {reason}.")]
    FastaFormat { source_name: String, reason: String },

    #[error("The alignment contains no sequences.")]
    EmptyAlignment,

    #[error("The sequence identifier '{0}' was encountered twice in the alignment.")]
    DuplicateSequenceId(String),

    #[error(
        "Aligned sequence '{id}' has length {actual}, but all sequences must have the length of the first one ({expected})."
    )]
    AlignmentLengthMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Reference '{reference}' not found in alignment. Available identifiers: {available:?}.")]
    ReferenceNotFound {
        reference: String,
        available: Vec<String>,
    },

    #[error(
        "Structure and alignment sequences must be identical.\nAlignment reference: {reference}\nStructure:           {structure}"
    )]
    SequenceMismatch { reference: String, structure: String },

    #[error("The conservation profile is empty, no residues to report on.")]
    EmptyProfile,

    #[error("The structure renderer failed: {0}.")]
    Renderer(String),
}
