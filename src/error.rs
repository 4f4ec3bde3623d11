use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JasparError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid motif ID format: {0}")]
    InvalidIdFormat(String),

    #[error("motif ID already exists: {0}")]
    DuplicateId(String),

    #[error("motif ID not found: {0}")]
    NotFound(String),

    #[error("invalid PFM format: {0}")]
    InvalidPfm(String),

    #[error("the sequence must include only letters")]
    NonAlphabetic,

    #[error("the sequence contains the ambiguous letter {0}")]
    AmbiguousLetter(char),

    #[error("the sequence contains both T and U, choose between DNA and RNA")]
    MixedAlphabet,

    #[error("the sequence is too short, the minimum length of a motif is {0}")]
    SequenceTooShort(usize),

    #[error("the sequence is too long, the maximum length of a motif is {0}")]
    SequenceTooLong(usize),

    #[error("there are no motifs of length {0}")]
    NoMotifsOfLength(usize),

    #[error("PFM column {position} sums to zero")]
    DegenerateColumn { position: usize },

    #[error("unknown amino acid code: {0}")]
    UnknownResidue(char),

    #[error("invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("data error: {0}")]
    DataError(String),
}

/// Type alias for Result with JasparError
pub type Result<T> = std::result::Result<T, JasparError>;

impl JasparError {
    /// Create a new InvalidPfm error
    pub fn invalid_pfm(message: impl Into<String>) -> Self {
        JasparError::InvalidPfm(message.into())
    }

    /// Create a new InvalidFileFormat error
    pub fn invalid_file_format(message: impl Into<String>) -> Self {
        JasparError::InvalidFileFormat(message.into())
    }

    /// Create a new DataError
    pub fn data(message: impl Into<String>) -> Self {
        JasparError::DataError(message.into())
    }
}
