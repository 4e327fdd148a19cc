//! Error types for the pdfannots library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfannots operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting annotations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not resolve to a file.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The engine rejected the document structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Invalid page selection string.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error while rendering records (table, CSV, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
