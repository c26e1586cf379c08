//! Error types for pdfmd.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("PDF file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Invalid render or heading configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The Markdown output could not be written.
    #[error("Error writing markdown file '{}': {source}", .path.display())]
    Write {
        /// Destination that failed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Coarse classification of failures reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file does not exist; nothing was attempted.
    InputNotFound,
    /// Extraction, rendering or writing failed.
    ProcessingFailure,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputNotFound(_) => ErrorKind::InputNotFound,
            _ => ErrorKind::ProcessingFailure,
        }
    }
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputNotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "PDF file 'missing.pdf' not found");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::InputNotFound(PathBuf::from("a.pdf")).kind(),
            ErrorKind::InputNotFound
        );
        assert_eq!(Error::UnknownFormat.kind(), ErrorKind::ProcessingFailure);
        assert_eq!(
            Error::PdfParse("bad xref".into()).kind(),
            ErrorKind::ProcessingFailure
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::ProcessingFailure);
    }
}
