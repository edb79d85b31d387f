//! Error types for transpdf.

use std::io;
use thiserror::Error;

/// Result type alias for transpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing and translating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input or writing the output.
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

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A parsing or translation provider could not be initialized.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A single image could not be placed, extracted or embedded.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// The translation provider failed for one request.
    #[error("Translation error: {0}")]
    Translation(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
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

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Translation(err.to_string())
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::ImageExtract(err.to_string())
    }
}
