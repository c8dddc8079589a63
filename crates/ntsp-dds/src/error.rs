//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed DDS container.
    #[error("DDS error: {0}")]
    Dds(#[from] ddsfile::Error),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// Pixel format or resource type the codec cannot handle.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Pixel data shorter than the mip chain described by the header.
    #[error("truncated pixel data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
