//! Error types for ntsp-common.

use thiserror::Error;

/// Common error type for ntsp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A write would run past the precomputed end of the buffer.
    #[error("write overflow: needed {needed} bytes but only {available} left")]
    WriteOverflow { needed: usize, available: usize },

    /// The buffer was finished before every reserved byte was written.
    #[error("incomplete write: expected {expected} bytes, wrote {written}")]
    IncompleteWrite { expected: usize, written: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
