//! Error types for package building.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or reading packages and sidecars.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary reading/writing error.
    #[error("{0}")]
    Common(#[from] ntsp_common::Error),

    /// Texture decoding error.
    #[error("{0}")]
    Dds(#[from] ntsp_dds::Error),

    /// An output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing left to pack.
    #[error("no valid textures to pack")]
    NoTextures,

    /// The path has no usable file stem to name a texture or package.
    #[error("cannot derive a name from {0}")]
    InvalidName(PathBuf),

    /// Two textures share a name hash.
    #[error("name hash collision {hash:#010x} between '{first}' and '{second}'")]
    HashCollision {
        hash: u32,
        first: String,
        second: String,
    },

    /// Texture dimensions do not fit the 16-bit entry fields.
    #[error("texture '{name}' is {width}x{height}, larger than 65535 in one dimension")]
    DimensionOverflow { name: String, width: u32, height: u32 },

    /// A count or size does not fit its 32-bit field.
    #[error("{what} of {count} does not fit in 32 bits")]
    CountOverflow { what: &'static str, count: u64 },

    /// Signature mismatch.
    #[error("invalid signature: expected {expected:#010x}, got {actual:#010x}")]
    InvalidSignature { expected: u32, actual: u32 },

    /// Unsupported format version.
    #[error("unsupported version {0}")]
    InvalidVersion(u32),

    /// A package violates its layout rules.
    #[error("invalid package: {0}")]
    InvalidPackage(String),
}

/// Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Narrow a count to a 32-bit on-disk field.
pub(crate) fn to_u32(what: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::CountOverflow {
        what,
        count: count as u64,
    })
}
