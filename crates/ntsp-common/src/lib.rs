//! Common utilities for ntsp.
//!
//! This crate provides foundational types used across all ntsp crates:
//!
//! - [`BinaryReader`] - Bounded binary reading from byte slices
//! - [`ByteWriter`] - Append-only binary writing into a buffer of known size
//! - [`hash`] - The 31-bit texture name hash

mod error;
mod reader;
mod writer;

pub mod hash;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::ByteWriter;
