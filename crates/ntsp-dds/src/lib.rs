//! DDS texture handling for ntsp.
//!
//! This crate is the image codec used by the packer. It provides:
//!
//! - [`DdsImage`] - a decoded DDS file: metadata plus every image of its mip
//!   chain, ordered item-major then largest mip first
//! - [`compute_pitch`] - row and slice pitch of a level for a [`DxgiFormat`]
//! - [`encode_dds_header`] / [`decode_dds_header`] - the format header of a
//!   [`TexMetadata`]
//!
//! Container parsing and header serialization go through `ddsfile`.
//!
//! # Example
//!
//! ```no_run
//! use ntsp_dds::DdsImage;
//!
//! let image = DdsImage::open("path/to/texture.dds")?;
//! for level in image.images() {
//!     println!("{}x{}: {} bytes", level.width, level.height, level.slice_pitch());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod format;
mod header;
mod image;

pub use ddsfile::DxgiFormat;
pub use error::{Error, Result};
pub use format::{compute_pitch, Pitch};
pub use header::{decode_dds_header, encode_dds_header, FORMAT_BLOCK_SIZE};
pub use image::{DdsImage, Image, TexMetadata};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
