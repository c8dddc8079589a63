//! Texture package builder.
//!
//! Packs a set of decoded, mip-mapped textures into two kinds of files:
//!
//! - one package (`.ntsp`) holding every texture's full mip chain behind an
//!   entry table sorted by name hash
//! - one sidecar per texture holding the package name, a small thumbnail
//!   level and the texture's DDS header, for preview before the package loads
//!
//! # Package layout
//!
//! | Section | Contents |
//! |---|---|
//! | Header | signature, version, entry count, blob count, header size |
//! | Entries | hash, blob index, blob count, width, height, name offset |
//! | Blobs | absolute data offset and size of every mip level |
//! | Names | null-terminated names in entry order |
//! | Data | raw pixel bytes in blob order, no padding |
//!
//! # Example
//!
//! ```no_run
//! use ntsp_pack::{pack, PackConfig};
//!
//! let config = PackConfig::new("level01.ntsp");
//! let report = pack(&["rock.dds", "moss.dds"], &config)?;
//! println!("{} textures, {} bytes", report.entry_count, report.package_size);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod index;
mod layout;
mod pack;
mod package;
mod reader;
mod sidecar;
mod texture;

pub mod format;
pub mod thumbnail;

pub use error::{Error, Result};
pub use index::TextureSet;
pub use layout::PackageLayout;
pub use pack::{load_textures, pack, pack_textures, PackConfig, PackReport, Skipped};
pub use package::PackageWriter;
pub use reader::PackageReader;
pub use sidecar::{Sidecar, SidecarWriter};
pub use texture::Texture;
pub use thumbnail::{select_thumbnail, Thumbnail, THUMBNAIL_MAX_DIM};
