//! ntsp - texture streaming packages.
//!
//! This crate provides a unified interface to the ntsp crates.
//!
//! # Crates
//!
//! - [`ntsp_common`] - Common utilities (binary reading/writing, name hashing)
//! - [`ntsp_dds`] - DDS decoding, pitch computation and header encoding
//! - [`ntsp_pack`] - Package and sidecar building and reading
//!
//! # Example
//!
//! ```no_run
//! use ntsp::prelude::*;
//!
//! let config = PackConfig::new("level01.ntsp").with_sidecar_dir("out");
//! let report = pack(&["textures/rock.dds"], &config)?;
//!
//! let data = std::fs::read("level01.ntsp")?;
//! let package = PackageReader::parse(&data)?;
//! package.verify()?;
//! println!("{} entries", report.entry_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use ntsp_common as common;
pub use ntsp_dds as dds;
pub use ntsp_pack as package;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ntsp_common::hash::name_hash;
    pub use ntsp_dds::{DdsImage, DxgiFormat, TexMetadata};
    pub use ntsp_pack::{
        load_textures, pack, pack_textures, PackConfig, PackReport, PackageReader, Sidecar,
        Texture,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
