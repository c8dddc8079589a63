//! Package layout computation.
//!
//! Layout: Header | Entries | Blobs | Names | Data
//!
//! Everything before the data section is the "header" and its size is known
//! before any byte is written, so every blob gets its final absolute offset
//! up front.

use crate::error::to_u32;
use crate::format::{BlobRecord, EntryRecord, PackageHeader, PACKAGE_SIGNATURE, PACKAGE_VERSION};
use crate::{Result, TextureSet};

/// Every offset and record of a package, computed from a [`TextureSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub header: PackageHeader,
    /// One record per texture, in hash order.
    pub entries: Vec<EntryRecord>,
    /// One record per mip image, in entry order then mip order.
    pub blobs: Vec<BlobRecord>,
    /// Offset of the first name.
    pub names_offset: u64,
}

impl PackageLayout {
    /// Compute the layout of `textures`.
    pub fn compute(textures: &TextureSet) -> Result<Self> {
        let entry_count = textures.len();
        let blob_count = textures.blob_count();
        let names_size: usize = textures.iter().map(|t| t.name().len() + 1).sum();

        let entries_offset = PackageHeader::SIZE;
        let blobs_offset = entries_offset + EntryRecord::SIZE * entry_count;
        let names_offset = blobs_offset + BlobRecord::SIZE * blob_count;
        let header_size = names_offset + names_size;

        let mut entries = Vec::with_capacity(entry_count);
        let mut blobs = Vec::with_capacity(blob_count);

        let mut name_offset = names_offset as u64;
        let mut data_offset = header_size as u64;

        for texture in textures.iter() {
            entries.push(EntryRecord {
                name_hash: texture.hash(),
                blob_index: to_u32("blob index", blobs.len())?,
                blob_count: to_u32("blob count", texture.mip_count())?,
                width: texture.width(),
                height: texture.height(),
                name_offset,
            });

            for mip in texture.mips() {
                let data_size = mip.slice_pitch() as u64;
                blobs.push(BlobRecord {
                    data_offset,
                    data_size,
                });
                data_offset += data_size;
            }

            name_offset += texture.name().len() as u64 + 1;
        }

        let header = PackageHeader {
            signature: PACKAGE_SIGNATURE,
            version: PACKAGE_VERSION,
            entry_count: to_u32("entry count", entry_count)?,
            blob_count: to_u32("blob count", blob_count)?,
            header_size: header_size as u64,
        };

        Ok(Self {
            header,
            entries,
            blobs,
            names_offset: names_offset as u64,
        })
    }

    /// Size of everything before the data section.
    pub fn header_size(&self) -> u64 {
        self.header.header_size
    }

    /// Total pixel bytes in the data section.
    pub fn data_size(&self) -> u64 {
        self.blobs.iter().map(|blob| blob.data_size).sum()
    }

    /// Size of the finished package file.
    pub fn file_size(&self) -> u64 {
        self.header_size() + self.data_size()
    }
}
