//! On-disk records of the package and sidecar formats.
//!
//! All fields are little-endian and written one at a time; no record has
//! padding. Both signatures are four ASCII characters packed most significant
//! byte first into a `u32` (`'NTSP'` is `0x4E545350`), then stored
//! little-endian, so a package file begins with the bytes `PSTN` and a sidecar
//! with `NTSI`.

use ntsp_common::{BinaryReader, ByteWriter};

use crate::{Error, Result};

/// Package signature, `'NTSP'`.
pub const PACKAGE_SIGNATURE: u32 = 0x4E54_5350;

/// Package format version.
pub const PACKAGE_VERSION: u32 = 1;

/// Sidecar signature, `'ISTN'`.
pub const INFO_SIGNATURE: u32 = 0x4953_544E;

/// Sidecar format version.
pub const INFO_VERSION: u32 = 1;

fn check_signature(expected: u32, actual: u32) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidSignature { expected, actual });
    }
    Ok(())
}

/// Fixed header at the start of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHeader {
    pub signature: u32,
    pub version: u32,
    pub entry_count: u32,
    pub blob_count: u32,
    /// Size of everything before the data section.
    pub header_size: u64,
}

impl PackageHeader {
    pub const SIZE: usize = 24;

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u32(self.signature)?;
        writer.write_u32(self.version)?;
        writer.write_u32(self.entry_count)?;
        writer.write_u32(self.blob_count)?;
        writer.write_u64(self.header_size)?;
        Ok(())
    }

    /// Read and validate signature and version.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let signature = reader.read_u32()?;
        check_signature(PACKAGE_SIGNATURE, signature)?;

        let version = reader.read_u32()?;
        if version != PACKAGE_VERSION {
            return Err(Error::InvalidVersion(version));
        }

        Ok(Self {
            signature,
            version,
            entry_count: reader.read_u32()?,
            blob_count: reader.read_u32()?,
            header_size: reader.read_u64()?,
        })
    }
}

/// One texture in the entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRecord {
    pub name_hash: u32,
    /// Index of the first blob in the blob table.
    pub blob_index: u32,
    pub blob_count: u32,
    pub width: u16,
    pub height: u16,
    /// Absolute file offset of the null-terminated name.
    pub name_offset: u64,
}

impl EntryRecord {
    pub const SIZE: usize = 24;

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u32(self.name_hash)?;
        writer.write_u32(self.blob_index)?;
        writer.write_u32(self.blob_count)?;
        writer.write_u16(self.width)?;
        writer.write_u16(self.height)?;
        writer.write_u64(self.name_offset)?;
        Ok(())
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            name_hash: reader.read_u32()?,
            blob_index: reader.read_u32()?,
            blob_count: reader.read_u32()?,
            width: reader.read_u16()?,
            height: reader.read_u16()?,
            name_offset: reader.read_u64()?,
        })
    }

    /// Range of this entry's blobs in the blob table.
    pub fn blob_range(&self) -> std::ops::Range<usize> {
        let start = self.blob_index as usize;
        start..start + self.blob_count as usize
    }
}

/// One mip level in the blob table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobRecord {
    /// Absolute file offset of the pixel data.
    pub data_offset: u64,
    pub data_size: u64,
}

impl BlobRecord {
    pub const SIZE: usize = 16;

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u64(self.data_offset)?;
        writer.write_u64(self.data_size)?;
        Ok(())
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            data_offset: reader.read_u64()?,
            data_size: reader.read_u64()?,
        })
    }

    /// Offset one past the last byte, `None` if it does not fit in a u64.
    pub fn end(&self) -> Option<u64> {
        self.data_offset.checked_add(self.data_size)
    }
}

/// Fixed header at the start of a sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub signature: u32,
    pub version: u32,
    pub reserved: u32,
    /// Package name length including its null terminator.
    pub package_name_size: u32,
    pub thumbnail_size: u32,
    /// Position of the thumbnail in the texture's mip chain.
    pub thumbnail_index: u32,
}

impl InfoHeader {
    pub const SIZE: usize = 24;

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u32(self.signature)?;
        writer.write_u32(self.version)?;
        writer.write_u32(self.reserved)?;
        writer.write_u32(self.package_name_size)?;
        writer.write_u32(self.thumbnail_size)?;
        writer.write_u32(self.thumbnail_index)?;
        Ok(())
    }

    /// Read and validate signature and version.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let signature = reader.read_u32()?;
        check_signature(INFO_SIGNATURE, signature)?;

        let version = reader.read_u32()?;
        if version != INFO_VERSION {
            return Err(Error::InvalidVersion(version));
        }

        Ok(Self {
            signature,
            version,
            reserved: reader.read_u32()?,
            package_name_size: reader.read_u32()?,
            thumbnail_size: reader.read_u32()?,
            thumbnail_index: reader.read_u32()?,
        })
    }
}
