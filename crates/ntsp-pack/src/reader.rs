//! Package reading and verification.
//!
//! Lookups binary-search the entry table by name hash and then compare the
//! stored name, which relies on the build-time guarantee that no two entries
//! share a hash.

use ntsp_common::hash::name_hash;
use ntsp_common::BinaryReader;

use crate::format::{BlobRecord, EntryRecord, PackageHeader};
use crate::{Error, Result};

/// A package held in memory.
#[derive(Debug, Clone)]
pub struct PackageReader<'a> {
    data: &'a [u8],
    header: PackageHeader,
    entries: Vec<EntryRecord>,
    blobs: Vec<BlobRecord>,
    names_offset: usize,
}

impl<'a> PackageReader<'a> {
    /// Decode the header and tables of a package.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header = PackageHeader::read(&mut reader)?;

        if header.header_size > data.len() as u64 {
            return Err(Error::InvalidPackage(format!(
                "header size {} exceeds file size {}",
                header.header_size,
                data.len()
            )));
        }

        let entries = (0..header.entry_count)
            .map(|_| EntryRecord::read(&mut reader))
            .collect::<Result<Vec<_>>>()?;
        let blobs = (0..header.blob_count)
            .map(|_| BlobRecord::read(&mut reader))
            .collect::<Result<Vec<_>>>()?;

        let names_offset = reader.position();
        if names_offset as u64 > header.header_size {
            return Err(Error::InvalidPackage(format!(
                "tables end at {} past header size {}",
                names_offset, header.header_size
            )));
        }

        Ok(Self {
            data,
            header,
            entries,
            blobs,
            names_offset,
        })
    }

    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    pub fn entries(&self) -> &[EntryRecord] {
        &self.entries
    }

    pub fn blobs(&self) -> &[BlobRecord] {
        &self.blobs
    }

    /// Name of an entry, read from the name table.
    pub fn name(&self, entry: &EntryRecord) -> Result<&'a str> {
        let offset = entry.name_offset as usize;
        let header_size = self.header.header_size as usize;
        if offset < self.names_offset || offset >= header_size {
            return Err(Error::InvalidPackage(format!(
                "name offset {} outside name table {}..{}",
                offset, self.names_offset, header_size
            )));
        }
        Ok(BinaryReader::new_at(&self.data[..header_size], offset).read_cstring()?)
    }

    /// Blob records of an entry, largest mip first.
    pub fn entry_blobs(&self, entry: &EntryRecord) -> Result<&[BlobRecord]> {
        self.blobs.get(entry.blob_range()).ok_or_else(|| {
            Error::InvalidPackage(format!(
                "blobs {:?} out of range of {}",
                entry.blob_range(),
                self.blobs.len()
            ))
        })
    }

    /// Pixel bytes of a blob.
    pub fn blob_data(&self, blob: &BlobRecord) -> Result<&'a [u8]> {
        usize::try_from(blob.data_offset)
            .ok()
            .zip(blob.end().and_then(|end| usize::try_from(end).ok()))
            .and_then(|(start, end)| self.data.get(start..end))
            .ok_or_else(|| {
                Error::InvalidPackage(format!(
                    "blob {}+{} outside file of {} bytes",
                    blob.data_offset,
                    blob.data_size,
                    self.data.len()
                ))
            })
    }

    /// Find a texture by name.
    pub fn find(&self, name: &str) -> Option<&EntryRecord> {
        let hash = name_hash(name);
        let index = self
            .entries
            .binary_search_by_key(&hash, |entry| entry.name_hash)
            .ok()?;
        let entry = &self.entries[index];
        match self.name(entry) {
            Ok(stored) if stored == name => Some(entry),
            _ => None,
        }
    }

    /// Check every layout rule of the package.
    pub fn verify(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidPackage(msg));

        if let Some(pair) = self.entries.windows(2).find(|p| p[0].name_hash >= p[1].name_hash) {
            return fail(format!(
                "entries not strictly ascending: {:#010x} then {:#010x}",
                pair[0].name_hash, pair[1].name_hash
            ));
        }

        let blob_sum: u64 = self.entries.iter().map(|e| e.blob_count as u64).sum();
        if blob_sum != self.header.blob_count as u64 {
            return fail(format!(
                "entries reference {} blobs, header declares {}",
                blob_sum, self.header.blob_count
            ));
        }

        let mut next_blob = 0u32;
        let mut next_offset = self.header.header_size;
        let mut next_name = self.names_offset as u64;

        for entry in &self.entries {
            if entry.blob_index != next_blob {
                return fail(format!(
                    "entry {:#010x} starts at blob {}, expected {}",
                    entry.name_hash, entry.blob_index, next_blob
                ));
            }
            next_blob += entry.blob_count;

            for blob in self.entry_blobs(entry)? {
                if blob.data_offset != next_offset {
                    return fail(format!(
                        "blob at {} is not contiguous, expected {}",
                        blob.data_offset, next_offset
                    ));
                }
                next_offset = match blob.end() {
                    Some(end) => end,
                    None => {
                        return fail(format!(
                            "blob {}+{} overflows the file offset range",
                            blob.data_offset, blob.data_size
                        ))
                    }
                };
            }

            if entry.name_offset != next_name {
                return fail(format!(
                    "entry {:#010x} name at {}, expected {}",
                    entry.name_hash, entry.name_offset, next_name
                ));
            }
            let name = self.name(entry)?;
            if name_hash(name) != entry.name_hash {
                return fail(format!(
                    "name '{}' does not hash to {:#010x}",
                    name, entry.name_hash
                ));
            }
            next_name += name.len() as u64 + 1;
        }

        if next_name != self.header.header_size {
            return fail(format!(
                "name table ends at {}, header size is {}",
                next_name, self.header.header_size
            ));
        }
        if next_offset != self.data.len() as u64 {
            return fail(format!(
                "data section ends at {}, file is {} bytes",
                next_offset,
                self.data.len()
            ));
        }

        Ok(())
    }
}
