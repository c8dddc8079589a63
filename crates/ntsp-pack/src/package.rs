//! Package writing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ntsp_common::ByteWriter;

use crate::{Error, PackageLayout, Result, TextureSet};

/// Writes a [`TextureSet`] as a single package file.
///
/// The header is built in memory; pixel data is streamed straight from each
/// texture's buffers to the output.
#[derive(Debug)]
pub struct PackageWriter<'a> {
    textures: &'a TextureSet,
    layout: PackageLayout,
}

impl<'a> PackageWriter<'a> {
    pub fn new(textures: &'a TextureSet) -> Result<Self> {
        let layout = PackageLayout::compute(textures)?;
        Ok(Self { textures, layout })
    }

    pub fn layout(&self) -> &PackageLayout {
        &self.layout
    }

    /// Materialize header, entry table, blob table and name table.
    pub fn header_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::with_bound(self.layout.header_size() as usize);

        self.layout.header.write(&mut writer)?;
        for entry in &self.layout.entries {
            entry.write(&mut writer)?;
        }
        for blob in &self.layout.blobs {
            blob.write(&mut writer)?;
        }
        for (texture, entry) in self.textures.iter().zip(&self.layout.entries) {
            debug_assert_eq!(writer.position() as u64, entry.name_offset);
            writer.write_cstring(texture.name())?;
        }

        Ok(writer.finish()?)
    }

    /// Write the whole package to `out`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<u64> {
        let header = self.header_bytes()?;
        out.write_all(&header)?;

        let mut written = header.len() as u64;
        for texture in self.textures.iter() {
            for mip in texture.mips() {
                out.write_all(mip.pixels)?;
                written += mip.pixels.len() as u64;
            }
        }

        Ok(written)
    }

    /// Create (or overwrite) `path` and write the package into it.
    ///
    /// A file left incomplete by a failed write is removed.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;

        let mut out = BufWriter::new(file);
        let result = self
            .write_to(&mut out)
            .and_then(|written| out.flush().map(|()| written).map_err(Error::from));

        match result {
            Ok(written) => {
                tracing::info!(
                    "Wrote package {} ({} entries, {} blobs, {} bytes)",
                    path.display(),
                    self.layout.entries.len(),
                    self.layout.blobs.len(),
                    written
                );
                Ok(written)
            }
            Err(e) => {
                drop(out);
                if let Err(remove_err) = fs::remove_file(path) {
                    tracing::warn!("Failed to remove partial package {}: {}", path.display(), remove_err);
                }
                Err(match e {
                    Error::Io(source) => Error::Output {
                        path: path.to_path_buf(),
                        source,
                    },
                    other => other,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Texture;
    use ntsp_dds::{DdsImage, DxgiFormat, TexMetadata};

    fn texture(name: &str, fill: u8) -> Texture {
        // 8x8 RGBA8 with 4 mips: 256 + 64 + 16 + 4 bytes
        let metadata = TexMetadata::texture_2d(DxgiFormat::R8G8B8A8_UNorm, 8, 8, 4);
        let image = DdsImage::new(metadata, vec![fill; 340]).unwrap();
        Texture::new(name, format!("{}.dds", name), image).unwrap()
    }

    #[test]
    fn test_header_bytes_match_layout() {
        let set = TextureSet::new(vec![texture("grass", 1), texture("dirt", 2)]).unwrap();
        let writer = PackageWriter::new(&set).unwrap();
        let header = writer.header_bytes().unwrap();

        assert_eq!(header.len() as u64, writer.layout().header_size());
        assert_eq!(&header[..4], b"PSTN");

        let names_offset = writer.layout().names_offset as usize;
        let expected_names = format!("{}\0{}\0", set[0].name(), set[1].name());
        assert_eq!(&header[names_offset..], expected_names.as_bytes());
    }

    #[test]
    fn test_data_follows_header() {
        let set = TextureSet::new(vec![texture("grass", 1), texture("dirt", 2)]).unwrap();
        let writer = PackageWriter::new(&set).unwrap();

        let mut bytes = Vec::new();
        let written = writer.write_to(&mut bytes).unwrap();
        assert_eq!(written, bytes.len() as u64);
        assert_eq!(written, writer.layout().file_size());

        let header_size = writer.layout().header_size() as usize;
        let first_fill = if set[0].name() == "grass" { 1 } else { 2 };
        assert!(bytes[header_size..header_size + 340].iter().all(|&b| b == first_fill));
        assert!(bytes[header_size + 340..].iter().all(|&b| b == 3 - first_fill));
    }

    #[test]
    fn test_write_file_unwritable_path() {
        let set = TextureSet::new(vec![texture("grass", 1)]).unwrap();
        let writer = PackageWriter::new(&set).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ntsp");
        assert!(matches!(writer.write_file(&path), Err(Error::Output { .. })));
        assert!(!path.exists());
    }
}
