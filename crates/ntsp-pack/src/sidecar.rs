//! Sidecar (info) files.
//!
//! Layout: InfoHeader | package name | thumbnail | format block
//!
//! The format block is the DDS header of the full texture, padded with zeros
//! to [`FORMAT_BLOCK_SIZE`].

use std::fs;
use std::path::Path;

use ntsp_common::{BinaryReader, ByteWriter};
use ntsp_dds::{encode_dds_header, FORMAT_BLOCK_SIZE};

use crate::error::to_u32;
use crate::format::{InfoHeader, INFO_SIGNATURE, INFO_VERSION};
use crate::{Error, Result, Texture, Thumbnail};

/// Serializes sidecars that point at one package.
#[derive(Debug, Clone)]
pub struct SidecarWriter {
    package_name: String,
}

impl SidecarWriter {
    /// `package_name` is the package file's stem.
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Build the sidecar bytes of `texture`.
    pub fn encode(&self, texture: &Texture, thumbnail: &Thumbnail<'_>) -> Result<Vec<u8>> {
        let name_size = self.package_name.len() + 1;
        let total = InfoHeader::SIZE + name_size + thumbnail.size() + FORMAT_BLOCK_SIZE;

        let header = InfoHeader {
            signature: INFO_SIGNATURE,
            version: INFO_VERSION,
            reserved: 0,
            package_name_size: to_u32("package name size", name_size)?,
            thumbnail_size: to_u32("thumbnail size", thumbnail.size())?,
            thumbnail_index: thumbnail.index,
        };

        let mut block = [0u8; FORMAT_BLOCK_SIZE];
        encode_dds_header(texture.metadata(), &mut block)?;

        let mut writer = ByteWriter::with_bound(total);
        header.write(&mut writer)?;
        writer.write_cstring(&self.package_name)?;
        writer.write_bytes(&thumbnail.data)?;
        writer.write_bytes(&block)?;

        Ok(writer.finish()?)
    }

    /// Encode and write the sidecar of `texture` to `path`.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        path: P,
        texture: &Texture,
        thumbnail: &Thumbnail<'_>,
    ) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.encode(texture, thumbnail)?;
        fs::write(path, &bytes).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(bytes.len())
    }
}

/// A parsed sidecar.
#[derive(Debug, Clone)]
pub struct Sidecar<'a> {
    pub header: InfoHeader,
    pub package_name: &'a str,
    pub thumbnail: &'a [u8],
    pub format_block: &'a [u8],
}

impl<'a> Sidecar<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header = InfoHeader::read(&mut reader)?;

        let name_start = reader.position();
        let package_name = reader.read_cstring()?;
        if reader.position() - name_start != header.package_name_size as usize {
            return Err(Error::InvalidPackage(format!(
                "package name is {} bytes, header says {}",
                reader.position() - name_start,
                header.package_name_size
            )));
        }

        let thumbnail = reader.read_bytes(header.thumbnail_size as usize)?;
        let format_block = reader.read_bytes(FORMAT_BLOCK_SIZE)?;

        Ok(Self {
            header,
            package_name,
            thumbnail,
            format_block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnail::{select_thumbnail, THUMBNAIL_MAX_DIM};
    use ntsp_dds::{decode_dds_header, DdsImage, DxgiFormat, TexMetadata, DDS_MAGIC};

    fn texture(mips: u32) -> Texture {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC3_UNorm, 32, 32, mips);
        let len: usize = [1024, 256, 64, 16, 16, 16][..mips as usize].iter().sum();
        let pixels = (0..len).map(|i: usize| (i % 200) as u8).collect();
        let image = DdsImage::new(metadata, pixels).unwrap();
        Texture::new("wall", "textures/wall.dds", image).unwrap()
    }

    #[test]
    fn test_sidecar_layout() {
        let texture = texture(6);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();
        let writer = SidecarWriter::new("level01");
        let bytes = writer.encode(&texture, &thumbnail).unwrap();

        assert_eq!(bytes.len(), 24 + 8 + 16 + FORMAT_BLOCK_SIZE);
        assert_eq!(&bytes[..4], b"NTSI");

        let sidecar = Sidecar::parse(&bytes).unwrap();
        assert_eq!(sidecar.header.reserved, 0);
        assert_eq!(sidecar.header.package_name_size, 8);
        assert_eq!(sidecar.header.thumbnail_size, 16);
        assert_eq!(sidecar.header.thumbnail_index, 3);
        assert_eq!(sidecar.package_name, "level01");
        assert_eq!(sidecar.thumbnail, texture.image().image(3).unwrap().pixels);

        // Full-resolution description, legacy header plus zero padding.
        assert_eq!(&sidecar.format_block[..4], DDS_MAGIC);
        assert_eq!(&sidecar.format_block[12..16], &32u32.to_le_bytes());
        assert_eq!(&sidecar.format_block[16..20], &32u32.to_le_bytes());
        assert!(sidecar.format_block[128..].iter().all(|&b| b == 0));
        assert_eq!(&decode_dds_header(sidecar.format_block).unwrap(), texture.metadata());
    }

    #[test]
    fn test_synthesized_thumbnail_is_blank() {
        let texture = texture(2);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();
        let bytes = SidecarWriter::new("pkg").encode(&texture, &thumbnail).unwrap();

        let sidecar = Sidecar::parse(&bytes).unwrap();
        assert_eq!(sidecar.header.thumbnail_index, 3);
        assert_eq!(sidecar.thumbnail.len(), 16);
        assert!(sidecar.thumbnail.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_file_failure() {
        let texture = texture(6);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("wall.dds");

        let err = SidecarWriter::new("pkg")
            .write_file(&path, &texture, &thumbnail)
            .unwrap_err();
        assert!(matches!(err, Error::Output { .. }));
    }
}
