//! Loaded textures.

use std::path::{Path, PathBuf};

use ntsp_common::hash::name_hash;
use ntsp_dds::{DdsImage, Image, TexMetadata};

use crate::{Error, Result};

/// A decoded texture ready to be packed.
///
/// The name is the source file's stem and keys the texture in the package.
#[derive(Debug, Clone)]
pub struct Texture {
    name: String,
    hash: u32,
    width: u16,
    height: u16,
    source_path: PathBuf,
    image: DdsImage,
}

impl Texture {
    /// Wrap a decoded image.
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>, image: DdsImage) -> Result<Self> {
        let name = name.into();
        let metadata = image.metadata();

        let (width, height) = match (u16::try_from(metadata.width), u16::try_from(metadata.height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                return Err(Error::DimensionOverflow {
                    name,
                    width: metadata.width,
                    height: metadata.height,
                })
            }
        };

        Ok(Self {
            hash: name_hash(&name),
            name,
            width,
            height,
            source_path: source_path.into(),
            image,
        })
    }

    /// Load a DDS file, naming the texture after the file stem.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| Error::InvalidName(path.to_path_buf()))?;

        let image = DdsImage::open(path)?;
        Self::new(name, path, image)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 31-bit hash of [`name`](Self::name).
    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The file this texture was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn metadata(&self) -> &TexMetadata {
        self.image.metadata()
    }

    pub fn image(&self) -> &DdsImage {
        &self.image
    }

    /// Number of images in the mip chain (across array items and faces).
    pub fn mip_count(&self) -> usize {
        self.image.image_count()
    }

    /// Images of the mip chain, largest first.
    pub fn mips(&self) -> impl ExactSizeIterator<Item = Image<'_>> + '_ {
        self.image.images()
    }

    /// Total pixel bytes across the chain.
    pub fn data_size(&self) -> u64 {
        self.mips().map(|mip| mip.slice_pitch() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntsp_dds::DxgiFormat;

    #[test]
    fn test_texture_hash_and_size() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::R8_UNorm, 4, 2, 2);
        let image = DdsImage::new(metadata, vec![1; 10]).unwrap();
        let texture = Texture::new("AB", "textures/AB.dds", image).unwrap();

        assert_eq!(texture.hash(), 2081);
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(texture.mip_count(), 2);
        assert_eq!(texture.data_size(), 10);
    }

    #[test]
    fn test_oversized_texture_rejected() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC1_UNorm, 65536, 4, 1);
        let image = DdsImage::new(metadata, vec![0; 16384 * 8]).unwrap();
        assert!(matches!(
            Texture::new("huge", "huge.dds", image),
            Err(Error::DimensionOverflow { width: 65536, .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Texture::load("does/not/exist.dds"),
            Err(Error::Dds(ntsp_dds::Error::Io(_)))
        ));
    }
}
