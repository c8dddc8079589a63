//! Decoded DDS images.

use std::fs;
use std::path::Path;

use ddsfile::{Dds, DxgiFormat};

use crate::format::compute_pitch;
use crate::header::{encode_dds_header, metadata_of, FORMAT_BLOCK_SIZE};
use crate::{Error, Result};

/// Description of a texture resource, independent of its pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexMetadata {
    /// Width of the top mip level.
    pub width: u32,
    /// Height of the top mip level.
    pub height: u32,
    /// Number of mip levels per item.
    pub mip_levels: u32,
    /// Number of array items (cubes count as one item of six faces).
    pub array_size: u32,
    /// Whether each item is a cube of six faces.
    pub is_cubemap: bool,
    /// Pixel format.
    pub format: DxgiFormat,
}

impl TexMetadata {
    /// Metadata of a single 2D texture.
    pub fn texture_2d(format: DxgiFormat, width: u32, height: u32, mip_levels: u32) -> Self {
        Self {
            width,
            height,
            mip_levels,
            array_size: 1,
            is_cubemap: false,
            format,
        }
    }

    /// Number of faces per item.
    pub fn faces(&self) -> u32 {
        if self.is_cubemap {
            6
        } else {
            1
        }
    }

    /// Total number of images: items, times faces, times mips.
    pub fn image_count(&self) -> usize {
        self.array_size as usize * self.faces() as usize * self.mip_levels as usize
    }

    /// Length of the longest possible mip chain for these dimensions.
    pub fn full_mip_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }
}

/// Placement of one image inside [`DdsImage::pixels`].
#[derive(Debug, Clone, Copy)]
struct ImageDesc {
    width: u32,
    height: u32,
    offset: usize,
    size: usize,
}

/// One image of a mip chain.
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel bytes.
    pub pixels: &'a [u8],
}

impl Image<'_> {
    /// Size of this image in bytes.
    #[inline]
    pub fn slice_pitch(&self) -> usize {
        self.pixels.len()
    }
}

/// A decoded DDS texture.
#[derive(Debug, Clone)]
pub struct DdsImage {
    metadata: TexMetadata,
    pixels: Vec<u8>,
    images: Vec<ImageDesc>,
}

impl DdsImage {
    /// Build an image from metadata and the concatenated pixel data of every
    /// image, item-major then mip order.
    ///
    /// Bytes past the last image are dropped.
    pub fn new(metadata: TexMetadata, mut pixels: Vec<u8>) -> Result<Self> {
        if metadata.width == 0 || metadata.height == 0 {
            return Err(Error::InvalidHeader(format!(
                "zero dimension {}x{}",
                metadata.width, metadata.height
            )));
        }
        if metadata.mip_levels == 0 || metadata.mip_levels > metadata.full_mip_count() {
            return Err(Error::InvalidHeader(format!(
                "{} mip levels for a {}x{} texture",
                metadata.mip_levels, metadata.width, metadata.height
            )));
        }
        if metadata.array_size == 0 {
            return Err(Error::InvalidHeader("zero array size".into()));
        }

        let mut chain = Vec::with_capacity(metadata.mip_levels as usize);
        let mut chain_size = 0u64;
        for mip in 0..metadata.mip_levels {
            let width = (metadata.width >> mip).max(1);
            let height = (metadata.height >> mip).max(1);
            let size = compute_pitch(metadata.format, width, height)?.slice;
            chain_size = chain_size
                .checked_add(size as u64)
                .ok_or_else(|| too_large(&metadata))?;
            chain.push((width, height, size));
        }

        let items = u64::from(metadata.array_size) * u64::from(metadata.faces());
        let total = chain_size
            .checked_mul(items)
            .and_then(|total| usize::try_from(total).ok())
            .ok_or_else(|| too_large(&metadata))?;
        if pixels.len() < total {
            return Err(Error::Truncated {
                expected: total,
                actual: pixels.len(),
            });
        }
        pixels.truncate(total);

        // Every image holds at least one byte, so the count is bounded by `total`.
        let mut images = Vec::with_capacity(metadata.image_count());
        let mut offset = 0;
        for _ in 0..items {
            for &(width, height, size) in &chain {
                images.push(ImageDesc {
                    width,
                    height,
                    offset,
                    size,
                });
                offset += size;
            }
        }

        Ok(Self {
            metadata,
            pixels,
            images,
        })
    }

    /// Read and decode a DDS file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Decode a DDS file held in memory.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let dds = Dds::read(data)?;
        let metadata = metadata_of(&dds)?;
        Self::new(metadata, dds.data)
    }

    /// Encode this image as a complete DDS file.
    pub fn to_dds_bytes(&self) -> Result<Vec<u8>> {
        let mut block = [0u8; FORMAT_BLOCK_SIZE];
        let header_len = encode_dds_header(&self.metadata, &mut block)?;

        let mut output = Vec::with_capacity(header_len + self.pixels.len());
        output.extend_from_slice(&block[..header_len]);
        output.extend_from_slice(&self.pixels);
        Ok(output)
    }

    /// Resource description.
    pub fn metadata(&self) -> &TexMetadata {
        &self.metadata
    }

    /// Number of images across all items, faces and mips.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Get one image by its position in the chain.
    pub fn image(&self, index: usize) -> Option<Image<'_>> {
        self.images.get(index).map(|desc| self.view(desc))
    }

    /// Iterate over every image in storage order.
    pub fn images(&self) -> impl ExactSizeIterator<Item = Image<'_>> + '_ {
        self.images.iter().map(|desc| self.view(desc))
    }

    /// All pixel bytes, in storage order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn view(&self, desc: &ImageDesc) -> Image<'_> {
        Image {
            width: desc.width,
            height: desc.height,
            pixels: &self.pixels[desc.offset..desc.offset + desc.size],
        }
    }
}

fn too_large(metadata: &TexMetadata) -> Error {
    Error::InvalidHeader(format!(
        "{}x{} texture with {} items of {} faces is too large",
        metadata.width,
        metadata.height,
        metadata.array_size,
        metadata.faces()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc1_chain() -> DdsImage {
        // 16x16 BC1: 128 + 32 + 8 + 8 + 8 bytes
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC1_UNorm, 16, 16, 5);
        let pixels = (0..184u32).map(|i| i as u8).collect();
        DdsImage::new(metadata, pixels).unwrap()
    }

    #[test]
    fn test_mip_chain_layout() {
        let image = bc1_chain();
        let dims: Vec<_> = image.images().map(|i| (i.width, i.height, i.slice_pitch())).collect();
        assert_eq!(
            dims,
            vec![(16, 16, 128), (8, 8, 32), (4, 4, 8), (2, 2, 8), (1, 1, 8)]
        );
        assert_eq!(image.image(1).unwrap().pixels[0], 128);
        assert!(image.image(5).is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        let image = bc1_chain();
        let bytes = image.to_dds_bytes().unwrap();
        assert_eq!(&bytes[..4], crate::DDS_MAGIC);

        let parsed = DdsImage::parse(&bytes).unwrap();
        assert_eq!(parsed.metadata(), image.metadata());
        assert_eq!(parsed.pixels(), image.pixels());
    }

    #[test]
    fn test_dx10_round_trip() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC7_UNorm_sRGB, 8, 4, 2);
        let image = DdsImage::new(metadata, vec![7; 48]).unwrap();
        let bytes = image.to_dds_bytes().unwrap();
        assert_eq!(bytes.len(), FORMAT_BLOCK_SIZE + 48);

        let parsed = DdsImage::parse(&bytes).unwrap();
        assert_eq!(parsed.metadata().format, DxgiFormat::BC7_UNorm_sRGB);
        assert_eq!(parsed.image_count(), 2);
    }

    #[test]
    fn test_cubemap_image_order() {
        let metadata = TexMetadata {
            is_cubemap: true,
            ..TexMetadata::texture_2d(DxgiFormat::R8_UNorm, 2, 2, 2)
        };
        // Six faces of (4 + 1) bytes.
        let image = DdsImage::new(metadata, vec![0; 30]).unwrap();
        assert_eq!(image.image_count(), 12);
        assert_eq!(image.image(1).unwrap().width, 1);
        assert_eq!(image.image(2).unwrap().width, 2);
    }

    #[test]
    fn test_truncated_pixels() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC1_UNorm, 16, 16, 5);
        let err = DdsImage::new(metadata, vec![0; 100]).unwrap_err();
        assert!(matches!(err, Error::Truncated { expected: 184, actual: 100 }));
    }

    #[test]
    fn test_too_many_mips() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC1_UNorm, 4, 4, 4);
        assert!(matches!(
            DdsImage::new(metadata, vec![0; 64]),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_bad_magic() {
        let err = DdsImage::parse(b"PNG\0rest-of-file").unwrap_err();
        assert!(matches!(err, Error::Dds(_)));
    }

    #[test]
    fn test_huge_cube_array_rejected_before_allocation() {
        let metadata = TexMetadata {
            array_size: 0x3000_0000,
            is_cubemap: true,
            ..TexMetadata::texture_2d(DxgiFormat::BC7_UNorm, 8, 4, 2)
        };
        let err = DdsImage::new(metadata, vec![0; 48]).unwrap_err();
        assert!(matches!(err, Error::Truncated { actual: 48, .. }));
    }

    #[test]
    fn test_huge_cube_array_header() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC7_UNorm, 8, 4, 2);
        let mut bytes = DdsImage::new(metadata, vec![0; 48]).unwrap().to_dds_bytes().unwrap();
        assert_eq!(bytes.len(), 164);
        // DX10 misc flag: cube, array size: 0x3000_0000.
        bytes[136..140].copy_from_slice(&4u32.to_le_bytes());
        bytes[140..144].copy_from_slice(&0x3000_0000u32.to_le_bytes());

        assert!(DdsImage::parse(&bytes).is_err());
    }

    #[test]
    fn test_oversized_dimensions_header() {
        let metadata = TexMetadata::texture_2d(DxgiFormat::R32G32B32A32_Float, 1, 1, 1);
        let mut bytes = DdsImage::new(metadata, vec![0; 16]).unwrap().to_dds_bytes().unwrap();
        bytes[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        bytes[16..20].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = DdsImage::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }
}
