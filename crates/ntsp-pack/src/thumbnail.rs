//! Thumbnail selection.
//!
//! Every sidecar embeds one small mip level of its texture. The first level
//! whose width *or* height is at most the threshold is used as-is. A chain
//! that stops before reaching that size gets a zero-filled placeholder with
//! the size and chain index the level would have had.

use std::borrow::Cow;

use ntsp_dds::compute_pitch;

use crate::{Result, Texture};

/// Default largest thumbnail dimension.
pub const THUMBNAIL_MAX_DIM: u32 = 4;

/// The mip level embedded in a sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail<'a> {
    /// Position in the texture's mip chain.
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub data: Cow<'a, [u8]>,
    /// True when the chain had no small enough level and `data` is blank.
    pub synthesized: bool,
}

impl Thumbnail<'_> {
    /// Size of the thumbnail in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Select the thumbnail of `texture`.
pub fn select_thumbnail(texture: &Texture, max_dim: u32) -> Result<Thumbnail<'_>> {
    for (index, mip) in texture.mips().enumerate() {
        if mip.width <= max_dim || mip.height <= max_dim {
            return Ok(Thumbnail {
                index: index as u32,
                width: mip.width,
                height: mip.height,
                data: Cow::Borrowed(mip.pixels),
                synthesized: false,
            });
        }
    }

    let metadata = texture.metadata();
    let (mut width, mut height) = (metadata.width, metadata.height);
    let mut index = 0;
    while width > max_dim && height > max_dim {
        width >>= 1;
        height >>= 1;
        index += 1;
    }

    let size = compute_pitch(metadata.format, width, height)?.slice;
    tracing::debug!(
        "'{}' has no mip at or below {}, synthesizing {}x{} level {}",
        texture.name(),
        max_dim,
        width,
        height,
        index
    );

    Ok(Thumbnail {
        index,
        width,
        height,
        data: Cow::Owned(vec![0; size]),
        synthesized: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntsp_dds::{DdsImage, DxgiFormat, TexMetadata};

    fn bc1_texture(width: u32, height: u32, mips: u32) -> Texture {
        let metadata = TexMetadata::texture_2d(DxgiFormat::BC1_UNorm, width, height, mips);
        let len: usize = (0..mips)
            .map(|m| compute_pitch(DxgiFormat::BC1_UNorm, (width >> m).max(1), (height >> m).max(1)).unwrap().slice)
            .sum();
        let pixels = (0..len).map(|i| (i % 251) as u8 + 1).collect();
        let image = DdsImage::new(metadata, pixels).unwrap();
        Texture::new("tex", "tex.dds", image).unwrap()
    }

    #[test]
    fn test_full_chain_uses_4x4_level() {
        // 256, 128, 64, 32, 16, 8, 4, 2, 1
        let texture = bc1_texture(256, 256, 9);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();

        assert!(!thumbnail.synthesized);
        assert_eq!(thumbnail.index, 6);
        assert_eq!((thumbnail.width, thumbnail.height), (4, 4));
        assert_eq!(thumbnail.size(), 8);

        let level = texture.image().image(6).unwrap();
        assert_eq!(thumbnail.data.as_ref(), level.pixels);
        assert!(matches!(thumbnail.data, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncated_chain_synthesizes() {
        // 64, 32, 16 and nothing smaller
        let texture = bc1_texture(64, 64, 3);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();

        assert!(thumbnail.synthesized);
        assert_eq!(thumbnail.index, 4);
        assert_eq!((thumbnail.width, thumbnail.height), (4, 4));
        assert_eq!(thumbnail.size(), compute_pitch(DxgiFormat::BC1_UNorm, 4, 4).unwrap().slice);
        assert!(thumbnail.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_either_dimension_qualifies() {
        // 64x4 top level qualifies on height alone.
        let texture = bc1_texture(64, 4, 3);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();

        assert!(!thumbnail.synthesized);
        assert_eq!(thumbnail.index, 0);
        assert_eq!((thumbnail.width, thumbnail.height), (64, 4));
    }

    #[test]
    fn test_wide_truncated_chain() {
        // 256x32 with two levels: 256x32, 128x16. Synthesis stops at 32x4.
        let texture = bc1_texture(256, 32, 2);
        let thumbnail = select_thumbnail(&texture, THUMBNAIL_MAX_DIM).unwrap();

        assert!(thumbnail.synthesized);
        assert_eq!(thumbnail.index, 3);
        assert_eq!((thumbnail.width, thumbnail.height), (32, 4));
        assert_eq!(thumbnail.size(), 8 * 8);
    }

    #[test]
    fn test_custom_threshold() {
        let texture = bc1_texture(256, 256, 9);
        let thumbnail = select_thumbnail(&texture, 16).unwrap();
        assert_eq!(thumbnail.index, 4);
        assert_eq!(thumbnail.width, 16);
    }
}
