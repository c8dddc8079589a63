//! Pixel formats and pitch computation.

use ddsfile::{D3DFormat, DataFormat, DxgiFormat};

use crate::{Error, Result};

/// Byte sizes of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    /// Bytes per row (per row of blocks for compressed formats).
    pub row: usize,
    /// Bytes for the whole image.
    pub slice: usize,
}

/// Compute the row and slice pitch of a `width` x `height` image.
///
/// Sizes that do not fit in memory are rejected instead of wrapping.
pub fn compute_pitch(format: DxgiFormat, width: u32, height: u32) -> Result<Pitch> {
    let (w, h) = (u64::from(width), u64::from(height));

    let (row, rows) = if let Some(block_size) = format.get_block_size() {
        (w.div_ceil(4).max(1) * u64::from(block_size), h.div_ceil(4).max(1))
    } else if let Some(bpp) = format.get_bits_per_pixel() {
        ((w * u64::from(bpp) + 7) / 8, h)
    } else {
        return Err(Error::UnsupportedFormat(format!("{:?}", format)));
    };

    let slice = row.checked_mul(rows).and_then(|slice| usize::try_from(slice).ok());
    match (usize::try_from(row).ok(), slice) {
        (Some(row), Some(slice)) => Ok(Pitch { row, slice }),
        _ => Err(Error::InvalidHeader(format!(
            "{}x{} {:?} image is too large",
            width, height, format
        ))),
    }
}

/// Pre-DX10 formats written without the DX10 extension, and their DXGI twins.
const LEGACY_FORMATS: &[(D3DFormat, DxgiFormat)] = &[
    (D3DFormat::DXT1, DxgiFormat::BC1_UNorm),
    (D3DFormat::DXT3, DxgiFormat::BC2_UNorm),
    (D3DFormat::DXT5, DxgiFormat::BC3_UNorm),
    (D3DFormat::A8R8G8B8, DxgiFormat::B8G8R8A8_UNorm),
    (D3DFormat::A8B8G8R8, DxgiFormat::R8G8B8A8_UNorm),
    (D3DFormat::X8R8G8B8, DxgiFormat::B8G8R8X8_UNorm),
    (D3DFormat::R5G6B5, DxgiFormat::B5G6R5_UNorm),
    (D3DFormat::A1R5G5B5, DxgiFormat::B5G5R5A1_UNorm),
    (D3DFormat::A16B16G16R16F, DxgiFormat::R16G16B16A16_Float),
];

/// DXGI format of a pre-DX10 file.
pub(crate) fn dxgi_from_d3d(format: D3DFormat) -> Result<DxgiFormat> {
    let dxgi = match format {
        D3DFormat::DXT2 => DxgiFormat::BC2_UNorm,
        D3DFormat::DXT4 => DxgiFormat::BC3_UNorm,
        D3DFormat::L8 => DxgiFormat::R8_UNorm,
        D3DFormat::A8 => DxgiFormat::A8_UNorm,
        other => LEGACY_FORMATS
            .iter()
            .find(|(d3d, _)| *d3d == other)
            .map(|&(_, dxgi)| dxgi)
            .ok_or_else(|| Error::UnsupportedFormat(format!("{:?}", other)))?,
    };
    Ok(dxgi)
}

/// Pre-DX10 encoding of `format`, if it has one.
pub(crate) fn d3d_from_dxgi(format: DxgiFormat) -> Option<D3DFormat> {
    LEGACY_FORMATS
        .iter()
        .find(|(_, dxgi)| *dxgi == format)
        .map(|&(d3d, _)| d3d)
}
