//! DDS header encoding and decoding.

use ddsfile::{
    AlphaMode, Caps2, D3D10ResourceDimension, Dds, MiscFlag, NewD3dParams, NewDxgiParams,
};

use crate::format::{d3d_from_dxgi, dxgi_from_d3d};
use crate::image::TexMetadata;
use crate::{Error, Result};

/// Size of the largest encoded header: magic, base header and DX10 extension.
pub const FORMAT_BLOCK_SIZE: usize = 4 + 124 + 20;

/// Encode the DDS header describing `metadata` into the start of `out`.
///
/// Single 2D textures in a format with a pre-DX10 encoding are written
/// without the DX10 extension, everything else carries it. Bytes of `out`
/// past the returned length are left untouched.
pub fn encode_dds_header(metadata: &TexMetadata, out: &mut [u8]) -> Result<usize> {
    let legacy = if metadata.array_size > 1 || metadata.is_cubemap {
        None
    } else {
        d3d_from_dxgi(metadata.format)
    };

    let mut dds = match legacy {
        Some(format) => Dds::new_d3d(NewD3dParams {
            height: metadata.height,
            width: metadata.width,
            depth: None,
            format,
            mipmap_levels: Some(metadata.mip_levels),
            caps2: None,
        })?,
        None => Dds::new_dxgi(NewDxgiParams {
            height: metadata.height,
            width: metadata.width,
            depth: None,
            format: metadata.format,
            mipmap_levels: Some(metadata.mip_levels),
            array_layers: Some(metadata.array_size),
            caps2: None,
            is_cubemap: metadata.is_cubemap,
            resource_dimension: D3D10ResourceDimension::Texture2D,
            alpha_mode: AlphaMode::Unknown,
        })?,
    };
    dds.data = Vec::new();

    let mut header = Vec::with_capacity(FORMAT_BLOCK_SIZE);
    dds.write(&mut header)?;

    if out.len() < header.len() {
        return Err(Error::InvalidHeader(format!(
            "header needs {} bytes, buffer holds {}",
            header.len(),
            out.len()
        )));
    }
    out[..header.len()].copy_from_slice(&header);
    Ok(header.len())
}

/// Decode the resource description of a DDS header.
///
/// Trailing pixel data, if any, is ignored.
pub fn decode_dds_header(data: &[u8]) -> Result<TexMetadata> {
    let dds = Dds::read(data)?;
    metadata_of(&dds)
}

pub(crate) fn metadata_of(dds: &Dds) -> Result<TexMetadata> {
    let header = &dds.header;
    if header.caps2.contains(Caps2::VOLUME) || header.depth.unwrap_or(1) > 1 {
        return Err(Error::UnsupportedFormat("volume texture".into()));
    }

    let (format, array_size, is_cubemap) = match &dds.header10 {
        Some(ext) => {
            if !matches!(ext.resource_dimension, D3D10ResourceDimension::Texture2D) {
                return Err(Error::UnsupportedFormat(format!(
                    "resource dimension {:?}",
                    ext.resource_dimension
                )));
            }
            (
                ext.dxgi_format,
                ext.array_size.max(1),
                ext.misc_flag.contains(MiscFlag::TEXTURECUBE),
            )
        }
        None => {
            let d3d = dds.get_d3d_format().ok_or_else(|| {
                Error::UnsupportedFormat(format!(
                    "{}-bit legacy pixel format",
                    header.spf.rgb_bit_count.unwrap_or(0)
                ))
            })?;
            (dxgi_from_d3d(d3d)?, 1, header.caps2.contains(Caps2::CUBEMAP))
        }
    };

    Ok(TexMetadata {
        width: header.width,
        height: header.height,
        mip_levels: header.mip_map_count.unwrap_or(1).max(1),
        array_size,
        is_cubemap,
        format,
    })
}
