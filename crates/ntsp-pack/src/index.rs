//! Hash-ordered texture sets.

use std::ops::Deref;

use crate::{Error, Result, Texture};

/// Textures sorted ascending by name hash, with no two sharing a hash.
///
/// Readers look entries up by binary search on the hash, so every table of
/// the package is laid out in this order.
#[derive(Debug, Clone)]
pub struct TextureSet {
    textures: Vec<Texture>,
}

impl TextureSet {
    /// Sort `textures` by hash and reject empty sets and hash collisions.
    ///
    /// The result does not depend on the order of the input.
    pub fn new(mut textures: Vec<Texture>) -> Result<Self> {
        if textures.is_empty() {
            return Err(Error::NoTextures);
        }

        textures.sort_by(|a, b| a.hash().cmp(&b.hash()).then_with(|| a.name().cmp(b.name())));

        if let Some(pair) = textures.windows(2).find(|pair| pair[0].hash() == pair[1].hash()) {
            return Err(Error::HashCollision {
                hash: pair[0].hash(),
                first: pair[0].name().to_string(),
                second: pair[1].name().to_string(),
            });
        }

        Ok(Self { textures })
    }

    /// Total number of mip images across every texture.
    pub fn blob_count(&self) -> usize {
        self.textures.iter().map(Texture::mip_count).sum()
    }

    pub fn into_inner(self) -> Vec<Texture> {
        self.textures
    }
}

impl Deref for TextureSet {
    type Target = [Texture];

    fn deref(&self) -> &[Texture] {
        &self.textures
    }
}
