//! Texture name hashing.
//!
//! Package entries are keyed by a 31-bit polynomial hash of the texture name.
//! Readers binary-search the entry table by this value, so it must match the
//! runtime's hash bit for bit.

/// Mask that clears the sign bit of the accumulated hash.
pub const HASH_MASK: u32 = 0x7FFF_FFFF;

/// Compute the 31-bit hash of a texture name.
///
/// `hash = hash * 31 + byte` over the UTF-8 bytes of `name`, wrapping on
/// overflow, then masked to 31 bits. Bytes above 0x7F are sign-extended
/// before being added, which matches the runtime's `char` accumulation.
#[inline]
pub fn name_hash(name: &str) -> u32 {
    hash_bytes(name.as_bytes())
}

/// Compute the 31-bit name hash of raw bytes.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |hash, &b| {
            hash.wrapping_mul(31).wrapping_add(b as i8 as i32 as u32)
        })
        & HASH_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hash() {
        assert_eq!(name_hash(""), 0);
    }

    #[test]
    fn test_known_hashes() {
        assert_eq!(name_hash("A"), 65);
        assert_eq!(name_hash("AB"), 65 * 31 + 66);
        assert_eq!(name_hash("AB"), 2081);
    }

    #[test]
    fn test_long_name_is_masked() {
        let hash = name_hash("environment_rock_cliff_diffuse_01");
        assert_eq!(hash & !HASH_MASK, 0);

        let expected = "environment_rock_cliff_diffuse_01"
            .bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
            & HASH_MASK;
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_non_ascii_bytes_sign_extended() {
        // 0xC3 as a signed char is -61.
        let expected = 0u32.wrapping_add((-61i32) as u32) & HASH_MASK;
        assert_eq!(hash_bytes(&[0xC3]), expected);
    }

    #[test]
    fn test_string_hash_matches_bytes() {
        assert_eq!(name_hash("test"), hash_bytes(b"test"));
    }
}
