//! Quadkey encoding and decoding.
//!
//! A quadkey has one base-4 digit per zoom level. Reading right to left, the
//! digit at position `i` contributes bit `i` of the column (value 1) and bit
//! `i` of the row (value 2).

use super::{CoordError, TileKey, MAX_ZOOM};

/// Decode a quadkey into a tile key.
///
/// The empty string is the root tile. Any digit outside `0-3`, or a key longer
/// than [`MAX_ZOOM`], is rejected.
pub fn decode(quad_key: &str) -> Result<TileKey, CoordError> {
    if quad_key.len() > MAX_ZOOM as usize {
        return Err(CoordError::InvalidQuadKey(quad_key.to_string()));
    }

    let mut x = 0u32;
    let mut y = 0u32;
    for (i, digit) in quad_key.bytes().rev().enumerate() {
        let mask = 1u32 << i;
        match digit {
            b'0' => {}
            b'1' => x |= mask,
            b'2' => y |= mask,
            b'3' => {
                x |= mask;
                y |= mask;
            }
            _ => return Err(CoordError::InvalidQuadKey(quad_key.to_string())),
        }
    }

    Ok(TileKey::from_parts_unchecked(quad_key.len() as u8, x, y))
}

/// Encode a tile key as a quadkey of length `zoom`.
pub fn encode(key: &TileKey) -> String {
    (1..=key.zoom())
        .rev()
        .map(|level| {
            let mask = 1u32 << (level - 1);
            let mut digit = b'0';
            if key.x() & mask != 0 {
                digit += 1;
            }
            if key.y() & mask != 0 {
                digit += 2;
            }
            digit as char
        })
        .collect()
}

impl TileKey {
    /// Quadkey for this tile.
    pub fn quadkey(&self) -> String {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(zoom: u8, x: u32, y: u32) -> TileKey {
        TileKey::new(zoom, x, y).unwrap()
    }

    #[test]
    fn test_decode_empty_is_root() {
        assert_eq!(decode("").unwrap(), key(0, 0, 0));
    }

    #[test]
    fn test_decode_single_digits() {
        assert_eq!(decode("0").unwrap(), key(1, 0, 0));
        assert_eq!(decode("1").unwrap(), key(1, 1, 0));
        assert_eq!(decode("2").unwrap(), key(1, 0, 1));
        assert_eq!(decode("3").unwrap(), key(1, 1, 1));
    }

    #[test]
    fn test_decode_two_digits() {
        // '1' at position 1 sets x bit 1; '3' at position 0 sets both bit 0.
        assert_eq!(decode("13").unwrap(), key(2, 3, 1));
        assert_eq!(decode("21").unwrap(), key(2, 1, 2));
    }

    #[test]
    fn test_decode_keeps_leading_zeros_as_zoom() {
        assert_eq!(decode("0001").unwrap(), key(4, 1, 0));
    }

    #[test]
    fn test_decode_rejects_bad_digit() {
        assert_eq!(
            decode("1240"),
            Err(CoordError::InvalidQuadKey("1240".to_string()))
        );
        assert!(decode("a").is_err());
        assert!(decode("-1").is_err());
    }

    #[test]
    fn test_decode_rejects_too_long() {
        let long = "0".repeat(MAX_ZOOM as usize + 1);
        assert!(matches!(decode(&long), Err(CoordError::InvalidQuadKey(_))));
        let max = "3".repeat(MAX_ZOOM as usize);
        assert!(decode(&max).is_ok());
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(&key(0, 0, 0)), "");
        assert_eq!(encode(&key(3, 4, 2)), "120");
        assert_eq!(encode(&key(3, 3, 5)), "213");
    }

    #[test]
    fn test_bing_reference_tile() {
        // Example from the Bing Maps tile system documentation.
        assert_eq!(key(3, 3, 5).quadkey(), "213");
        assert_eq!(decode("213").unwrap(), key(3, 3, 5));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_quadkey_roundtrip(quad_key in "[0-3]{0,31}") {
                let tile = decode(&quad_key)?;
                prop_assert_eq!(tile.zoom() as usize, quad_key.len());
                prop_assert_eq!(encode(&tile), quad_key);
            }

            #[test]
            fn test_tile_roundtrip(
                zoom in 0u8..=MAX_ZOOM,
                x_raw in any::<u32>(),
                y_raw in any::<u32>()
            ) {
                let n = TileKey::tiles_per_axis(zoom);
                let tile = TileKey::new(zoom, (u64::from(x_raw) % n) as u32, (u64::from(y_raw) % n) as u32)?;
                prop_assert_eq!(decode(&tile.quadkey())?, tile);
            }
        }
    }
}
