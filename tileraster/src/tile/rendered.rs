//! Encoded tiles.

use bytes::Bytes;

use crate::engine::TileFormat;

/// An encoded tile image. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTile {
    data: Bytes,
    format: TileFormat,
}

impl RenderedTile {
    pub fn new(data: impl Into<Bytes>, format: TileFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_buffer() {
        let tile = RenderedTile::new(vec![1u8, 2, 3], TileFormat::Png);
        let copy = tile.clone();
        assert_eq!(tile.data().as_ptr(), copy.data().as_ptr());
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.mime_type(), "image/png");
    }
}
