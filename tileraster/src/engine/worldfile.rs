//! ESRI world files.
//!
//! A world file holds six numbers, one per line: the pixel width, the two
//! rotation terms, the (negative) pixel height and the map coordinates of the
//! *centre* of the upper-left pixel. GDAL-style geotransforms reference the
//! upper-left *corner*, so the origin is shifted by half a pixel.

use std::path::{Path, PathBuf};

use super::{EngineError, GeoTransform};

/// Parse world file text into a corner-based geotransform.
pub fn parse_world_file(text: &str) -> Result<GeoTransform, EngineError> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| EngineError::Georeference(format!("not a number: '{}'", token)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [a, d, b, e, c, f] = values[..] else {
        return Err(EngineError::Georeference(format!(
            "world file needs 6 values, found {}",
            values.len()
        )));
    };

    Ok(GeoTransform([
        c - a / 2.0 - b / 2.0,
        a,
        b,
        f - d / 2.0 - e / 2.0,
        d,
        e,
    ]))
}

/// Candidate world file paths for a raster, most specific first.
///
/// For `scene.png` these are `scene.pgw`, `scene.pngw` and `scene.wld`.
pub fn world_file_candidates(path: &Path) -> Vec<PathBuf> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return vec![path.with_extension("wld")];
    };
    let ext = ext.to_ascii_lowercase();

    let mut candidates = Vec::with_capacity(3);
    let mut chars = ext.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        candidates.push(path.with_extension(format!("{}{}w", first, last)));
    }
    candidates.push(path.with_extension(format!("{}w", ext)));
    candidates.push(path.with_extension("wld"));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_north_up() {
        let gt = parse_world_file("0.5\n0.0\n0.0\n-0.5\n100.25\n49.75\n").unwrap();
        assert_eq!(gt, GeoTransform([100.0, 0.5, 0.0, 50.0, 0.0, -0.5]));
    }

    #[test]
    fn test_parse_rotated() {
        let gt = parse_world_file("2 0.5 0.25 -2 10 20").unwrap();
        let c = gt.coefficients();
        assert_eq!(c[0], 10.0 - 1.0 - 0.125);
        assert_eq!(c[3], 20.0 - 0.25 + 1.0);
        assert_eq!((c[1], c[2], c[4], c[5]), (2.0, 0.25, 0.5, -2.0));
    }

    #[test]
    fn test_parse_wrong_count() {
        let err = parse_world_file("1\n0\n0\n-1\n").unwrap_err();
        assert!(err.to_string().contains("found 4"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_world_file("1 0 0 -1 abc 3").is_err());
    }

    #[test]
    fn test_candidates() {
        let c = world_file_candidates(Path::new("/data/scene.PNG"));
        assert_eq!(
            c,
            vec![
                PathBuf::from("/data/scene.pgw"),
                PathBuf::from("/data/scene.pngw"),
                PathBuf::from("/data/scene.wld"),
            ]
        );
        let c = world_file_candidates(Path::new("ortho.tif"));
        assert_eq!(c[0], PathBuf::from("ortho.tfw"));
    }
}
