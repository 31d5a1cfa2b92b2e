//! Decoding raw HGT elevation files
//!
//! HGT files are headerless grids of big-endian signed 16-bit elevations
//! in meters; standard SRTM tiles are 1201x1201 (3 arc-seconds) or
//! 3601x3601 (1 arc-second). The grid side length is recovered from the
//! file size, so any square grid decodes.

use crate::io::error::{PipelineError, Result};
use ndarray::Array2;
use std::path::Path;

/// A decoded square elevation grid
#[derive(Debug, Clone)]
pub struct HgtTile {
    data: Array2<i16>,
}

impl HgtTile {
    /// Decode a raw elevation byte buffer
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, has an odd length, or does
    /// not contain a square number of samples
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let decode_error = |reason: String| PipelineError::HgtDecode {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.is_empty() {
            return Err(decode_error("file is empty".to_string()));
        }
        if bytes.len() % 2 != 0 {
            return Err(decode_error(format!(
                "odd byte count {} cannot hold 16-bit samples",
                bytes.len()
            )));
        }

        let samples = bytes.len() / 2;
        let resolution = (samples as f64).sqrt() as usize;
        if resolution * resolution != samples {
            return Err(decode_error(format!(
                "{samples} samples do not form a square grid"
            )));
        }

        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| match pair {
                &[high, low] => i16::from_be_bytes([high, low]),
                _ => 0,
            })
            .collect();

        let data = Array2::from_shape_vec((resolution, resolution), values)
            .map_err(|e| decode_error(e.to_string()))?;
        Ok(Self { data })
    }

    /// Side length of the elevation grid
    pub fn resolution(&self) -> usize {
        self.data.dim().0
    }

    /// Elevations in meters, row-major from the tile's northern edge
    pub const fn elevations(&self) -> &Array2<i16> {
        &self.data
    }
}

/// Read and decode an elevation file from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode
pub fn decode_hgt(path: &Path) -> Result<HgtTile> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::FileSystem {
        path: path.to_path_buf(),
        operation: "read elevation file",
        source: e,
    })?;
    HgtTile::from_bytes(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::HgtTile;
    use std::path::Path;

    fn encode(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_square_grid_round_trips() {
        let bytes = encode(&[0, 100, -100, 8000]);
        let tile = HgtTile::from_bytes(&bytes, Path::new("test.hgt"));
        assert!(tile.is_ok());
        if let Ok(tile) = tile {
            assert_eq!(tile.resolution(), 2);
            assert_eq!(tile.elevations().get([0, 1]).copied(), Some(100));
            assert_eq!(tile.elevations().get([1, 0]).copied(), Some(-100));
        }
    }

    #[test]
    fn test_big_endian_byte_order() {
        // 0x0102 = 258 must decode high byte first
        let tile = HgtTile::from_bytes(&[0x01, 0x02, 0, 0, 0, 0, 0, 0], Path::new("t.hgt"));
        assert_eq!(
            tile.ok().and_then(|t| t.elevations().get([0, 0]).copied()),
            Some(258)
        );
    }

    #[test]
    fn test_malformed_buffers_are_rejected() {
        let path = Path::new("broken.hgt");
        assert!(HgtTile::from_bytes(&[], path).is_err());
        assert!(HgtTile::from_bytes(&[1, 2, 3], path).is_err());
        // Six samples are not a square grid
        assert!(HgtTile::from_bytes(&[0; 12], path).is_err());
    }
}
