//! Grayscale PNG export for generated tiles and heightmap samples

use crate::io::error::{PipelineError, Result, invalid_parameter};
use image::{ImageBuffer, Luma};
use ndarray::{Array2, Array3};
use std::path::Path;

// Values are expected in [0, 1]; anything outside clamps to the range
fn to_gray(value: f32) -> Luma<u8> {
    let clamped = value.clamp(0.0, 1.0);
    Luma([(clamped * 255.0).round() as u8])
}

fn save_gray<F>(rows: usize, cols: usize, path: &Path, sample: F) -> Result<()>
where
    F: Fn(usize, usize) -> f32,
{
    let mut img = ImageBuffer::new(cols as u32, rows as u32);
    for row in 0..rows {
        for col in 0..cols {
            img.put_pixel(col as u32, row as u32, to_gray(sample(row, col)));
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    img.save(path).map_err(|e| PipelineError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Export one channel of a generated tile as a grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The channel index is out of bounds for the tile
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_tile_channel(tile: &Array3<f32>, channel: usize, path: &Path) -> Result<()> {
    let (rows, cols, channels) = tile.dim();
    if channel >= channels {
        return Err(invalid_parameter(
            "channel",
            &channel,
            &format!("tile only has {channels} channels"),
        ));
    }

    save_gray(rows, cols, path, |row, col| {
        tile.get([row, col, channel]).copied().unwrap_or_default()
    })
}

/// Export a normalized heightmap sample as a grayscale PNG
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be saved
pub fn export_heightmap_sample(sample: &Array2<f32>, path: &Path) -> Result<()> {
    let (rows, cols) = sample.dim();
    save_gray(rows, cols, path, |row, col| {
        sample.get([row, col]).copied().unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::{export_tile_channel, to_gray};
    use ndarray::Array3;

    #[test]
    fn test_gray_conversion_clamps_and_scales() {
        assert_eq!(to_gray(-0.5).0, [0]);
        assert_eq!(to_gray(0.0).0, [0]);
        assert_eq!(to_gray(1.0).0, [255]);
        assert_eq!(to_gray(2.0).0, [255]);
        assert_eq!(to_gray(0.5).0, [128]);
    }

    #[test]
    fn test_out_of_bounds_channel_is_rejected() {
        let tile = Array3::zeros((4, 4, 2));
        let result = export_tile_channel(&tile, 2, std::path::Path::new("unused.png"));
        assert!(result.is_err());
    }
}
