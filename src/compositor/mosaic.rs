//! Stitching generated tiles into one large seamless image
//!
//! Tile identities live on a shared grid, so the neighborhoods of adjacent
//! mosaic positions overlap in six identities. The latent tile cache
//! resolves those shared identities to identical intermediate content,
//! which is what makes independently generated outputs meet without seams.

use crate::compositor::cache::TileId;
use crate::compositor::generator::{TileGenerator, TilePlacement};
use crate::compositor::rotation::Rotation;
use crate::inference::latent::random_latents;
use crate::inference::provider::InferenceProvider;
use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array1, Array3, s};

/// Layout and seeding of a stitched mosaic
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Number of generated tiles per row
    pub columns: usize,
    /// Number of generated tile rows
    pub rows: usize,
    /// Seed from which every tile identity derives its latent
    pub seed: u64,
}

impl MosaicConfig {
    fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(invalid_parameter(
                "mosaic",
                &format!("{}x{}", self.columns, self.rows),
                &"mosaic must span at least one tile in each direction",
            ));
        }
        Ok(())
    }

    const fn id_at(&self, column: usize, row: usize) -> TileId {
        TileId((row * self.columns + column) as u64)
    }
}

/// Generate and stitch a full mosaic
///
/// Grid rows count upward from the bottom of the image, matching the
/// neighborhood convention. Positions outside the grid enter neighborhoods
/// as absent tiles, so the mosaic border fades instead of wrapping.
///
/// # Errors
///
/// Returns an error if the layout is degenerate or any tile generation
/// fails
pub fn stitch<A, B>(
    generator: &mut TileGenerator<A, B>,
    config: &MosaicConfig,
) -> Result<Array3<f32>>
where
    A: InferenceProvider<Input = Array1<f32>>,
    B: InferenceProvider<Input = Array3<f32>>,
{
    config.validate()?;

    let tile_size = generator.config().output_size();
    let latent_size = generator.config().latent_size;
    let channels = generator.config().output_channels;
    let mut mosaic = Array3::zeros((
        config.rows * tile_size,
        config.columns * tile_size,
        channels,
    ));

    for grid_row in 0..config.rows {
        for grid_col in 0..config.columns {
            let neighborhood = neighborhood_at(config, grid_col, grid_row, latent_size);
            let name = format!("tile_{grid_col}_{grid_row}");
            let tile = generator.generate_tile(&neighborhood, &name)?;

            // Image rows run top-down while grid rows count bottom-up
            let out_row = (config.rows - 1 - grid_row) * tile_size;
            let out_col = grid_col * tile_size;
            mosaic
                .slice_mut(s![
                    out_row..out_row + tile_size,
                    out_col..out_col + tile_size,
                    ..
                ])
                .assign(&tile);
        }
    }

    let stats = generator.cache_stats();
    log::info!(
        "stitched {}x{} mosaic ({} intermediate tiles generated, {} reused)",
        config.columns,
        config.rows,
        stats.misses,
        stats.hits,
    );
    Ok(mosaic)
}

// Build the 3x3 neighborhood around one grid position, bottom row first
fn neighborhood_at(
    config: &MosaicConfig,
    grid_col: usize,
    grid_row: usize,
    latent_size: usize,
) -> Vec<TilePlacement> {
    let mut neighborhood = Vec::with_capacity(9);
    for row_offset in -1_i64..=1 {
        for col_offset in -1_i64..=1 {
            let col = grid_col as i64 + col_offset;
            let row = grid_row as i64 + row_offset;
            let inside = col >= 0
                && row >= 0
                && (col as usize) < config.columns
                && (row as usize) < config.rows;
            if inside {
                let id = config.id_at(col as usize, row as usize);
                neighborhood.push(TilePlacement::new(
                    latent_for(config.seed, id, latent_size),
                    id,
                    Rotation::None,
                ));
            } else {
                neighborhood.push(TilePlacement::absent());
            }
        }
    }
    neighborhood
}

// Deterministic per-identity latent so shared neighbors agree on content
// even before the cache has seen them
fn latent_for(seed: u64, id: TileId, latent_size: usize) -> Array1<f32> {
    let mixed = seed.wrapping_add(id.0.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    random_latents(latent_size, 1, mixed)
        .pop()
        .unwrap_or_else(|| Array1::zeros(latent_size))
}

#[cfg(test)]
mod tests {
    use super::{MosaicConfig, latent_for, neighborhood_at};
    use crate::compositor::cache::TileId;

    #[test]
    fn test_interior_neighborhood_is_fully_present() {
        let config = MosaicConfig {
            columns: 3,
            rows: 3,
            seed: 1,
        };
        let neighborhood = neighborhood_at(&config, 1, 1, 4);
        assert_eq!(neighborhood.len(), 9);
        assert!(neighborhood.iter().all(|p| p.id.is_some()));
        // Center position carries the center identity
        assert_eq!(neighborhood.get(4).and_then(|p| p.id), Some(TileId(4)));
    }

    #[test]
    fn test_corner_neighborhood_marks_outside_absent() {
        let config = MosaicConfig {
            columns: 2,
            rows: 2,
            seed: 1,
        };
        let neighborhood = neighborhood_at(&config, 0, 0, 4);
        let present = neighborhood.iter().filter(|p| p.id.is_some()).count();
        assert_eq!(present, 4);
        // Bottom row of the neighborhood sits below the grid
        assert!(neighborhood.iter().take(3).all(|p| p.id.is_none()));
    }

    #[test]
    fn test_shared_identities_share_latents() {
        let left = neighborhood_at(
            &MosaicConfig {
                columns: 4,
                rows: 1,
                seed: 9,
            },
            1,
            0,
            8,
        );
        let right = neighborhood_at(
            &MosaicConfig {
                columns: 4,
                rows: 1,
                seed: 9,
            },
            2,
            0,
            8,
        );
        // Position (row 1, col 2) of the left neighborhood is the same grid
        // tile as (row 1, col 1) of the right one
        let from_left = left.get(5);
        let from_right = right.get(4);
        assert!(from_left.is_some() && from_right.is_some());
        if let (Some(a), Some(b)) = (from_left, from_right) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.latent, b.latent);
        }
    }

    #[test]
    fn test_degenerate_layout_is_rejected() {
        let config = MosaicConfig {
            columns: 0,
            rows: 2,
            seed: 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_latents_differ_between_identities() {
        let a = latent_for(3, TileId(0), 16);
        let b = latent_for(3, TileId(1), 16);
        assert_ne!(a, b);
    }
}
