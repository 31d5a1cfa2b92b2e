//! Two-stage tile generation with overlap blending and seam-free cropping
//!
//! A tile is generated from its 3x3 neighborhood of latent positions.
//! Stage-A outputs are resolved through the identity cache, rotated into
//! alignment, and blended into an intermediate chunk with the gentle weight
//! mask. Each of the nine sub-regions of that chunk is then refined by
//! Stage B (in the orientation its tile was generated in, hence the inverse
//! rotation), blended again with the sharp mask, and the center is cropped
//! so adjacent generated tiles compose edge to edge without re-blending the
//! same pixels twice.

use crate::compositor::blend::BlendBuffer;
use crate::compositor::cache::{CacheStats, LatentTileCache, TileId};
use crate::compositor::mask::weight_mask;
use crate::compositor::rotation::Rotation;
use crate::inference::latent::LatentSpace;
use crate::inference::provider::InferenceProvider;
use crate::io::configuration::{
    DEFAULT_INTERMEDIATE_FALLOFF, DEFAULT_OUTPUT_FALLOFF, DEFAULT_OVERLAP,
    DEFAULT_RECENTER_DISTANCE, FULLY_GROWN, NEIGHBORHOOD_SIZE,
};
use crate::io::error::{PipelineError, Result, inference_error, invalid_parameter};
use crate::io::image::export_tile_channel;
use ndarray::{Array1, Array3, s};
use std::path::PathBuf;

/// Static shape configuration for a generator session
///
/// All tensor shapes are declared up front and validated once; nothing is
/// inferred from runtime tensors.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Length of Stage-A latent input vectors
    pub latent_size: usize,
    /// Side length of Stage-A intermediate tiles
    pub tile_resolution: usize,
    /// Side length of Stage-B refined tiles (integer multiple of the above)
    pub output_resolution: usize,
    /// Channel count of Stage-A outputs
    pub intermediate_channels: usize,
    /// Channel count of Stage-B outputs
    pub output_channels: usize,
    /// Pixels shared between adjacent tiles (even, smaller than a tile)
    pub overlap: usize,
    /// Falloff exponent of the Stage-A blend mask
    pub intermediate_falloff: f32,
    /// Falloff exponent of the Stage-B blend mask
    pub output_falloff: f32,
    /// Distance moved along the latent reference before Stage A
    pub recenter_distance: f32,
}

impl GeneratorConfig {
    /// Configuration with default overlap, falloffs, and recenter distance
    pub const fn new(
        latent_size: usize,
        tile_resolution: usize,
        output_resolution: usize,
        channels: usize,
    ) -> Self {
        Self {
            latent_size,
            tile_resolution,
            output_resolution,
            intermediate_channels: channels,
            output_channels: channels,
            overlap: DEFAULT_OVERLAP,
            intermediate_falloff: DEFAULT_INTERMEDIATE_FALLOFF,
            output_falloff: DEFAULT_OUTPUT_FALLOFF,
            recenter_distance: DEFAULT_RECENTER_DISTANCE,
        }
    }

    /// Resolution gain of Stage B over Stage A
    pub const fn scale(&self) -> usize {
        self.output_resolution / self.tile_resolution
    }

    /// Stride between adjacent tile placements in the intermediate chunk
    pub const fn placement_stride(&self) -> usize {
        self.tile_resolution - self.overlap
    }

    /// Side length of the intermediate blended chunk
    pub const fn chunk_resolution(&self) -> usize {
        3 * self.tile_resolution - 2 * self.overlap
    }

    /// Side length of the refined blended chunk
    pub const fn refined_chunk_resolution(&self) -> usize {
        self.chunk_resolution() * self.scale()
    }

    /// Side length of the cropped, externally visible tile output
    pub const fn output_size(&self) -> usize {
        self.placement_stride() * self.scale()
    }

    /// Row/column where the output crop starts in the refined chunk
    pub const fn crop_offset(&self) -> usize {
        (self.tile_resolution - self.overlap / 2) * self.scale()
    }

    fn validate(&self) -> Result<()> {
        if self.latent_size == 0 {
            return Err(invalid_parameter(
                "latent_size",
                &self.latent_size,
                &"latent vectors must have positive length",
            ));
        }
        if self.tile_resolution == 0 {
            return Err(invalid_parameter(
                "tile_resolution",
                &self.tile_resolution,
                &"Stage-A resolution must be positive",
            ));
        }
        if self.output_resolution == 0 || self.output_resolution % self.tile_resolution != 0 {
            return Err(invalid_parameter(
                "output_resolution",
                &self.output_resolution,
                &format!(
                    "Stage-B resolution must be a positive multiple of the \
                     Stage-A resolution ({})",
                    self.tile_resolution
                ),
            ));
        }
        if self.intermediate_channels == 0 || self.output_channels == 0 {
            return Err(invalid_parameter(
                "channels",
                &format!(
                    "{}/{}",
                    self.intermediate_channels, self.output_channels
                ),
                &"channel counts must be positive",
            ));
        }
        if self.overlap % 2 != 0 {
            return Err(invalid_parameter(
                "overlap",
                &self.overlap,
                &"overlap must be even so the output crop stays aligned",
            ));
        }
        if self.overlap >= self.tile_resolution {
            return Err(invalid_parameter(
                "overlap",
                &self.overlap,
                &format!(
                    "overlap must be smaller than the tile resolution ({})",
                    self.tile_resolution
                ),
            ));
        }
        for (name, falloff) in [
            ("intermediate_falloff", self.intermediate_falloff),
            ("output_falloff", self.output_falloff),
        ] {
            if !falloff.is_finite() || falloff <= 0.0 {
                return Err(invalid_parameter(
                    "falloff",
                    &falloff,
                    &format!("{name} must be a positive finite exponent"),
                ));
            }
        }
        Ok(())
    }
}

/// One position of a tile neighborhood
#[derive(Debug, Clone)]
pub struct TilePlacement {
    /// Latent vector used if this tile has not been generated yet
    pub latent: Array1<f32>,
    /// Tile identity, or `None` for an absent neighbor
    pub id: Option<TileId>,
    /// Rotation aligning this tile's edges with the neighborhood
    pub rotation: Rotation,
}

impl TilePlacement {
    /// A present tile at the given identity
    pub const fn new(latent: Array1<f32>, id: TileId, rotation: Rotation) -> Self {
        Self {
            latent,
            id: Some(id),
            rotation,
        }
    }

    /// An absent neighbor contributing nothing to the blend
    pub fn absent() -> Self {
        Self {
            latent: Array1::from_vec(Vec::new()),
            id: None,
            rotation: Rotation::None,
        }
    }
}

/// Two-stage tile generator with identity caching and overlap blending
pub struct TileGenerator<A, B> {
    config: GeneratorConfig,
    stage_a: A,
    stage_b: B,
    latent_space: LatentSpace,
    cache: LatentTileCache,
    mask_a: Array3<f32>,
    mask_b: Array3<f32>,
    debug_dir: Option<PathBuf>,
}

impl<A, B> TileGenerator<A, B>
where
    A: InferenceProvider<Input = Array1<f32>>,
    B: InferenceProvider<Input = Array3<f32>>,
{
    /// Create a generator session
    ///
    /// Weight masks for both stages are precomputed here and never mutated
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent or the latent
    /// space operates on a different latent size
    pub fn new(
        config: GeneratorConfig,
        stage_a: A,
        stage_b: B,
        latent_space: LatentSpace,
    ) -> Result<Self> {
        config.validate()?;
        if latent_space.latent_size() != config.latent_size {
            return Err(invalid_parameter(
                "latent_space",
                &latent_space.latent_size(),
                &format!("latent space must match latent_size ({})", config.latent_size),
            ));
        }
        let mask_a = weight_mask(config.tile_resolution, config.intermediate_falloff);
        let mask_b = weight_mask(config.output_resolution, config.output_falloff);
        Ok(Self {
            config,
            stage_a,
            stage_b,
            latent_space,
            cache: LatentTileCache::new(),
            mask_a,
            mask_b,
            debug_dir: None,
        })
    }

    /// Export one channel of every generated tile as a PNG under `dir`
    #[must_use]
    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// The session configuration
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Cache hit/miss counters for this session
    pub const fn cache_stats(&self) -> &CacheStats {
        &self.cache.stats
    }

    /// Generate the composited, cropped output tile for a neighborhood
    ///
    /// `neighborhood` holds nine placements in row-major 3x3 order where
    /// position 0 is the bottom-left tile and row 0 the bottom visual row.
    /// `name` labels the tile in logs and debug exports.
    ///
    /// # Errors
    ///
    /// Returns an error if the neighborhood is malformed, an inference
    /// backend fails or produces unexpected shapes, or a debug export
    /// cannot be written
    pub fn generate_tile(
        &mut self,
        neighborhood: &[TilePlacement],
        name: &str,
    ) -> Result<Array3<f32>> {
        let blended = self.blend_intermediate(neighborhood)?.normalized();
        let refined = self.refine(&blended, neighborhood)?;
        let tile = self.crop(&refined);

        if let Some(dir) = &self.debug_dir {
            let channel = usize::from(self.config.output_channels > 1);
            export_tile_channel(&tile, channel, &dir.join(format!("{name}.png")))?;
        }
        let size = self.config.output_size();
        let CacheStats { hits, misses } = &self.cache.stats;
        log::debug!("generated tile '{name}' ({size}x{size}, cache {hits} hits / {misses} misses)");
        Ok(tile)
    }

    /// Blend the neighborhood's intermediate tiles into a chunk buffer
    ///
    /// Absent positions contribute nothing to either the accumulator or the
    /// weight sums. Exposed separately so callers can inspect the weight
    /// coverage of a neighborhood.
    ///
    /// # Errors
    ///
    /// Returns an error if the neighborhood is malformed or Stage A fails
    pub fn blend_intermediate(&mut self, neighborhood: &[TilePlacement]) -> Result<BlendBuffer> {
        check_arity(neighborhood)?;

        let Self {
            config,
            stage_a,
            latent_space,
            cache,
            mask_a,
            ..
        } = self;

        let stride = config.placement_stride();
        let mut buffer = BlendBuffer::new(config.chunk_resolution(), config.intermediate_channels);

        for (index, placement) in neighborhood.iter().enumerate() {
            let Some(id) = placement.id else {
                continue;
            };
            let tile = cache.get_or_generate(id, || {
                let centered = latent_space.center(&placement.latent)?;
                let moved = latent_space.move_along(&centered, config.recenter_distance)?;
                let outputs = stage_a.infer(&[moved], FULLY_GROWN)?;
                single_output(
                    outputs,
                    "stage a",
                    (
                        config.tile_resolution,
                        config.tile_resolution,
                        config.intermediate_channels,
                    ),
                )
            })?;
            let rotated = placement.rotation.apply(tile);

            let (row, col) = (index / 3, index % 3);
            // Vertical axis flipped: row 0 is placed at the bottom
            let y = stride * (2 - row);
            let x = stride * col;
            buffer.accumulate(y, x, rotated.view(), mask_a)?;
        }
        Ok(buffer)
    }

    /// Refine a blended intermediate chunk through Stage B
    ///
    /// Every one of the nine sub-regions is refined — including those whose
    /// tile is absent, so the blended border around present tiles is still
    /// shaped by its surroundings. Each sub-region is rotated back into its
    /// tile's generation orientation before inference and forward again
    /// after, then rescaled from the network's native `[-1, 1]` range into
    /// `[0, 1]`. Returns the normalized refined chunk before cropping.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk shape disagrees with the configuration,
    /// the neighborhood is malformed, or Stage B fails
    pub fn refine(
        &self,
        blended: &Array3<f32>,
        neighborhood: &[TilePlacement],
    ) -> Result<Array3<f32>> {
        check_arity(neighborhood)?;
        let chunk = self.config.chunk_resolution();
        if blended.dim() != (chunk, chunk, self.config.intermediate_channels) {
            return Err(inference_error(
                "stage b",
                &format!(
                    "blended chunk has shape {:?}, expected ({chunk}, {chunk}, {})",
                    blended.dim(),
                    self.config.intermediate_channels
                ),
            ));
        }

        let stride = self.config.placement_stride();
        let scale = self.config.scale();
        let res_a = self.config.tile_resolution;
        let res_b = self.config.output_resolution;
        let mut buffer = BlendBuffer::new(
            self.config.refined_chunk_resolution(),
            self.config.output_channels,
        );

        for (index, placement) in neighborhood.iter().enumerate() {
            let (row, col) = (index / 3, index % 3);
            let ya = stride * (2 - row);
            let xa = stride * col;

            let sub_chunk = blended
                .slice(s![ya..ya + res_a, xa..xa + res_a, ..])
                .to_owned();
            let aligned = placement.rotation.inverse().apply(&sub_chunk);
            let outputs = self.stage_b.infer(&[aligned], FULLY_GROWN)?;
            let refined = single_output(
                outputs,
                "stage b",
                (res_b, res_b, self.config.output_channels),
            )?;
            let restored = placement.rotation.apply(&refined);
            let rescaled = (&restored + 1.0) / 2.0;

            buffer.accumulate(ya * scale, xa * scale, rescaled.view(), &self.mask_b)?;
        }
        Ok(buffer.normalized())
    }

    // Central crop discarding the redundant blended border shared with
    // neighboring generated tiles
    fn crop(&self, refined: &Array3<f32>) -> Array3<f32> {
        let start = self.config.crop_offset();
        let size = self.config.output_size();
        refined
            .slice(s![start..start + size, start..start + size, ..])
            .to_owned()
    }
}

fn check_arity(neighborhood: &[TilePlacement]) -> Result<()> {
    if neighborhood.len() == NEIGHBORHOOD_SIZE {
        Ok(())
    } else {
        Err(PipelineError::MalformedNeighborhood {
            expected: NEIGHBORHOOD_SIZE,
            actual: neighborhood.len(),
        })
    }
}

// Unwrap a single-input batch result and validate its shape
fn single_output(
    mut outputs: Vec<Array3<f32>>,
    stage: &'static str,
    expected: (usize, usize, usize),
) -> Result<Array3<f32>> {
    if outputs.len() != 1 {
        return Err(inference_error(
            stage,
            &format!("backend returned {} outputs for a single input", outputs.len()),
        ));
    }
    let output = outputs
        .pop()
        .ok_or_else(|| inference_error(stage, &"backend returned an empty batch"))?;
    if output.dim() != expected {
        return Err(inference_error(
            stage,
            &format!(
                "backend produced shape {:?}, expected {expected:?}",
                output.dim()
            ),
        ));
    }
    Ok(output)
}
