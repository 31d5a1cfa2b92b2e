//! Radially decaying weight masks for overlap blending
//!
//! Each generated tile is weighted by distance from its own center before
//! accumulation, so overlapping regions fade smoothly between neighbors
//! instead of showing hard seams. The falloff exponent steers how far a
//! tile's edge content reaches into the blend: 1 gives the gentle linear
//! decay used for intermediate tiles, 4 the sharp edge suppression used
//! when compositing final outputs.

use ndarray::Array3;

/// Build a `(resolution, resolution, 1)` weight mask
///
/// The weight at `(i, j)` is `(max_dist - dist)^falloff + 1`, where `dist`
/// is the Euclidean distance from the mask center and `max_dist` the
/// distance from center to a corner. Weights are strictly positive and symmetric
/// under 90-degree rotation, which compositing relies on since tiles are
/// rotated before blending.
pub fn weight_mask(resolution: usize, falloff: f32) -> Array3<f32> {
    let center = (resolution as f32 - 1.0) / 2.0;
    let max_dist = f32::hypot(center, center);

    Array3::from_shape_fn((resolution, resolution, 1), |(i, j, _)| {
        let dist = f32::hypot(i as f32 - center, j as f32 - center);
        (max_dist - dist).powf(falloff) + 1.0
    })
}

#[cfg(test)]
mod tests {
    use super::weight_mask;
    use crate::compositor::rotation::Rotation;

    #[test]
    fn test_masks_are_positive() {
        for falloff in [1.0, 4.0] {
            let mask = weight_mask(16, falloff);
            assert!(mask.iter().all(|&w| w > 0.0));
        }
    }

    #[test]
    fn test_weights_decrease_away_from_center() {
        for falloff in [1.0, 4.0] {
            let mask = weight_mask(9, falloff);
            // Walk one row outward from the center; weights must never rise
            let center_row: Vec<f32> = (4..9)
                .filter_map(|j| mask.get([4, j, 0]).copied())
                .collect();
            for pair in center_row.windows(2) {
                if let &[near, far] = pair {
                    assert!(
                        far <= near,
                        "weight rose moving outward (falloff {falloff})"
                    );
                }
            }
            // And a point off-axis farther from center weighs less
            let on_axis = mask.get([4, 6, 0]).copied().unwrap_or_default();
            let diagonal = mask.get([7, 7, 0]).copied().unwrap_or_default();
            assert!(diagonal < on_axis);
        }
    }

    #[test]
    fn test_mask_is_symmetric_under_quarter_turns() {
        for falloff in [1.0, 4.0] {
            let mask = weight_mask(8, falloff);
            let rotated = Rotation::Quarter.apply(&mask);
            for (a, b) in mask.iter().zip(rotated.iter()) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_linear_falloff_matches_reference_formula() {
        let mask = weight_mask(4, 1.0);
        let center = 1.5_f32;
        let max_dist = f32::hypot(center, center);
        let corner = mask.get([0, 0, 0]).copied().unwrap_or_default();
        // Corner sits exactly at max_dist, leaving only the +1 floor
        assert!((corner - 1.0).abs() < 1e-6);
        let middle = mask.get([1, 1, 0]).copied().unwrap_or_default();
        let expected = max_dist - f32::hypot(0.5, 0.5) + 1.0;
        assert!((middle - expected).abs() < 1e-6);
    }
}
