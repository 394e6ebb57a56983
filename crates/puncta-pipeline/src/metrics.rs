//! Metric orchestration: named region means and the partition coefficient.
//!
//! Measures the primary channel over the whole image, the background, and
//! the aggregate region, and the secondary ("red") channel over the
//! aggregate and cytoplasm regions. The cytoplasm mask is derived fresh
//! for each call, never stored.

use crate::intensity::mean_in_region;
use crate::mask::cytoplasm_mask;
use crate::types::{ChannelImage, IntensityMetrics, PipelineError, RegionMasks};

/// Compute the five named region means for a primary/secondary image pair.
///
/// Each call is a pure, independent computation. Degenerate regions (empty
/// masks, all-non-finite samples) yield NaN fields rather than errors.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] when the secondary image
/// or either mask does not share the primary image's dimensions.
pub fn measure_intensity(
    primary: &ChannelImage,
    secondary: &ChannelImage,
    masks: &RegionMasks,
) -> Result<IntensityMetrics, PipelineError> {
    check_dimensions(primary, secondary, masks)?;

    let cytoplasm = cytoplasm_mask(&masks.background, &masks.aggregate);

    Ok(IntensityMetrics {
        unedited: mean_in_region(primary, None),
        background_removed: mean_in_region(primary, Some(&masks.background)),
        aggregates: mean_in_region(primary, Some(&masks.aggregate)),
        red_aggregates: mean_in_region(secondary, Some(&masks.aggregate)),
        red_cytoplasm: mean_in_region(secondary, Some(&cytoplasm)),
    })
}

/// Ratio of the secondary-channel aggregate mean to its cytoplasm mean.
///
/// Returns NaN when the denominator is zero or non-finite; otherwise the
/// exact quotient. Near-zero denominators may produce very large finite
/// values; no clamping is applied.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn partition_coefficient(red_aggregates: f64, red_cytoplasm: f64) -> f64 {
    if !red_cytoplasm.is_finite() || red_cytoplasm == 0.0 {
        return f64::NAN;
    }
    red_aggregates / red_cytoplasm
}

fn check_dimensions(
    primary: &ChannelImage,
    secondary: &ChannelImage,
    masks: &RegionMasks,
) -> Result<(), PipelineError> {
    let expected = primary.dimensions();
    for actual in [
        secondary.dimensions(),
        masks.background.dimensions(),
        masks.aggregate.dimensions(),
    ] {
        if actual != expected {
            return Err(PipelineError::DimensionMismatch { expected, actual });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mask::make_masks;
    use crate::types::{MaskImage, Settings};
    use image::Luma;

    fn two_level_image() -> ChannelImage {
        ChannelImage::from_fn(10, 10, |x, _y| {
            Luma([if x < 5 { 0.0 } else { 10.0 }])
        })
    }

    fn settings(lower_k: f64, upper_k: f64) -> Settings {
        Settings {
            lower_k,
            upper_k,
            blur_sigma: 0.0,
            dilate_size: 0,
        }
    }

    // --- partition_coefficient ---

    #[test]
    fn pc_is_exact_quotient() {
        let pc = partition_coefficient(7.5, 2.5);
        assert!((pc - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pc_zero_denominator_is_nan() {
        assert!(partition_coefficient(1.0, 0.0).is_nan());
        assert!(partition_coefficient(1.0, -0.0).is_nan());
    }

    #[test]
    fn pc_nan_denominator_is_nan() {
        assert!(partition_coefficient(1.0, f64::NAN).is_nan());
    }

    #[test]
    fn pc_infinite_denominator_is_nan() {
        assert!(partition_coefficient(1.0, f64::INFINITY).is_nan());
        assert!(partition_coefficient(1.0, f64::NEG_INFINITY).is_nan());
    }

    #[test]
    fn pc_near_zero_denominator_is_large_but_finite() {
        let pc = partition_coefficient(1.0, 1e-12);
        assert!(pc.is_finite());
        assert!(pc > 1e11, "expected a very large ratio, got {pc}");
    }

    #[test]
    fn pc_nan_numerator_propagates() {
        assert!(partition_coefficient(f64::NAN, 2.0).is_nan());
    }

    // --- measure_intensity ---

    #[test]
    fn brighter_subset_raises_aggregate_mean() {
        let primary = two_level_image();
        let secondary = primary.clone();
        // lower = 5.5, upper = 9.5: both masks select the bright half.
        let masks = make_masks(&primary, &settings(0.1, 0.9));
        let metrics = measure_intensity(&primary, &secondary, &masks).unwrap();

        assert!(
            metrics.aggregates >= metrics.background_removed,
            "aggregate mean {} should not fall below background mean {}",
            metrics.aggregates,
            metrics.background_removed,
        );
        assert!((metrics.unedited - 5.0).abs() < 1e-9);
        assert!((metrics.background_removed - 10.0).abs() < 1e-9);
        assert!((metrics.red_aggregates - 10.0).abs() < 1e-9);
    }

    #[test]
    fn identical_masks_leave_no_cytoplasm() {
        let primary = two_level_image();
        let secondary = primary.clone();
        let masks = make_masks(&primary, &settings(0.1, 0.9));
        let metrics = measure_intensity(&primary, &secondary, &masks).unwrap();

        assert!(metrics.red_cytoplasm.is_nan());
        let pc = partition_coefficient(metrics.red_aggregates, metrics.red_cytoplasm);
        assert!(pc.is_nan());
    }

    #[test]
    fn distinct_thresholds_separate_cytoplasm_from_aggregate() {
        // Three-level image: 0 (outside), 6 (cytoplasm), 10 (aggregate).
        let primary = ChannelImage::from_fn(9, 9, |x, _y| {
            Luma([match x {
                0..=2 => 0.0,
                3..=5 => 6.0,
                _ => 10.0,
            }])
        });
        let secondary = ChannelImage::from_fn(9, 9, |x, _y| {
            Luma([match x {
                0..=2 => 1.0,
                3..=5 => 2.0,
                _ => 8.0,
            }])
        });
        // mean = 16/3 ≈ 5.33, std ≈ 4.11: lower ≈ 5.37 selects the 6s and
        // 10s, upper ≈ 9.45 selects only the 10s.
        let masks = make_masks(&primary, &settings(0.01, 1.0));
        let metrics = measure_intensity(&primary, &secondary, &masks).unwrap();

        assert!((metrics.red_aggregates - 8.0).abs() < 1e-6);
        assert!((metrics.red_cytoplasm - 2.0).abs() < 1e-6);
        let pc = partition_coefficient(metrics.red_aggregates, metrics.red_cytoplasm);
        assert!((pc - 4.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_secondary_dimensions_error() {
        let primary = two_level_image();
        let secondary = ChannelImage::new(10, 8);
        let masks = make_masks(&primary, &settings(0.1, 0.9));
        let result = measure_intensity(&primary, &secondary, &masks);
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch {
                expected: (10, 10),
                actual: (10, 8),
            })
        ));
    }

    #[test]
    fn mismatched_mask_dimensions_error() {
        let primary = two_level_image();
        let secondary = primary.clone();
        let mut masks = make_masks(&primary, &settings(0.1, 0.9));
        masks.aggregate = MaskImage::new(3, 3);
        let result = measure_intensity(&primary, &secondary, &masks);
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch { .. })
        ));
    }
}
