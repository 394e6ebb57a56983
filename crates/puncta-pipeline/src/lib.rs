//! puncta-pipeline: Pure aggregation-quantification pipeline (sans-IO).
//!
//! Converts a pair of fluorescence channel images into per-image
//! aggregation metrics through:
//! optional Gaussian smoothing -> intensity thresholds -> region masks
//! (background / aggregate) -> region mean intensities -> partition
//! coefficient.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! channel images and returns structured data. File decoding and channel
//! extraction live in `puncta-io`; tabular serialization in
//! `puncta-export`.

pub mod intensity;
pub mod mask;
pub mod metrics;
pub mod smooth;
pub mod threshold;
pub mod types;

pub use types::{
    ChannelImage, IntensityMetrics, MaskImage, PipelineError, ProcessResult, RegionMasks, Settings,
};

/// Run the full quantification pipeline on one primary/secondary image
/// pair.
///
/// The primary channel drives segmentation; the secondary ("red") channel
/// is measured within the segmented regions. Produces a [`ProcessResult`]
/// containing the region masks (with their thresholds), the five named
/// region means, and the partition coefficient.
///
/// # Pipeline steps
///
/// 1. Optional Gaussian smoothing of the primary channel
/// 2. Threshold computation (`mean + k * std`, population std)
/// 3. Background / aggregate masks (strict `>`), optional square dilation
/// 4. Region mean intensities on both channels
/// 5. Partition coefficient (`red_aggregates / red_cytoplasm`)
///
/// Degenerate inputs (empty regions, constant images, non-finite samples)
/// resolve to NaN metrics rather than errors.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] if `secondary` does not
/// share `primary`'s dimensions.
pub fn process(
    primary: &ChannelImage,
    secondary: &ChannelImage,
    settings: &Settings,
) -> Result<ProcessResult, PipelineError> {
    let masks = mask::make_masks(primary, settings);
    let measured = metrics::measure_intensity(primary, secondary, &masks)?;
    let partition_coefficient =
        metrics::partition_coefficient(measured.red_aggregates, measured.red_cytoplasm);

    Ok(ProcessResult {
        masks,
        metrics: measured,
        partition_coefficient,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Luma;

    /// 10x10 image: left half 0.0, right half 10.0.
    fn two_level_image() -> ChannelImage {
        ChannelImage::from_fn(10, 10, |x, _y| Luma([if x < 5 { 0.0 } else { 10.0 }]))
    }

    #[test]
    fn two_level_image_end_to_end() {
        let primary = two_level_image();
        let secondary = primary.clone();
        let settings = Settings {
            lower_k: 0.1,
            upper_k: 0.9,
            blur_sigma: 0.0,
            dilate_size: 0,
        };

        let result = process(&primary, &secondary, &settings).unwrap();

        // mean = 5, std = 5: lower = 5.5 and upper = 9.5 both sit below
        // the bright level, so the two masks coincide on the bright half.
        assert!((result.masks.lower_threshold - 5.5).abs() < 1e-9);
        assert!((result.masks.upper_threshold - 9.5).abs() < 1e-9);
        for (x, _y, p) in result.masks.background.enumerate_pixels() {
            assert_eq!(p.0[0], u8::from(x >= 5) * 255);
        }
        assert_eq!(result.masks.background, result.masks.aggregate);

        assert!((result.metrics.unedited - 5.0).abs() < 1e-9);
        assert!((result.metrics.background_removed - 10.0).abs() < 1e-9);
        assert!((result.metrics.aggregates - 10.0).abs() < 1e-9);
        assert!((result.metrics.red_aggregates - 10.0).abs() < 1e-9);

        // The coinciding masks leave an empty cytoplasm.
        assert!(result.metrics.red_cytoplasm.is_nan());
        assert!(result.partition_coefficient.is_nan());
    }

    #[test]
    fn constant_image_end_to_end() {
        let primary = ChannelImage::from_fn(10, 10, |_, _| Luma([7.0]));
        let secondary = primary.clone();
        let settings = Settings {
            lower_k: 0.25,
            upper_k: 0.20,
            blur_sigma: 0.0,
            dilate_size: 0,
        };

        let result = process(&primary, &secondary, &settings).unwrap();

        // std = 0: both thresholds equal the constant, strict `>` excludes
        // every pixel, and every region mean except the whole image is NaN.
        assert!((result.masks.lower_threshold - 7.0).abs() < 1e-9);
        assert!((result.masks.upper_threshold - 7.0).abs() < 1e-9);
        assert!((result.metrics.unedited - 7.0).abs() < 1e-9);
        assert!(result.metrics.background_removed.is_nan());
        assert!(result.metrics.aggregates.is_nan());
        assert!(result.metrics.red_aggregates.is_nan());
        assert!(result.metrics.red_cytoplasm.is_nan());
        assert!(result.partition_coefficient.is_nan());
    }

    #[test]
    fn mismatched_channels_error() {
        let primary = two_level_image();
        let secondary = ChannelImage::new(8, 10);
        let result = process(&primary, &secondary, &Settings::default());
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn default_settings_disable_smoothing_and_dilation() {
        // With defaults, the bimodal case reduces to plain thresholding:
        // lower = 5 + 0.25*5 = 6.25, upper = 5 + 0.20*5 = 6.0: note the
        // inverted order, preserved deliberately (caller responsibility).
        let primary = two_level_image();
        let result = process(&primary, &primary.clone(), &Settings::default()).unwrap();
        assert!((result.masks.lower_threshold - 6.25).abs() < 1e-9);
        assert!((result.masks.upper_threshold - 6.0).abs() < 1e-9);
        assert_eq!(result.masks.background, result.masks.aggregate);
    }

    #[test]
    fn enrichment_scenario_produces_finite_pc() {
        // Primary segments three zones; secondary is enriched 5x in the
        // aggregate zone relative to the cytoplasm.
        let primary = ChannelImage::from_fn(12, 12, |x, _y| {
            Luma([match x {
                0..=3 => 0.0,
                4..=7 => 6.0,
                _ => 10.0,
            }])
        });
        let secondary = ChannelImage::from_fn(12, 12, |x, _y| {
            Luma([match x {
                0..=3 => 0.5,
                4..=7 => 1.0,
                _ => 5.0,
            }])
        });
        let settings = Settings {
            lower_k: 0.01,
            upper_k: 1.0,
            blur_sigma: 0.0,
            dilate_size: 0,
        };

        let result = process(&primary, &secondary, &settings).unwrap();
        assert!((result.metrics.red_aggregates - 5.0).abs() < 1e-6);
        assert!((result.metrics.red_cytoplasm - 1.0).abs() < 1e-6);
        assert!((result.partition_coefficient - 5.0).abs() < 1e-6);
    }
}
