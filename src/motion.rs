//! Interframe-difference motion mask
//!
//! Detects motion across three consecutive grayscale frames. A pixel is
//! kept only if it changed in *both* transitions (oldest->middle and
//! middle->newest), which suppresses transient single-frame noise; a 3x3
//! median filter then removes isolated speckle from the binarized mask.

use image::GrayImage;
use imageproc::filter::median_filter;

use crate::error::ProbeError;

/// Customary difference threshold for a typical capture-card feed.
///
/// Not enforced by [`interframe_mask`]; used as the config default.
pub const DEFAULT_THRESHOLD: u32 = 15;

/// Compute a binary motion mask from three temporally ordered frames.
///
/// `frame_a` is the oldest frame, `frame_c` the newest. The returned
/// mask has the same dimensions as the inputs and every sample is
/// exactly 0 (unchanged) or 255 (changed).
///
/// The two absolute-difference images are combined with a per-pixel
/// *bitwise AND of the raw difference values* before thresholding. Any
/// zero bit in either difference zeroes that bit of the result, so the
/// combination is more conservative than a numeric minimum. This
/// ordering (AND first, threshold second) is load-bearing: it is not
/// equivalent to thresholding each difference and AND-ing the booleans.
///
/// # Errors
///
/// - [`ProbeError::DimensionMismatch`] if the frames' dimensions differ.
/// - [`ProbeError::InvalidThreshold`] if `threshold > 255`.
pub fn interframe_mask(
    frame_a: &GrayImage,
    frame_b: &GrayImage,
    frame_c: &GrayImage,
    threshold: u32,
) -> Result<GrayImage, ProbeError> {
    if threshold > 255 {
        return Err(ProbeError::InvalidThreshold(threshold));
    }

    let dims = frame_a.dimensions();
    for other in [frame_b, frame_c] {
        if other.dimensions() != dims {
            return Err(ProbeError::DimensionMismatch {
                expected: dims,
                actual: other.dimensions(),
            });
        }
    }

    let threshold = threshold as u8;
    let (width, height) = dims;
    let mut binarized = GrayImage::new(width, height);

    for (x, y, pixel) in binarized.enumerate_pixels_mut() {
        let a = frame_a.get_pixel(x, y)[0];
        let b = frame_b.get_pixel(x, y)[0];
        let c = frame_c.get_pixel(x, y)[0];

        let diff = a.abs_diff(b) & b.abs_diff(c);
        pixel[0] = if diff > threshold { 255 } else { 0 };
    }

    // 3x3 window (radius 1 in each direction)
    Ok(median_filter(&binarized, 1, 1))
}

/// Fraction of mask pixels marked as changed, in `[0.0, 1.0]`.
pub fn mask_coverage(mask: &GrayImage) -> f32 {
    let total = mask.width() as usize * mask.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let changed = mask.pixels().filter(|p| p[0] == 255).count();
    changed as f32 / total as f32
}
