//! Template matching against a fixed reference image
//!
//! A thin wrapper over `imageproc`'s normalized cross-correlation search:
//! slide the template over the frame, take the global correlation peak,
//! and compare it against a minimum score.

use std::path::Path;

use image::GrayImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

use crate::error::ProbeError;

/// Customary minimum correlation score; used as the config default.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.7;

/// Result of a template search over one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Whether the peak score cleared the detector's threshold
    pub matched: bool,
    /// Peak normalized cross-correlation score
    pub score: f32,
    /// Top-left corner of the best match
    pub location: (u32, u32),
    /// Template dimensions, so callers can outline the matched region
    pub size: (u32, u32),
}

/// Detects a fixed grayscale template inside captured frames
pub struct TemplateDetector {
    template: GrayImage,
    threshold: f32,
}

impl TemplateDetector {
    /// Create a detector from an in-memory template.
    ///
    /// The threshold is clamped into `[0.0, 1.0]`.
    pub fn new(template: GrayImage, threshold: f32) -> Self {
        Self {
            template,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Load the template from an image file, converted to grayscale.
    pub fn from_file(path: impl AsRef<Path>, threshold: f32) -> Result<Self, ProbeError> {
        let template = image::open(path.as_ref())?.to_luma8();
        log::debug!(
            "loaded template {:?} ({}x{})",
            path.as_ref(),
            template.width(),
            template.height()
        );
        Ok(Self::new(template, threshold))
    }

    /// Template dimensions
    pub fn template_size(&self) -> (u32, u32) {
        self.template.dimensions()
    }

    /// Search for the template in a frame.
    ///
    /// # Errors
    ///
    /// [`ProbeError::TemplateExceedsFrame`] if the template is wider or
    /// taller than the frame.
    pub fn detect(&self, frame: &GrayImage) -> Result<MatchResult, ProbeError> {
        let (fw, fh) = frame.dimensions();
        let (tw, th) = self.template.dimensions();
        if tw > fw || th > fh {
            return Err(ProbeError::TemplateExceedsFrame {
                template: (tw, th),
                frame: (fw, fh),
            });
        }

        let scores = match_template(
            frame,
            &self.template,
            MatchTemplateMethod::CrossCorrelationNormalized,
        );
        let extremes = find_extremes(&scores);

        let matched = extremes.max_value > self.threshold;
        log::debug!(
            "template correlation peak {:.3} at {:?} (matched: {})",
            extremes.max_value,
            extremes.max_value_location,
            matched
        );

        Ok(MatchResult {
            matched,
            score: extremes.max_value,
            location: extremes.max_value_location,
            size: (tw, th),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Gradient pattern distinctive enough for a clean correlation peak
    fn textured(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([((x * 7 + y * 13) % 251) as u8])
        })
    }

    fn embed(frame: &mut GrayImage, patch: &GrayImage, left: u32, top: u32) {
        for (x, y, p) in patch.enumerate_pixels() {
            frame.put_pixel(left + x, top + y, *p);
        }
    }

    #[test]
    fn test_embedded_template_is_found() {
        let template = textured(12, 10);
        let mut frame = GrayImage::from_pixel(64, 48, Luma([30]));
        embed(&mut frame, &template, 20, 15);

        let detector = TemplateDetector::new(template, 0.7);
        let result = detector.detect(&frame).unwrap();

        assert!(result.matched);
        assert!(result.score > 0.99);
        assert_eq!(result.location, (20, 15));
        assert_eq!(result.size, (12, 10));
    }

    #[test]
    fn test_absent_template_is_rejected() {
        // Sparse template: a 4x4 bright block in an 8x8 dark patch. Plain
        // normalized cross-correlation (no mean subtraction) scores a flat
        // frame at sqrt(k/N) = 0.5 for k bright pixels out of N, safely
        // under the 0.7 threshold.
        let mut template = GrayImage::from_pixel(8, 8, Luma([0]));
        for y in 2..6 {
            for x in 2..6 {
                template.put_pixel(x, y, Luma([255]));
            }
        }
        let frame = GrayImage::from_pixel(64, 48, Luma([30]));

        let detector = TemplateDetector::new(template, 0.7);
        let result = detector.detect(&frame).unwrap();

        assert!(!result.matched);
        assert!(result.score < 0.6);
    }

    #[test]
    fn test_oversized_template_errors() {
        let detector = TemplateDetector::new(textured(100, 100), 0.7);
        let frame = textured(50, 50);

        let err = detector.detect(&frame).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::TemplateExceedsFrame {
                template: (100, 100),
                frame: (50, 50),
            }
        ));
    }

    #[test]
    fn test_threshold_is_clamped() {
        let detector = TemplateDetector::new(textured(4, 4), 3.5);
        assert_eq!(detector.threshold, 1.0);
    }
}
