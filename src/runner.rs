//! The diagnostic probe loop
//!
//! Pulls frames from a [`FrameSource`], keeps a sliding window of the
//! three most recent frames, computes the interframe motion mask once
//! per new frame, and pushes the middle frame plus the mask to a
//! [`FrameSink`]. Sequential and synchronous; the only control input is
//! a shared stop flag checked between iterations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capture::{FrameSink, FrameSource};
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::motion::{interframe_mask, mask_coverage};
use crate::template::TemplateDetector;

/// Operator-issued quit signal, shared with the running loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop after its current iteration
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary of a completed probe run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    /// Number of motion masks computed
    pub frames_processed: u64,
    /// Changed-pixel fraction of the final mask
    pub last_coverage: f32,
    /// Highest changed-pixel fraction seen during the run
    pub peak_coverage: f32,
    /// Frames on which the configured template was detected
    pub template_matches: u64,
}

/// Runs the motion/template diagnostic loop over a frame feed
pub struct ProbeRunner {
    config: ProbeConfig,
    stop: StopHandle,
}

impl ProbeRunner {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            stop: StopHandle::new(),
        }
    }

    /// Handle for stopping the loop from another thread or a signal
    /// handler
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until the source is exhausted or a stop is requested.
    ///
    /// The feed must supply at least three frames to fill the initial
    /// window. A [`ProbeError::SourceUnavailable`] after that point ends
    /// the run normally (recorded feeds simply end); any other error
    /// propagates.
    pub fn run(
        &self,
        mut source: impl FrameSource,
        sink: &mut impl FrameSink,
    ) -> Result<ProbeReport, ProbeError> {
        let detector = match &self.config.template {
            Some(tc) => Some(TemplateDetector::from_file(&tc.path, tc.threshold)?),
            None => None,
        };

        let mut oldest = source.next_frame()?;
        let mut middle = source.next_frame()?;
        let mut newest = source.next_frame()?;

        log::info!(
            "probe started: {}x{} frames, threshold {}",
            oldest.width(),
            oldest.height(),
            self.config.motion.threshold
        );

        let interval = Duration::from_millis(self.config.motion.frame_interval_ms);
        let mut report = ProbeReport::default();
        let mut last_log = Instant::now();

        loop {
            if self.stop.is_stopped() {
                log::info!("stop requested, ending probe");
                break;
            }

            let mask = interframe_mask(&oldest, &middle, &newest, self.config.motion.threshold)?;
            let coverage = mask_coverage(&mask);

            report.frames_processed += 1;
            report.last_coverage = coverage;
            report.peak_coverage = report.peak_coverage.max(coverage);

            sink.show("frame", &middle);
            sink.show("mask", &mask);

            if let Some(detector) = &detector {
                let result = detector.detect(&newest)?;
                if result.matched {
                    report.template_matches += 1;
                    log::info!(
                        "template detected at {:?} (score {:.3})",
                        result.location,
                        result.score
                    );
                }
            }

            if last_log.elapsed() >= Duration::from_secs(5) {
                log::info!(
                    "probe: {} frames, mask coverage {:.1}% (peak {:.1}%)",
                    report.frames_processed,
                    coverage * 100.0,
                    report.peak_coverage * 100.0
                );
                last_log = Instant::now();
            }

            if !interval.is_zero() {
                std::thread::sleep(interval);
            }

            let next = match source.next_frame() {
                Ok(frame) => frame,
                Err(ProbeError::SourceUnavailable(reason)) => {
                    log::info!("frame source ended: {}", reason);
                    break;
                }
                Err(e) => return Err(e),
            };

            oldest = middle;
            middle = newest;
            newest = next;
        }

        log::info!(
            "probe finished: {} frames processed, {} template matches",
            report.frames_processed,
            report.template_matches
        );
        Ok(report)
    }
}
