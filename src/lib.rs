//! Motion Probe
//!
//! A small diagnostic library for verifying two detection techniques
//! against a live or recorded grayscale frame feed:
//!
//! - **Interframe differencing**: a three-frame double-difference mask
//!   that highlights sustained motion while suppressing single-frame
//!   sensor noise (see [`motion::interframe_mask`]).
//! - **Template matching**: normalized cross-correlation search for a
//!   fixed reference image inside a captured frame
//!   (see [`template::TemplateDetector`]).
//!
//! Frame acquisition and display are abstracted behind the
//! [`capture::FrameSource`] and [`capture::FrameSink`] traits so the
//! probe loop can run against a capture card, a directory of recorded
//! frames, or an in-memory sequence in tests.
//!
//! # Example
//!
//! ```ignore
//! use motion_probe::{ProbeConfig, ProbeRunner};
//! use motion_probe::capture::{FrameSequenceSource, DirectorySink};
//!
//! let config = ProbeConfig::load("probe.toml")?;
//! let source = FrameSequenceSource::from_directory("frames/", false)?;
//! let mut sink = DirectorySink::new("out/")?;
//! let runner = ProbeRunner::new(config);
//! let report = runner.run(source, &mut sink)?;
//! println!("processed {} frames", report.frames_processed);
//! ```

pub mod capture;
pub mod config;
pub mod motion;
pub mod runner;
pub mod template;

mod error;

// Re-export main types for convenient access
pub use capture::{BufferedSource, FrameSink, FrameSource, NullSink};
pub use config::{MotionConfig, ProbeConfig, TemplateConfig};
pub use error::ProbeError;
pub use motion::interframe_mask;
pub use runner::{ProbeReport, ProbeRunner, StopHandle};
pub use template::{MatchResult, TemplateDetector};
