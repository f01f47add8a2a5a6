//! Frame acquisition and display boundaries
//!
//! The probe loop only ever talks to a [`FrameSource`] and a
//! [`FrameSink`], so the same loop runs against a capture device, a
//! directory of recorded frames, or an in-memory sequence in tests.
//! Platform capture backends implement `FrameSource`; this crate ships
//! the file-based and in-memory implementations used for diagnostics.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::error::ProbeError;

/// Blocking supplier of grayscale frames
pub trait FrameSource {
    /// Return the next frame from the feed.
    ///
    /// Fails with [`ProbeError::SourceUnavailable`] once the feed is
    /// exhausted or the backing device disconnects.
    fn next_frame(&mut self) -> Result<GrayImage, ProbeError>;
}

/// Fire-and-forget consumer of labeled diagnostic imagery
pub trait FrameSink {
    /// Present an image under a label. Failures are the sink's problem;
    /// display is purely a debugging aid.
    fn show(&mut self, label: &str, image: &GrayImage);
}

/// Plays back image files from a directory in sorted filename order
pub struct FrameSequenceSource {
    files: Vec<PathBuf>,
    position: usize,
    loop_playback: bool,
}

impl FrameSequenceSource {
    /// List the image files in `dir`, sorted by filename.
    ///
    /// Fails with [`ProbeError::SourceUnavailable`] if the directory
    /// contains no image files.
    pub fn from_directory(dir: impl AsRef<Path>, loop_playback: bool) -> Result<Self, ProbeError> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("png" | "jpg" | "jpeg" | "bmp")
                )
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ProbeError::SourceUnavailable(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        log::info!("frame sequence: {} files from {}", files.len(), dir.display());
        Ok(Self {
            files,
            position: 0,
            loop_playback,
        })
    }

    /// Number of frames in the sequence
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the sequence is empty (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for FrameSequenceSource {
    fn next_frame(&mut self) -> Result<GrayImage, ProbeError> {
        if self.position >= self.files.len() {
            if !self.loop_playback {
                return Err(ProbeError::SourceUnavailable(
                    "frame sequence exhausted".to_string(),
                ));
            }
            self.position = 0;
        }

        let path = &self.files[self.position];
        self.position += 1;
        Ok(image::open(path)?.to_luma8())
    }
}

/// Serves a pre-loaded queue of frames
///
/// The in-memory counterpart of [`FrameSequenceSource`], used to drive
/// the probe loop from synthetic frames in tests or from frames produced
/// programmatically.
pub struct BufferedSource {
    frames: VecDeque<GrayImage>,
}

impl BufferedSource {
    pub fn new(frames: impl IntoIterator<Item = GrayImage>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Append a frame to the end of the queue
    pub fn push(&mut self, frame: GrayImage) {
        self.frames.push_back(frame);
    }
}

impl FrameSource for BufferedSource {
    fn next_frame(&mut self) -> Result<GrayImage, ProbeError> {
        self.frames
            .pop_front()
            .ok_or_else(|| ProbeError::SourceUnavailable("frame buffer drained".to_string()))
    }
}

/// Discards everything; for headless runs where only the report matters
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn show(&mut self, _label: &str, _image: &GrayImage) {}
}

/// Writes each shown image as `{label}_{seq:05}.png` into a directory
///
/// The headless stand-in for on-screen display windows: inspect the
/// dumped frames and masks after the run.
pub struct DirectorySink {
    dir: PathBuf,
    sequence: u64,
}

impl DirectorySink {
    /// Create the output directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ProbeError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, sequence: 0 })
    }
}

impl FrameSink for DirectorySink {
    fn show(&mut self, label: &str, image: &GrayImage) {
        let path = self.dir.join(format!("{}_{:05}.png", label, self.sequence));
        self.sequence += 1;
        if let Err(e) = image.save(&path) {
            log::warn!("failed to write {}: {}", path.display(), e);
        }
    }
}
