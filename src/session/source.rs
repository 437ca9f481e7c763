//! Frame suppliers.

use crate::image::OwnedImage;
use crate::util::{RoiTrackError, RoiTrackResult};

/// Ordered, restartable frame supplier.
///
/// Reads block until a frame is available or the end of the stream is
/// reached; exhaustion is `Ok(None)`, never an error.
pub trait FrameSource {
    /// Returns the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> RoiTrackResult<Option<OwnedImage>>;

    /// Repositions the stream so the next read returns frame `index`.
    fn seek(&mut self, index: usize) -> RoiTrackResult<()>;

    /// True while the source can still be read or rewound.
    fn is_open(&self) -> bool;
}

/// In-memory source over a preloaded clip; frames are cloned out on read.
pub struct VecFrameSource {
    frames: Vec<OwnedImage>,
    cursor: usize,
}

impl VecFrameSource {
    /// Wraps a preloaded frame sequence.
    pub fn new(frames: Vec<OwnedImage>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Number of frames in the clip.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the clip holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for VecFrameSource {
    fn next_frame(&mut self) -> RoiTrackResult<Option<OwnedImage>> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Ok(Some(frame.clone()))
            }
            None => Ok(None),
        }
    }

    fn seek(&mut self, index: usize) -> RoiTrackResult<()> {
        if index > self.frames.len() {
            return Err(RoiTrackError::SourceFailure {
                reason: format!(
                    "seek to {index} beyond stream of {} frames",
                    self.frames.len()
                ),
            });
        }
        self.cursor = index;
        Ok(())
    }

    fn is_open(&self) -> bool {
        true
    }
}
