//! Retained-frame ring buffer for reverse playback.

use std::collections::VecDeque;

use crate::image::OwnedImage;

/// Index-addressable frame retention buffer.
///
/// Frames keep their stream index even after older entries are evicted by a
/// capacity cap; reverse playback stops at the oldest retained index.
pub(crate) struct FrameStore {
    frames: VecDeque<OwnedImage>,
    start: usize,
    capacity: Option<usize>,
}

impl FrameStore {
    /// Creates a store. A capacity of 0 is raised to 1 so the frame under
    /// inspection is always retained.
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            frames: VecDeque::new(),
            start: 0,
            capacity: capacity.map(|c| c.max(1)),
        }
    }

    /// Appends a frame, evicting the oldest when over capacity, and returns
    /// the stream index assigned to it.
    pub(crate) fn push(&mut self, frame: OwnedImage) -> usize {
        if let Some(cap) = self.capacity {
            while self.frames.len() >= cap {
                self.frames.pop_front();
                self.start += 1;
            }
        }
        self.frames.push_back(frame);
        self.start + self.frames.len() - 1
    }

    /// Returns the frame at a stream index, if still retained.
    pub(crate) fn get(&self, index: usize) -> Option<&OwnedImage> {
        index
            .checked_sub(self.start)
            .and_then(|offset| self.frames.get(offset))
    }

    /// Stream index of the oldest retained frame.
    pub(crate) fn first_index(&self) -> usize {
        self.start
    }

    /// Drops every retained frame.
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.frames.shrink_to_fit();
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }
}
