//! Matching strategies for re-localizing an ROI.
//!
//! `BlockMatchSearch` is the built-in exhaustive SSD engine. Anything that
//! can seed itself on a frame and answer "where did the region go" fits the
//! `RoiLocator` trait, so a delegate tracker can stand in for the block
//! matcher without the session noticing.

mod block;

pub use block::{BlockMatchConfig, BlockMatchSearch};

use crate::geometry::Rect;
use crate::image::ImageView;
use crate::util::RoiTrackResult;

/// Best match found by a locator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Absolute top-left x of the best candidate in the frame.
    pub x: i32,
    /// Absolute top-left y of the best candidate in the frame.
    pub y: i32,
    /// Raw sum of squared pixel differences at the best candidate.
    pub error: u64,
    /// Patch area the error was accumulated over.
    pub area: usize,
}

impl SearchResult {
    /// Mean squared error per pixel, for reporting and quality thresholds.
    ///
    /// Never part of the minimization: within one search the area is
    /// constant, so minimizing raw error is equivalent.
    #[inline]
    pub fn mean_error(&self) -> f64 {
        self.error as f64 / self.area as f64
    }
}

/// How the reference patch evolves across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceMode {
    /// Each frame's matched crop becomes the next frame's reference. This
    /// follows a slowly deforming target but accumulates drift over long
    /// sequences.
    #[default]
    Drifting,
    /// The reference stays pinned to the seed crop for the whole session.
    Pinned,
}

/// Matching-strategy seam between the session and a concrete locator.
pub trait RoiLocator {
    /// Seeds the locator with the region at `seed` in `frame`.
    fn init(&mut self, frame: ImageView<'_>, seed: Rect) -> RoiTrackResult<()>;

    /// Finds the region near `prior` in `frame`.
    ///
    /// Fails with `NoValidCandidate` when nothing in the neighborhood can be
    /// scored; the session maps that to a lost target.
    fn locate(&mut self, frame: ImageView<'_>, prior: Rect) -> RoiTrackResult<SearchResult>;
}
