//! Error types for roitrack.

use thiserror::Error;

/// Result alias for roitrack operations.
pub type RoiTrackResult<T> = std::result::Result<T, RoiTrackError>;

/// Errors that can occur when building buffers, searching, or ticking a
/// tracking session.
#[derive(Debug, Error, PartialEq)]
pub enum RoiTrackError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows the addressable range.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is smaller than the dimensions require.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A crop rectangle does not lie fully inside the frame.
    #[error(
        "roi out of bounds: rect ({x},{y}) {width}x{height} in frame {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The seed rectangle is invalid at session start or reset; fatal for
    /// the session.
    #[error("invalid seed: rect ({x},{y}) {width}x{height} in frame {img_width}x{img_height}")]
    InvalidSeed {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// No offset in the search window produced an in-bounds candidate.
    #[error("no valid candidate in search window")]
    NoValidCandidate,
    /// The session already terminated and accepts no further operations.
    #[error("session terminated")]
    SessionTerminated,
    /// The frame source failed while reading; fatal for the session.
    #[error("frame source failure: {reason}")]
    SourceFailure { reason: String },
    /// Image decoding or loading failed.
    #[cfg(feature = "image-io")]
    #[error("image io failure: {reason}")]
    ImageIo { reason: String },
}
