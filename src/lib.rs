//! roitrack is a deterministic block-matching re-localizer for a rectangular
//! region of interest in grayscale frame sequences.
//!
//! Each frame, the current reference patch is searched for in a square
//! offset window around its previous location by exhaustive sum-of-squared-
//! differences, with optional preprocessing (median blur, histogram
//! equalization, binary threshold) applied to both sides of the comparison.
//! `TrackingSession` drives the search frame by frame, forward over a
//! `FrameSource` and then backward over the retained frames, and reports
//! lost targets explicitly instead of guessing.

pub mod geometry;
pub mod image;
pub mod patch;
pub mod preprocess;
pub mod search;
pub mod session;
pub mod util;

mod trace;

pub use geometry::{Point, Rect};
pub use image::{ImageView, OwnedImage};
pub use patch::Patch;
pub use preprocess::{PreprocessConfig, Threshold};
pub use search::{
    BlockMatchConfig, BlockMatchSearch, ReferenceMode, RoiLocator, SearchResult,
};
pub use session::{
    Direction, FrameResult, FrameSource, SessionConfig, Status, Tick, TrackingSession,
    VecFrameSource,
};
pub use util::{RoiTrackError, RoiTrackResult};

#[cfg(feature = "image-io")]
pub use image::io::{load_gray_image, ImageDirSource};
