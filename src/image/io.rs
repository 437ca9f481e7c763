//! Frame loading via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use std::fs;
use std::path::{Path, PathBuf};

use crate::image::OwnedImage;
use crate::session::FrameSource;
use crate::util::{RoiTrackError, RoiTrackResult};

/// Creates an owned frame from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> RoiTrackResult<OwnedImage> {
    OwnedImage::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Loads an image from disk and converts it to a grayscale frame.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> RoiTrackResult<OwnedImage> {
    let img = image::open(path).map_err(|err| RoiTrackError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}

/// Frame source over the image files of a directory, ordered by file name.
///
/// Files are listed once at open and decoded lazily, one per `next_frame`
/// call.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    cursor: usize,
}

impl ImageDirSource {
    /// Lists the supported image files (png/jpeg) under `dir` in
    /// lexicographic order.
    pub fn open<P: AsRef<Path>>(dir: P) -> RoiTrackResult<Self> {
        let entries = fs::read_dir(dir.as_ref()).map_err(|err| RoiTrackError::ImageIo {
            reason: err.to_string(),
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| RoiTrackError::ImageIo {
                reason: err.to_string(),
            })?;
            let path = entry.path();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            if matches!(ext.as_deref(), Some("png" | "jpg" | "jpeg")) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self { paths, cursor: 0 })
    }

    /// Number of frames found.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no image files were found.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> RoiTrackResult<Option<OwnedImage>> {
        match self.paths.get(self.cursor) {
            Some(path) => {
                let frame = load_gray_image(path)?;
                self.cursor += 1;
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    fn seek(&mut self, index: usize) -> RoiTrackResult<()> {
        if index > self.paths.len() {
            return Err(RoiTrackError::SourceFailure {
                reason: format!(
                    "seek to {index} beyond stream of {} frames",
                    self.paths.len()
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
