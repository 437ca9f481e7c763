//! Grayscale frame buffers.
//!
//! Frames are contiguous row-major `u8` buffers. `ImageView` borrows a frame
//! for scanning; `OwnedImage` owns one (frame sources hand these out, and the
//! session retains them for reverse playback).

use crate::geometry::Rect;
use crate::util::{RoiTrackError, RoiTrackResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed contiguous grayscale image view.
#[derive(Copy, Clone)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a view over a contiguous `width * height` buffer.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> RoiTrackResult<Self> {
        let needed = checked_area(width, height)?;
        if data.len() < needed {
            return Err(RoiTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a contiguous slice of length `width`.
    #[inline]
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Copies the pixels under `rect` into `dst`, row-major.
    ///
    /// `dst` is cleared and refilled; its capacity is reused across calls.
    /// Fails with `RoiOutOfBounds` when `rect` is not fully inside the view.
    pub fn crop_into(&self, rect: Rect, dst: &mut Vec<u8>) -> RoiTrackResult<()> {
        if !rect.fits_within(self.width, self.height) {
            return Err(RoiTrackError::RoiOutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                img_width: self.width,
                img_height: self.height,
            });
        }
        let (x0, y0) = (rect.x as usize, rect.y as usize);
        dst.clear();
        dst.reserve(rect.area());
        for y in y0..y0 + rect.height {
            let start = y * self.width + x0;
            dst.extend_from_slice(&self.data[start..start + rect.width]);
        }
        Ok(())
    }
}

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> RoiTrackResult<Self> {
        let needed = checked_area(width, height)?;
        if data.len() < needed {
            return Err(RoiTrackError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RoiTrackError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    #[inline]
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }
}

fn checked_area(width: usize, height: usize) -> RoiTrackResult<usize> {
    if width == 0 || height == 0 {
        return Err(RoiTrackError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(RoiTrackError::InvalidDimensions { width, height })
}
