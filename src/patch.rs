//! Owned pixel crops paired with their source coordinates.

use crate::geometry::Rect;
use crate::image::ImageView;
use crate::util::{RoiTrackError, RoiTrackResult};

/// Grayscale crop of a frame plus the rectangle it was taken from.
///
/// Two patches are only comparable when their dimensions match exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    data: Vec<u8>,
    rect: Rect,
}

impl Patch {
    /// Creates a patch from an owned buffer of exactly `rect.area()` bytes.
    pub fn new(data: Vec<u8>, rect: Rect) -> RoiTrackResult<Self> {
        if rect.width == 0 || rect.height == 0 {
            return Err(RoiTrackError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        if data.len() < rect.area() {
            return Err(RoiTrackError::BufferTooSmall {
                needed: rect.area(),
                got: data.len(),
            });
        }
        if data.len() > rect.area() {
            return Err(RoiTrackError::InvalidDimensions {
                width: rect.width,
                height: rect.height,
            });
        }
        Ok(Self { data, rect })
    }

    /// Crops `rect` out of a frame into a new patch.
    pub fn from_frame(frame: ImageView<'_>, rect: Rect) -> RoiTrackResult<Self> {
        let mut data = Vec::new();
        frame.crop_into(rect, &mut data)?;
        Ok(Self { data, rect })
    }

    /// Returns the pixel data, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the source rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height
    }

    /// Area in pixels.
    #[inline]
    pub fn area(&self) -> usize {
        self.rect.area()
    }
}
