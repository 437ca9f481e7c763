//! Exhaustive block-matching over a square offset window.

use crate::geometry::Rect;
use crate::image::ImageView;
use crate::patch::Patch;
use crate::preprocess::PreprocessConfig;
use crate::search::{ReferenceMode, RoiLocator, SearchResult};
use crate::trace::trace_event;
use crate::util::{RoiTrackError, RoiTrackResult};

/// Configuration for `BlockMatchSearch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockMatchConfig {
    /// Search radius in pixels; every offset in `[-radius, radius]` on both
    /// axes is considered.
    pub radius: usize,
    /// Preprocessing applied to the reference at seeding and to every
    /// candidate crop before scoring.
    pub preprocess: PreprocessConfig,
    /// Reference evolution policy.
    pub reference: ReferenceMode,
}

impl Default for BlockMatchConfig {
    fn default() -> Self {
        Self {
            radius: 10,
            preprocess: PreprocessConfig::default(),
            reference: ReferenceMode::Drifting,
        }
    }
}

/// Exhaustive SSD matcher.
///
/// Owns two scratch buffers so that scoring a candidate never allocates,
/// regardless of how many offsets the window contains.
pub struct BlockMatchSearch {
    config: BlockMatchConfig,
    reference: Option<Patch>,
    crop_buf: Vec<u8>,
    filt_buf: Vec<u8>,
}

impl BlockMatchSearch {
    /// Creates a matcher with the given configuration.
    pub fn new(config: BlockMatchConfig) -> Self {
        Self {
            config,
            reference: None,
            crop_buf: Vec::new(),
            filt_buf: Vec::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BlockMatchConfig {
        &self.config
    }

    /// Returns the current reference patch, if seeded.
    pub fn reference(&self) -> Option<&Patch> {
        self.reference.as_ref()
    }

    /// Finds the offset of `reference` near `prior` in `frame`.
    ///
    /// The reference is compared as given (callers filter it beforehand);
    /// candidate crops are filtered with the configured pipeline. Offsets
    /// whose rectangle leaves the frame are skipped, never clamped; if none
    /// remains the call fails with `NoValidCandidate`.
    pub fn search(
        &mut self,
        reference: &Patch,
        frame: ImageView<'_>,
        prior: Rect,
        radius: usize,
    ) -> RoiTrackResult<SearchResult> {
        scan_window(
            frame,
            prior,
            radius,
            reference.data(),
            reference.width(),
            reference.height(),
            &self.config.preprocess,
            &mut self.crop_buf,
            &mut self.filt_buf,
        )
    }
}

impl RoiLocator for BlockMatchSearch {
    fn init(&mut self, frame: ImageView<'_>, seed: Rect) -> RoiTrackResult<()> {
        let raw = Patch::from_frame(frame, seed)?;
        self.reference = Some(self.config.preprocess.apply(&raw));
        Ok(())
    }

    fn locate(&mut self, frame: ImageView<'_>, prior: Rect) -> RoiTrackResult<SearchResult> {
        let Self {
            config,
            reference,
            crop_buf,
            filt_buf,
        } = self;
        let reference_patch = reference
            .as_ref()
            .ok_or(RoiTrackError::InvalidInput("locator not initialized"))?;
        if prior.width != reference_patch.width() || prior.height != reference_patch.height() {
            return Err(RoiTrackError::InvalidInput(
                "prior rect dimensions do not match the reference patch",
            ));
        }

        let result = scan_window(
            frame,
            prior,
            config.radius,
            reference_patch.data(),
            reference_patch.width(),
            reference_patch.height(),
            &config.preprocess,
            crop_buf,
            filt_buf,
        )?;

        if config.reference == ReferenceMode::Drifting {
            let matched = Rect::new(result.x, result.y, prior.width, prior.height);
            let raw = Patch::from_frame(frame, matched)?;
            *reference = Some(config.preprocess.apply(&raw));
        }

        Ok(result)
    }
}

/// Scans every in-bounds offset and keeps the minimum-error candidate.
///
/// The iteration order is part of the contract: `dx` ascending in the outer
/// loop, `dy` ascending in the inner loop, and a strict `<` comparison, so
/// ties resolve to the first candidate encountered. Reproducibility of the
/// whole session rests on this ordering.
#[allow(clippy::too_many_arguments)]
fn scan_window(
    frame: ImageView<'_>,
    prior: Rect,
    radius: usize,
    ref_data: &[u8],
    ref_width: usize,
    ref_height: usize,
    preprocess: &PreprocessConfig,
    crop_buf: &mut Vec<u8>,
    filt_buf: &mut Vec<u8>,
) -> RoiTrackResult<SearchResult> {
    if ref_width == 0 || ref_height == 0 {
        return Err(RoiTrackError::InvalidDimensions {
            width: ref_width,
            height: ref_height,
        });
    }

    let identity = preprocess.is_identity();
    let radius = radius as i32;
    let frame_width = frame.width() as i32;
    let frame_height = frame.height() as i32;
    let area = ref_width * ref_height;

    let mut best: Option<SearchResult> = None;
    let mut scored = 0usize;

    for dx in -radius..=radius {
        let x0 = prior.x + dx;
        if x0 < 0 || x0 + ref_width as i32 > frame_width {
            continue;
        }
        for dy in -radius..=radius {
            let y0 = prior.y + dy;
            if y0 < 0 || y0 + ref_height as i32 > frame_height {
                continue;
            }

            let error = if identity {
                ssd_at(frame, x0 as usize, y0 as usize, ref_data, ref_width, ref_height)
            } else {
                let rect = Rect::new(x0, y0, ref_width, ref_height);
                frame.crop_into(rect, crop_buf)?;
                preprocess.apply_into(crop_buf.as_slice(), ref_width, ref_height, filt_buf);
                ssd(ref_data, filt_buf.as_slice())
            };
            scored += 1;

            if best.map_or(true, |b| error < b.error) {
                best = Some(SearchResult {
                    x: x0,
                    y: y0,
                    error,
                    area,
                });
            }
        }
    }

    trace_event!("block_match_scan", scored = scored, radius = radius);
    best.ok_or(RoiTrackError::NoValidCandidate)
}

/// SSD between two equal-length buffers, accumulated in `u64`.
fn ssd(a: &[u8], b: &[u8]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| {
            let d = p as i64 - q as i64;
            (d * d) as u64
        })
        .sum()
}

/// SSD of the reference against the frame region at `(x0, y0)`, read row by
/// row without cropping.
fn ssd_at(
    frame: ImageView<'_>,
    x0: usize,
    y0: usize,
    ref_data: &[u8],
    ref_width: usize,
    ref_height: usize,
) -> u64 {
    let mut acc = 0u64;
    for ty in 0..ref_height {
        let row = frame.row(y0 + ty).expect("row within bounds for scan");
        let base = ty * ref_width;
        for tx in 0..ref_width {
            let d = ref_data[base + tx] as i64 - row[x0 + tx] as i64;
            acc += (d * d) as u64;
        }
    }
    acc
}
