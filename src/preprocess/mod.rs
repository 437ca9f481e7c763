//! Deterministic patch preprocessing.
//!
//! The pipeline runs median blur, then histogram equalization, then binary
//! threshold, each independently toggleable. It is applied to the reference
//! patch once at seeding and to every candidate crop before scoring, so both
//! sides of a comparison always see the same transform.

use crate::patch::Patch;

mod histeq;
mod median;

pub use histeq::equalize_histogram;
pub use median::{median_blur, normalized_aperture};

/// Binary threshold parameters: `v > level` maps to `max_value`, else 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threshold {
    pub level: u8,
    pub max_value: u8,
}

/// Preprocessing flags, all off by default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Median blur aperture. Even or non-positive values are normalized to
    /// the next valid odd aperture, never rejected.
    pub median_blur: Option<i32>,
    /// Global histogram equalization.
    pub equalize_histogram: bool,
    /// Binary threshold applied last.
    pub threshold: Option<Threshold>,
}

impl PreprocessConfig {
    /// True when every stage is disabled and `apply` is a pure copy.
    pub fn is_identity(&self) -> bool {
        self.median_blur.is_none() && !self.equalize_histogram && self.threshold.is_none()
    }

    /// Applies the pipeline to a patch, returning a new patch at the same
    /// source rectangle. The input is never mutated.
    pub fn apply(&self, patch: &Patch) -> Patch {
        let mut out = Vec::new();
        self.apply_into(patch.data(), patch.width(), patch.height(), &mut out);
        Patch::new(out, patch.rect()).expect("pipeline preserves patch dimensions")
    }

    /// Applies the pipeline into a reusable output buffer.
    ///
    /// `dst` is cleared and refilled; the search loop calls this once per
    /// candidate offset with the same buffer to avoid reallocation.
    pub fn apply_into(&self, src: &[u8], width: usize, height: usize, dst: &mut Vec<u8>) {
        match self.median_blur {
            Some(aperture) => {
                median_blur(src, width, height, normalized_aperture(aperture), dst)
            }
            None => {
                dst.clear();
                dst.extend_from_slice(src);
            }
        }
        if self.equalize_histogram {
            equalize_histogram(dst);
        }
        if let Some(th) = self.threshold {
            threshold_binary(dst, th);
        }
    }
}

/// In-place binary threshold.
fn threshold_binary(pixels: &mut [u8], th: Threshold) {
    for v in pixels.iter_mut() {
        *v = if *v > th.level { th.max_value } else { 0 };
    }
}
