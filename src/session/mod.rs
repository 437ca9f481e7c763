//! Frame-by-frame tracking session.
//!
//! The session owns the tracking state and drives a `RoiLocator` over a
//! `FrameSource`: forward until the stream runs dry, then backward over the
//! retained frames, then terminated. `advance` is the sole mutating entry
//! point.

mod source;
mod store;

pub use source::{FrameSource, VecFrameSource};

use crate::geometry::Rect;
use crate::search::RoiLocator;
use crate::trace::trace_event;
use crate::util::{RoiTrackError, RoiTrackResult};
use store::FrameStore;

/// Playback direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Whether the target is currently being tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Active,
    Lost,
}

/// Session tuning knobs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    /// Mean-squared-error ceiling; a best match above it counts as lost.
    pub max_mean_error: Option<f64>,
    /// Cap on frames retained for reverse playback. `None` retains the
    /// whole clip; a cap ends reverse playback at the oldest retained
    /// frame.
    pub retain_capacity: Option<usize>,
}

/// One successfully tracked frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameResult {
    pub frame_index: usize,
    pub rect: Rect,
    pub error: u64,
    pub mean_error: f64,
    pub direction: Direction,
}

/// Outcome of one `advance` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// The target was re-localized in this frame.
    Tracked(FrameResult),
    /// The target is lost; reported on every subsequent tick until `reset`.
    Lost { frame_index: usize },
    /// Both playback directions are exhausted and buffers are released.
    Terminated,
}

/// Tracks one seeded region over a finite frame sequence.
pub struct TrackingSession<S: FrameSource> {
    source: Option<S>,
    locator: Box<dyn RoiLocator>,
    store: FrameStore,
    config: SessionConfig,
    current_rect: Rect,
    frame_index: usize,
    direction: Direction,
    status: Status,
    terminated: bool,
}

impl<S: FrameSource> TrackingSession<S> {
    /// Seeds a session from the first frame of `source`.
    ///
    /// The seed rectangle is cropped out of frame 0 and handed to the
    /// locator, then the source is rewound so the first `advance` call
    /// re-localizes frame 0 like every later frame.
    pub fn new(
        mut source: S,
        mut locator: Box<dyn RoiLocator>,
        seed: Rect,
        config: SessionConfig,
    ) -> RoiTrackResult<Self> {
        let first = source
            .next_frame()?
            .ok_or_else(|| RoiTrackError::SourceFailure {
                reason: "stream produced no frames".to_string(),
            })?;
        let view = first.view();
        if !seed.fits_within(view.width(), view.height()) {
            return Err(RoiTrackError::InvalidSeed {
                x: seed.x,
                y: seed.y,
                width: seed.width,
                height: seed.height,
                img_width: view.width(),
                img_height: view.height(),
            });
        }
        locator.init(view, seed)?;
        source.seek(0)?;

        Ok(Self {
            source: Some(source),
            locator,
            store: FrameStore::new(config.retain_capacity),
            config,
            current_rect: seed,
            frame_index: 0,
            direction: Direction::Forward,
            status: Status::Active,
            terminated: false,
        })
    }

    /// Advances the session by one frame.
    ///
    /// Runs one frame pull plus one search to completion. After a loss this
    /// keeps reporting `Tick::Lost` without attempting re-acquisition; after
    /// termination it keeps reporting `Tick::Terminated`.
    pub fn advance(&mut self) -> RoiTrackResult<Tick> {
        if self.terminated {
            return Ok(Tick::Terminated);
        }
        if self.status == Status::Lost {
            return Ok(Tick::Lost {
                frame_index: self.frame_index,
            });
        }

        match self.direction {
            Direction::Forward => {
                let source = self
                    .source
                    .as_mut()
                    .expect("source retained until termination");
                match source.next_frame()? {
                    Some(frame) => {
                        let index = self.store.push(frame);
                        self.frame_index = index;
                        self.track_retained(index)
                    }
                    None => {
                        // Stream exhausted: replay the retained frames
                        // backward, starting by revisiting the newest one.
                        trace_event!("playback_reversed", at = self.frame_index);
                        self.direction = Direction::Reverse;
                        self.track_retained(self.frame_index)
                    }
                }
            }
            Direction::Reverse => {
                if self.frame_index == 0 || self.frame_index - 1 < self.store.first_index() {
                    return Ok(self.terminate());
                }
                self.frame_index -= 1;
                self.track_retained(self.frame_index)
            }
        }
    }

    /// Re-seeds the locator from the retained frame at the current index and
    /// returns the session to `Active`, keeping the playback direction.
    pub fn reset(&mut self, seed: Rect) -> RoiTrackResult<()> {
        if self.terminated {
            return Err(RoiTrackError::SessionTerminated);
        }
        let frame = self
            .store
            .get(self.frame_index)
            .ok_or(RoiTrackError::InvalidInput("no retained frame to reset from"))?;
        let view = frame.view();
        if !seed.fits_within(view.width(), view.height()) {
            return Err(RoiTrackError::InvalidSeed {
                x: seed.x,
                y: seed.y,
                width: seed.width,
                height: seed.height,
                img_width: view.width(),
                img_height: view.height(),
            });
        }
        self.locator.init(view, seed)?;
        self.current_rect = seed;
        self.status = Status::Active;
        Ok(())
    }

    /// Current ROI rectangle.
    pub fn current_rect(&self) -> Rect {
        self.current_rect
    }

    /// Index of the frame most recently processed (or being reported lost).
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Current playback direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current tracking status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// True once both directions are exhausted.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn track_retained(&mut self, index: usize) -> RoiTrackResult<Tick> {
        let Some(frame) = self.store.get(index) else {
            // Degenerate stream (nothing retained): nothing left to track.
            return Ok(self.terminate());
        };
        let view = frame.view();

        match self.locator.locate(view, self.current_rect) {
            Ok(result) => {
                let mean_error = result.mean_error();
                if self
                    .config
                    .max_mean_error
                    .is_some_and(|limit| mean_error > limit)
                {
                    trace_event!("target_lost", frame = index, mean_error = mean_error);
                    self.status = Status::Lost;
                    return Ok(Tick::Lost { frame_index: index });
                }
                self.current_rect = Rect::new(
                    result.x,
                    result.y,
                    self.current_rect.width,
                    self.current_rect.height,
                );
                trace_event!(
                    "frame_tracked",
                    frame = index,
                    x = result.x,
                    y = result.y,
                    error = result.error
                );
                Ok(Tick::Tracked(FrameResult {
                    frame_index: index,
                    rect: self.current_rect,
                    error: result.error,
                    mean_error,
                    direction: self.direction,
                }))
            }
            Err(RoiTrackError::NoValidCandidate) => {
                trace_event!("target_lost", frame = index);
                self.status = Status::Lost;
                Ok(Tick::Lost { frame_index: index })
            }
            Err(err) => Err(err),
        }
    }

    fn terminate(&mut self) -> Tick {
        trace_event!("session_terminated", retained = self.store.len());
        self.terminated = true;
        self.store.clear();
        self.source = None;
        Tick::Terminated
    }
}
