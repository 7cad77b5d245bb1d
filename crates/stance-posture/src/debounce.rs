//! Temporal confirmation of per-frame predicates
//!
//! A single noisy frame must never move the exercise forward. A predicate
//! is confirmed only once it has held on every observed frame from its
//! anchor until more than `confirm_frames` frames later.

use stance_core::FrameIndex;
use tracing::debug;

/// What a single observation did to the debounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceStep {
    /// Predicate false, nothing armed
    Idle,
    /// Predicate turned true; anchor set on this frame
    Armed,
    /// Predicate still true, waiting for the window to pass
    Holding,
    /// Predicate turned false before confirmation; anchor cleared
    Reset,
    /// Predicate held long enough; anchor cleared
    Confirmed,
}

/// Confirm-after-N-consecutive-frames primitive
#[derive(Debug, Clone)]
pub struct Debounce {
    /// Frames past the anchor before confirmation
    confirm_frames: u64,
    /// Frame on which the current run of true observations began
    anchor: Option<FrameIndex>,
}

impl Debounce {
    pub fn new(confirm_frames: u64) -> Self {
        Debounce {
            confirm_frames,
            anchor: None,
        }
    }

    /// Feed one observation of the watched predicate
    pub fn observe(&mut self, frame: FrameIndex, holds: bool) -> DebounceStep {
        if !holds {
            return match self.anchor.take() {
                Some(anchor) => {
                    debug!(%anchor, %frame, "debounce reset");
                    DebounceStep::Reset
                }
                None => DebounceStep::Idle,
            };
        }

        match self.anchor {
            None => {
                debug!(%frame, "debounce armed");
                self.anchor = Some(frame);
                DebounceStep::Armed
            }
            Some(anchor) if frame > anchor + self.confirm_frames => {
                self.anchor = None;
                DebounceStep::Confirmed
            }
            Some(_) => DebounceStep::Holding,
        }
    }

    /// Frame the current run began on, if armed
    pub fn anchor(&self) -> Option<FrameIndex> {
        self.anchor
    }

    pub fn is_armed(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }
}
