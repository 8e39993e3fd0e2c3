//! Manual frame clock
//!
//! A deterministic, single-threaded host clock. Time only moves when the
//! owner calls [`ManualClock::advance`], which fires every request that was
//! pending when the frame started. Requests made while a frame is being
//! delivered wait for the next frame, the same way a display refresh loop
//! behaves.

use crate::clock::{FrameCallback, FrameClock, FrameRequestId};
use crate::error::{ClockError, Result};
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::cell::RefCell;

struct ManualClockState {
    now: f64,
    frames: u64,
    pending: SlotMap<FrameRequestId, FrameCallback>,
}

/// Deterministic host clock driven by explicit time steps
pub struct ManualClock {
    state: RefCell<ManualClockState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a clock whose first timestamp is offset by `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            state: RefCell::new(ManualClockState {
                now: now_ms,
                frames: 0,
                pending: SlotMap::with_key(),
            }),
        }
    }

    /// Current timestamp in milliseconds
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Number of frames delivered so far
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frames
    }

    /// Number of requests waiting for the next frame
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Move time forward by `dt_ms` and deliver one frame
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, dt_ms: f64) -> Result<usize> {
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            return Err(ClockError::InvalidAdvance(dt_ms));
        }

        let (now, due) = {
            let mut state = self.state.borrow_mut();
            state.now += dt_ms;
            state.frames += 1;
            let due: SmallVec<[FrameRequestId; 4]> = state.pending.keys().collect();
            (state.now, due)
        };

        let mut fired = 0;
        for id in due {
            // A callback earlier in this frame may have cancelled this one
            let callback = self.state.borrow_mut().pending.remove(id);
            if let Some(callback) = callback {
                callback(now);
                fired += 1;
            }
        }

        tracing::trace!(now, fired, "manual clock frame");
        Ok(fired)
    }

    /// Deliver `frames` frames spaced `dt_ms` apart
    ///
    /// Returns the total number of callbacks fired.
    pub fn advance_frames(&self, frames: u32, dt_ms: f64) -> Result<usize> {
        let mut fired = 0;
        for _ in 0..frames {
            fired += self.advance(dt_ms)?;
        }
        Ok(fired)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        self.state.borrow_mut().pending.insert(callback)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.state.borrow_mut().pending.remove(id);
    }
}
