//! Host frame clock capability
//!
//! The host exposes two primitives: a single-shot frame request that fires
//! once with a monotonic timestamp, and a cancellation for a pending request.
//! Whether the host has a frame clock at all is made explicit through
//! [`ClockProvider`], so headless execution is a branch rather than an
//! ambient environment check.

use slotmap::new_key_type;
use std::fmt;
use std::rc::Rc;

new_key_type! {
    /// Handle for a pending single-shot frame request
    ///
    /// Hosts that do not keep requests in a slot map can mint ids from their
    /// own counters via `slotmap::KeyData::from_ffi`.
    pub struct FrameRequestId;
}

/// Callback fired once by the host with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// A host frame clock
///
/// Timestamps passed to callbacks must be monotonically non-decreasing.
pub trait FrameClock {
    /// Ask the host to invoke `callback` once, on its next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Cancel a pending request
    ///
    /// Must be safe to call with an id that already fired or was already
    /// cancelled.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Availability of the host frame clock
#[derive(Clone, Default)]
pub enum ClockProvider {
    /// The host drives frames through this clock
    Available(Rc<dyn FrameClock>),
    /// No frame clock (headless / non-interactive execution)
    #[default]
    Unavailable,
}

impl ClockProvider {
    /// Wrap a concrete clock
    pub fn available<C: FrameClock + 'static>(clock: Rc<C>) -> Self {
        ClockProvider::Available(clock)
    }

    /// Get the clock, if the host has one
    pub fn clock(&self) -> Option<&Rc<dyn FrameClock>> {
        match self {
            ClockProvider::Available(clock) => Some(clock),
            ClockProvider::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClockProvider::Available(_))
    }
}

impl fmt::Debug for ClockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockProvider::Available(_) => f.write_str("ClockProvider::Available"),
            ClockProvider::Unavailable => f.write_str("ClockProvider::Unavailable"),
        }
    }
}
