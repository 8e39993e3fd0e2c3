//! Tweens
//!
//! A tween drives one numeric slot from its current value to a target value
//! over a fixed duration, on top of the [`FrameScheduler`].
//!
//! ```rust
//! use cadence_animation::{tween, Easing, FrameScheduler};
//! use cadence_core::ManualClock;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = Rc::new(ManualClock::new());
//! let scheduler = FrameScheduler::with_clock(clock.clone());
//! let opacity = Rc::new(Cell::new(0.0));
//!
//! let handle = tween(&scheduler, opacity.clone(), 1.0, 100.0, Easing::Linear);
//! clock.advance_frames(10, 16.0).unwrap();
//!
//! assert!(handle.is_finished());
//! assert_eq!(opacity.get(), 1.0);
//! ```

use crate::completion::Completion;
use crate::easing::Easing;
use crate::scheduler::{FrameScheduler, StopHandle, COMPLETE};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// A single numeric slot a tween can read and write
pub trait TweenTarget {
    fn read(&self) -> f64;
    fn write(&mut self, value: f64);
}

/// Tween target built from a getter and a setter closure
pub struct Property<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> Property<G, S>
where
    G: Fn() -> f64,
    S: FnMut(f64),
{
    pub fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<G, S> TweenTarget for Property<G, S>
where
    G: Fn() -> f64,
    S: FnMut(f64),
{
    fn read(&self) -> f64 {
        (self.getter)()
    }

    fn write(&mut self, value: f64) {
        (self.setter)(value)
    }
}

impl TweenTarget for Rc<Cell<f64>> {
    fn read(&self) -> f64 {
        self.get()
    }

    fn write(&mut self, value: f64) {
        self.set(value)
    }
}

impl TweenTarget for Rc<RefCell<f64>> {
    fn read(&self) -> f64 {
        *self.borrow()
    }

    fn write(&mut self, value: f64) {
        *self.borrow_mut() = value;
    }
}

/// Time-based progress of a single tween
///
/// Accumulates frame deltas and maps elapsed time through the easing.
#[derive(Clone, Debug)]
pub struct Tween {
    elapsed_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl Tween {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Add `delta_ms` and return the eased progress
    ///
    /// Returns exactly `1.0` once the duration has elapsed, however far past
    /// it the accumulated time is. Before that the easing output is returned
    /// unclamped.
    pub fn advance(&mut self, delta_ms: f64) -> f64 {
        self.elapsed_ms += delta_ms;
        if self.is_complete() {
            return COMPLETE;
        }
        self.easing.apply(self.elapsed_ms / self.duration_ms)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn duration(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Handle to a running tween
///
/// Awaiting the handle (or any clone of it) completes when the tween finishes
/// or is stopped, whichever happens first.
#[derive(Clone, Debug)]
pub struct TweenHandle {
    completion: Completion,
    stop: StopHandle,
}

impl TweenHandle {
    /// A handle whose tween never ran
    fn finished() -> Self {
        Self {
            completion: Completion::resolved(),
            stop: StopHandle::noop(),
        }
    }

    /// Stop the tween where it is and resolve the handle
    ///
    /// The target keeps the value written on the last frame. Safe to call
    /// repeatedly or after the tween has finished.
    pub fn stop(&self) {
        self.stop.stop();
        self.completion.resolve();
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_resolved()
    }

    /// Run `callback` once the tween finishes or is stopped
    pub fn on_finish<F: FnOnce() + 'static>(&self, callback: F) {
        self.completion.on_resolve(callback);
    }

    /// The underlying completion signal
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }
}

impl Future for TweenHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.completion).poll(cx)
    }
}

/// Animate `target` from its current value to `to` over `duration_ms`
///
/// The start value is read once, now. Every frame writes
/// `from + (to - from) * progress`; once the duration has elapsed the value
/// is exactly `to`. An easing that reaches 1 early ends the tween on that
/// frame with its own value, not `to`.
/// On a headless scheduler nothing is read or written and the returned handle
/// is already finished.
pub fn tween<T>(
    scheduler: &FrameScheduler,
    mut target: T,
    to: f64,
    duration_ms: f64,
    easing: Easing,
) -> TweenHandle
where
    T: TweenTarget + 'static,
{
    if !scheduler.is_available() {
        tracing::debug!("no frame clock available, tween finished immediately");
        return TweenHandle::finished();
    }

    let from = target.read();
    let mut progress = Tween::new(duration_ms).with_easing(easing);
    let completion = Completion::new();

    let done = completion.clone();
    let stop = scheduler.animate_fn(move |delta_ms| {
        let t = progress.advance(delta_ms);
        if progress.is_complete() {
            target.write(to);
        } else {
            // Easing output is written as-is, even past 1
            target.write(from + (to - from) * t);
        }
        if t >= COMPLETE {
            done.resolve();
        }
        t
    });

    tracing::trace!(from, to, duration_ms, "tween started");

    TweenHandle { completion, stop }
}
