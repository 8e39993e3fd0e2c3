//! Frame scheduler
//!
//! Multiplexes any number of per-frame progress callbacks onto a single host
//! frame request. Every callback registered for a frame sees the same delta,
//! and a callback is dropped as soon as it reports progress `>= 1.0`.
//!
//! The host request is armed while at least one callback is registered and
//! cancelled as soon as the last one goes away. The first frame of each batch
//! reports a delta of zero, so an idle gap never shows up as one huge step.

use cadence_core::{ClockProvider, FrameClock, FrameRequestId};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Unique identifier for a registered animation callback
    pub struct AnimationId;
}

/// Progress at or above this value marks a callback as finished
pub const COMPLETE: f64 = 1.0;

/// A per-frame progress callback
///
/// Called with the frame delta in milliseconds; returns cumulative progress.
/// Clones share identity, so registering a clone of an already registered
/// callback does not tick it twice.
#[derive(Clone)]
pub struct AnimationCallback(Rc<RefCell<dyn FnMut(f64) -> f64>>);

impl AnimationCallback {
    pub fn new<F: FnMut(f64) -> f64 + 'static>(f: F) -> Self {
        Self(Rc::new(RefCell::new(f)))
    }

    /// Whether both handles refer to the same callback
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    fn call(&self, delta_ms: f64) -> f64 {
        let mut f = self.0.borrow_mut();
        (*f)(delta_ms)
    }
}

impl fmt::Debug for AnimationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationCallback({:#x})", self.identity())
    }
}

struct SchedulerState {
    animations: SlotMap<AnimationId, AnimationCallback>,
    by_identity: FxHashMap<usize, AnimationId>,
    /// Pending host request, present iff `animations` is non-empty
    frame_request: Option<FrameRequestId>,
    /// Timestamp of the previous frame in this batch
    last_frame: Option<f64>,
}

struct SchedulerInner {
    provider: ClockProvider,
    state: RefCell<SchedulerState>,
}

impl SchedulerInner {
    fn request_frame(self: &Rc<Self>, clock: &Rc<dyn FrameClock>) {
        let weak = Rc::downgrade(self);
        let request = clock.request_frame(Box::new(move |now| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame(now);
            }
        }));
        self.state.borrow_mut().frame_request = Some(request);
    }

    fn on_frame(self: &Rc<Self>, now: f64) {
        let Some(clock) = self.provider.clock() else {
            return;
        };

        // Keep the loop alive before fan-out so callbacks that schedule more
        // work never race the continuation
        self.state.borrow_mut().frame_request = None;
        self.request_frame(clock);

        let (delta, batch) = {
            let mut state = self.state.borrow_mut();
            let delta = match state.last_frame {
                Some(previous) => now - previous,
                None => 0.0,
            };
            state.last_frame = Some(now);
            let batch: SmallVec<[(AnimationId, AnimationCallback); 8]> = state
                .animations
                .iter()
                .map(|(id, callback)| (id, callback.clone()))
                .collect();
            (delta, batch)
        };

        tracing::trace!(now, delta, active = batch.len(), "frame tick");

        for (id, callback) in batch {
            // Stopped by an earlier callback in this same frame
            if !self.state.borrow().animations.contains_key(id) {
                continue;
            }
            let progress = callback.call(delta);
            if progress >= COMPLETE {
                self.remove(id);
            }
        }

        let idle = self.state.borrow().animations.is_empty();
        if idle {
            self.teardown(clock);
        }
    }

    fn remove(self: &Rc<Self>, id: AnimationId) -> bool {
        let (removed, idle) = {
            let mut state = self.state.borrow_mut();
            let Some(callback) = state.animations.remove(id) else {
                return false;
            };
            state.by_identity.remove(&callback.identity());
            (callback, state.animations.is_empty())
        };
        // Dropped outside the borrow; captured state may call back in
        drop(removed);

        if idle {
            if let Some(clock) = self.provider.clock() {
                self.teardown(clock);
            }
        }
        true
    }

    fn teardown(&self, clock: &Rc<dyn FrameClock>) {
        let request = {
            let mut state = self.state.borrow_mut();
            state.last_frame = None;
            state.frame_request.take()
        };
        if let Some(request) = request {
            clock.cancel_frame(request);
            tracing::debug!("animation batch finished, frame clock released");
        }
    }
}

/// The frame scheduler that fans host frames out to all active animations
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<SchedulerInner>,
}

impl FrameScheduler {
    pub fn new(provider: ClockProvider) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                provider,
                state: RefCell::new(SchedulerState {
                    animations: SlotMap::with_key(),
                    by_identity: FxHashMap::default(),
                    frame_request: None,
                    last_frame: None,
                }),
            }),
        }
    }

    /// Scheduler driven by a concrete host clock
    pub fn with_clock<C: FrameClock + 'static>(clock: Rc<C>) -> Self {
        Self::new(ClockProvider::available(clock))
    }

    /// Scheduler for a host without a frame clock; every registration is a no-op
    pub fn headless() -> Self {
        Self::new(ClockProvider::Unavailable)
    }

    /// Register a progress callback
    ///
    /// Arms the host frame request if this is the first active callback.
    /// Registering a callback that is already active returns a handle to the
    /// existing registration.
    pub fn animate(&self, callback: AnimationCallback) -> StopHandle {
        let Some(clock) = self.inner.provider.clock() else {
            tracing::debug!("no frame clock available, animation ignored");
            return StopHandle::noop();
        };

        let (id, arm) = {
            let mut state = self.inner.state.borrow_mut();
            let key = callback.identity();
            if let Some(&id) = state.by_identity.get(&key) {
                return self.handle(id);
            }
            let id = state.animations.insert(callback);
            state.by_identity.insert(key, id);
            (id, state.frame_request.is_none())
        };

        if arm {
            tracing::debug!("animation batch started, frame clock armed");
            self.inner.request_frame(clock);
        }

        self.handle(id)
    }

    /// Register a closure as a fresh progress callback
    pub fn animate_fn<F: FnMut(f64) -> f64 + 'static>(&self, f: F) -> StopHandle {
        self.animate(AnimationCallback::new(f))
    }

    /// Number of registered callbacks
    pub fn active_count(&self) -> usize {
        self.inner.state.borrow().animations.len()
    }

    /// Whether a host frame request is currently armed
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().frame_request.is_some()
    }

    /// Whether the host provides a frame clock
    pub fn is_available(&self) -> bool {
        self.inner.provider.is_available()
    }

    fn handle(&self, id: AnimationId) -> StopHandle {
        StopHandle {
            scheduler: Rc::downgrade(&self.inner),
            id,
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("provider", &self.inner.provider)
            .field("active", &self.active_count())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Removes one callback from its scheduler
///
/// Stopping is idempotent. Once `stop` returns, the callback receives no
/// further frames, including the remainder of a frame in progress.
#[derive(Clone)]
pub struct StopHandle {
    scheduler: Weak<SchedulerInner>,
    id: AnimationId,
}

impl StopHandle {
    /// A handle that stops nothing
    pub fn noop() -> Self {
        Self {
            scheduler: Weak::new(),
            id: AnimationId::default(),
        }
    }

    pub fn stop(&self) {
        if let Some(inner) = self.scheduler.upgrade() {
            if inner.remove(self.id) {
                tracing::trace!(id = ?self.id, "animation stopped");
            }
        }
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| inner.state.borrow().animations.contains_key(self.id))
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle").field("id", &self.id).finish()
    }
}
