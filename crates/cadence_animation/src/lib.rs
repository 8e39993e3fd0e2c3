//! Cadence Animation System
//!
//! Frame multiplexing, tweens, and easing.
//!
//! # Features
//!
//! - **Frame Scheduler**: one host frame request shared by every active animation
//! - **Synchronized Deltas**: all callbacks in a frame see the same elapsed time
//! - **Tweens**: drive a numeric slot to a target value with an awaitable, stoppable handle
//! - **Easing**: polynomial curves, CSS cubic-bezier, or any custom mapping
//! - **Headless-safe**: without a host frame clock everything degrades to a no-op

pub mod completion;
pub mod easing;
pub mod scheduler;
pub mod tween;

pub use completion::Completion;
pub use easing::Easing;
pub use scheduler::{AnimationCallback, AnimationId, FrameScheduler, StopHandle, COMPLETE};
pub use tween::{tween, Property, Tween, TweenHandle, TweenTarget};
