//! Cadence Core Runtime
//!
//! This crate provides the host-facing primitives the Cadence animation
//! scheduler is built on:
//!
//! - **Frame Clock**: the host's single-shot "call me on the next frame" capability
//! - **Clock Provider**: explicit availability of that capability (headless hosts have none)
//! - **Manual Clock**: a deterministic host clock for headless runs and tests
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{FrameClock, ManualClock};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = ManualClock::new();
//! let seen = Rc::new(Cell::new(None));
//!
//! let seen_in_frame = seen.clone();
//! clock.request_frame(Box::new(move |now| seen_in_frame.set(Some(now))));
//!
//! clock.advance(16.0).unwrap();
//! assert_eq!(seen.get(), Some(16.0));
//! ```

pub mod clock;
pub mod error;
pub mod manual;

pub use clock::{ClockProvider, FrameCallback, FrameClock, FrameRequestId};
pub use error::{ClockError, Result};
pub use manual::ManualClock;
