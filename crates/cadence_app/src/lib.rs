//! Cadence headless host
//!
//! Drives a [`cadence_core::ManualClock`] at a fixed cadence so animations can
//! run without a display: in tests, in batch tools, or in the `cadence-demo`
//! binary.
//!
//! ```rust
//! use cadence_animation::{tween, Easing};
//! use cadence_app::{HeadlessRunConfig, HeadlessRuntime};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let runtime = HeadlessRuntime::new(HeadlessRunConfig::default()).unwrap();
//! let value = Rc::new(Cell::new(0.0));
//! let handle = tween(runtime.scheduler(), value.clone(), 10.0, 100.0, Easing::Linear);
//!
//! let summary = runtime.run(|_| {}).unwrap();
//! assert!(summary.idle);
//! assert!(handle.is_finished());
//! assert_eq!(value.get(), 10.0);
//! ```

pub mod config;
pub mod error;
pub mod headless_runtime;
pub mod logging;

pub use config::HeadlessRunConfig;
pub use error::{ConfigError, Result};
pub use headless_runtime::{HeadlessContext, HeadlessRuntime, RunSummary};
