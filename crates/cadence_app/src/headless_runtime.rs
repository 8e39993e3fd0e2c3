//! Headless runtime for deterministic frame execution.

use crate::config::HeadlessRunConfig;
use anyhow::{Context, Result};
use cadence_animation::FrameScheduler;
use cadence_core::ManualClock;
use std::rc::Rc;

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    /// Clock timestamp of this frame
    pub now_ms: f64,
    /// Animations still registered after this frame
    pub active_animations: usize,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames actually delivered
    pub frames: u32,
    /// Clock time covered by those frames
    pub elapsed_ms: f64,
    /// Whether every animation had finished when the run ended
    pub idle: bool,
}

/// Deterministic headless runtime loop.
///
/// Owns a manual clock and a scheduler bound to it; anything registered on
/// [`HeadlessRuntime::scheduler`] is driven by [`HeadlessRuntime::run`].
pub struct HeadlessRuntime {
    config: HeadlessRunConfig,
    clock: Rc<ManualClock>,
    scheduler: FrameScheduler,
}

impl HeadlessRuntime {
    pub fn new(config: HeadlessRunConfig) -> Result<Self> {
        config
            .validate()
            .context("invalid headless run configuration")?;
        let clock = Rc::new(ManualClock::new());
        let scheduler = FrameScheduler::with_clock(clock.clone());
        Ok(Self {
            config,
            clock,
            scheduler,
        })
    }

    pub fn config(&self) -> &HeadlessRunConfig {
        &self.config
    }

    pub fn clock(&self) -> &Rc<ManualClock> {
        &self.clock
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Run up to the configured frame budget.
    ///
    /// With `stop_when_idle`, the run ends before any frame in which no
    /// animation is active.
    pub fn run<F>(&self, mut on_frame: F) -> Result<RunSummary>
    where
        F: FnMut(&HeadlessContext),
    {
        let start_ms = self.clock.now();
        let mut frames = 0;

        tracing::info!(
            frame_ms = self.config.frame_ms,
            max_frames = self.config.max_frames,
            "headless run started"
        );

        for frame_index in 0..self.config.max_frames {
            if self.config.stop_when_idle && !self.scheduler.is_running() {
                break;
            }

            self.clock
                .advance(self.config.frame_ms)
                .with_context(|| format!("failed to advance headless clock at frame {frame_index}"))?;
            frames += 1;

            on_frame(&HeadlessContext {
                frame_index,
                now_ms: self.clock.now(),
                active_animations: self.scheduler.active_count(),
            });
        }

        let summary = RunSummary {
            frames,
            elapsed_ms: self.clock.now() - start_ms,
            idle: !self.scheduler.is_running(),
        };
        tracing::info!(
            frames = summary.frames,
            elapsed_ms = summary.elapsed_ms,
            idle = summary.idle,
            "headless run finished"
        );
        Ok(summary)
    }
}
