//! Integration tests for the frame scheduler + tween engine
//!
//! These tests drive a manual host clock at a ~60Hz cadence and verify that:
//! - Tweens interpolate, ease, saturate, and stop the way callers expect
//! - Independent animations share one clock and one delta per frame
//! - The host frame request is released once every animation is done

use cadence_animation::{tween, Easing, FrameScheduler, TweenHandle};
use cadence_core::ManualClock;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const FRAME_MS: f64 = 16.666;

fn setup() -> (Rc<ManualClock>, FrameScheduler) {
    let clock = Rc::new(ManualClock::new());
    let scheduler = FrameScheduler::with_clock(clock.clone());
    (clock, scheduler)
}

fn start(scheduler: &FrameScheduler, easing: Easing) -> (Rc<Cell<f64>>, TweenHandle) {
    let value = Rc::new(Cell::new(0.0));
    let handle = tween(scheduler, value.clone(), 100.0, 100.0, easing);
    (value, handle)
}

/// Linear tween reaches 2/3 after four real frames, then lands exactly on target
#[test]
fn test_linear_tween_interpolates_then_lands_on_target() {
    let (clock, scheduler) = setup();
    let (value, handle) = start(&scheduler, Easing::Linear);

    // Nothing is written before the first frame
    assert_eq!(value.get(), 0.0);

    // First frame of the batch has zero delta, then four ~16.666ms steps
    clock.advance_frames(5, FRAME_MS).unwrap();
    assert!((value.get() - 66.664).abs() < 1e-6);
    assert!(!handle.is_finished());

    clock.advance_frames(3, FRAME_MS).unwrap();
    assert_eq!(value.get(), 100.0);
    assert!(handle.is_finished());
    assert!(!scheduler.is_running());
}

/// Easing remaps time progress before interpolation
#[test]
fn test_eased_tween_midpoint() {
    let (clock, scheduler) = setup();
    let (value, handle) = start(&scheduler, Easing::custom(|t| t * t));

    // Elapsed: 0 + 3 * 16.666 = 49.998
    clock.advance_frames(4, FRAME_MS).unwrap();
    assert!((value.get() - 25.0).abs() < 0.01);

    handle.stop();
}

/// Stopping mid-flight resolves the handle and freezes the value
#[test]
fn test_stop_mid_flight_freezes_value() {
    let (clock, scheduler) = setup();
    let (value, handle) = start(&scheduler, Easing::Linear);

    clock.advance_frames(4, FRAME_MS).unwrap();
    let frozen = value.get();
    assert!(frozen > 0.0 && frozen < 100.0);

    handle.stop();
    assert!(handle.is_finished());
    pollster::block_on(handle.clone());

    clock.advance_frames(10, FRAME_MS).unwrap();
    assert_eq!(value.get(), frozen);
    assert!(!scheduler.is_running());
}

/// Two animations with different lengths share deltas until the shorter one finishes
#[test]
fn test_independent_animations_share_clock() {
    let (clock, scheduler) = setup();

    let short_deltas = Rc::new(RefCell::new(Vec::new()));
    let long_deltas = Rc::new(RefCell::new(Vec::new()));

    let log = short_deltas.clone();
    let mut total = 0.0;
    scheduler.animate_fn(move |delta| {
        log.borrow_mut().push(delta);
        total += delta;
        if total >= 50.0 {
            1.0
        } else {
            0.0
        }
    });

    let log = long_deltas.clone();
    let mut total = 0.0;
    scheduler.animate_fn(move |delta| {
        log.borrow_mut().push(delta);
        total += delta;
        total / 200.0
    });

    assert_eq!(clock.pending(), 1);
    clock.advance_frames(20, FRAME_MS).unwrap();

    let short_deltas = short_deltas.borrow();
    let long_deltas = long_deltas.borrow();

    // 0, then 4 steps to pass 50ms
    assert_eq!(short_deltas.len(), 5);
    // 0, then 13 steps to pass 200ms
    assert_eq!(long_deltas.len(), 14);
    assert_eq!(&long_deltas[..5], &short_deltas[..]);
    assert_eq!(long_deltas[0], 0.0);
    for delta in &long_deltas[1..] {
        assert!((delta - FRAME_MS).abs() < 1e-9);
    }

    assert_eq!(scheduler.active_count(), 0);
    assert!(!scheduler.is_running());
    assert_eq!(clock.pending(), 0);
}

/// The written value never passes the target, however large the last step
#[test]
fn test_tween_saturates_on_large_step() {
    let (clock, scheduler) = setup();
    let value = Rc::new(Cell::new(10.0));
    let handle = tween(&scheduler, value.clone(), 20.0, 100.0, Easing::Linear);

    clock.advance(FRAME_MS).unwrap();
    clock.advance(5_000.0).unwrap();

    assert_eq!(value.get(), 20.0);
    assert!(handle.is_finished());
}

/// With identity easing the value follows elapsed time linearly and monotonically
#[test]
fn test_linear_tween_is_monotonic() {
    let (clock, scheduler) = setup();
    let value = Rc::new(Cell::new(-40.0));
    let handle = tween(&scheduler, value.clone(), 60.0, 250.0, Easing::Linear);

    let mut previous = value.get();
    let mut elapsed = 0.0;
    for frame in 0..30 {
        clock.advance(FRAME_MS).unwrap();
        if frame > 0 {
            elapsed += FRAME_MS;
        }
        let current = value.get();
        assert!(current >= previous, "frame {frame}: {current} < {previous}");
        if elapsed < 250.0 {
            let expected = -40.0 + 100.0 * (elapsed / 250.0);
            assert!((current - expected).abs() < 1e-6);
        }
        previous = current;
    }

    assert!(handle.is_finished());
    assert_eq!(value.get(), 60.0);
}

/// Stopping twice, or after completion, never touches the target again
#[test]
fn test_stop_is_idempotent() {
    let (clock, scheduler) = setup();
    let (value, handle) = start(&scheduler, Easing::Linear);

    clock.advance_frames(10, FRAME_MS).unwrap();
    assert!(handle.is_finished());

    value.set(42.0);
    handle.stop();
    handle.stop();
    clock.advance_frames(5, FRAME_MS).unwrap();
    assert_eq!(value.get(), 42.0);
}

/// Every observer hears about completion exactly once
#[test]
fn test_many_observers_notified_once() {
    let (clock, scheduler) = setup();
    let (_value, handle) = start(&scheduler, Easing::EaseOutCubic);
    let notified = Rc::new(Cell::new(0));

    for observer in [handle.clone(), handle.clone(), handle.clone()] {
        let notified = notified.clone();
        observer.on_finish(move || notified.set(notified.get() + 1));
    }

    clock.advance_frames(4, FRAME_MS).unwrap();
    assert_eq!(notified.get(), 0);

    clock.advance_frames(10, FRAME_MS).unwrap();
    handle.stop();
    assert_eq!(notified.get(), 3);

    pollster::block_on(handle.clone());
    pollster::block_on(handle);
}

/// A tween started after an idle gap begins from a zero delta
#[test]
fn test_second_batch_ignores_idle_gap() {
    let (clock, scheduler) = setup();
    let (_first, first_handle) = start(&scheduler, Easing::Linear);
    clock.advance_frames(10, FRAME_MS).unwrap();
    assert!(first_handle.is_finished());

    clock.advance_frames(3, 10_000.0).unwrap();

    let (second, _second_handle) = start(&scheduler, Easing::Linear);
    clock.advance(FRAME_MS).unwrap();
    assert_eq!(second.get(), 0.0);
    clock.advance(FRAME_MS).unwrap();
    assert!((second.get() - FRAME_MS).abs() < 1e-6);
}

/// Tweens can be chained from a completion callback
#[test]
fn test_chained_tweens() {
    let (clock, scheduler) = setup();
    let value = Rc::new(Cell::new(0.0));

    let first = tween(&scheduler, value.clone(), 50.0, 50.0, Easing::Linear);
    let second_slot: Rc<RefCell<Option<TweenHandle>>> = Rc::new(RefCell::new(None));

    let chain_scheduler = scheduler.clone();
    let chain_value = value.clone();
    let chain_slot = second_slot.clone();
    first.on_finish(move || {
        let next = tween(&chain_scheduler, chain_value, 0.0, 50.0, Easing::Linear);
        *chain_slot.borrow_mut() = Some(next);
    });

    clock.advance_frames(20, FRAME_MS).unwrap();

    let second = second_slot.borrow().clone().expect("second tween started");
    assert!(second.is_finished());
    assert_eq!(value.get(), 0.0);
    assert!(!scheduler.is_running());
}
