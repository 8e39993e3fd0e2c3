//! One-shot completion signal
//!
//! Resolved at most once. Every clone observes the same signal, either by
//! awaiting it or by registering a callback. Each awaiting clone keeps one
//! waker slot, released when the clone is dropped.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

type ResolveCallback = Box<dyn FnOnce()>;

new_key_type! {
    struct WakerKey;
}

#[derive(Default)]
struct CompletionState {
    resolved: bool,
    wakers: SlotMap<WakerKey, Waker>,
    callbacks: Vec<ResolveCallback>,
}

/// Deferred, single-threaded completion notification
#[derive(Default)]
pub struct Completion {
    state: Rc<RefCell<CompletionState>>,
    /// This observer's registered waker, if it has been polled
    waker_slot: Option<WakerKey>,
}

impl Clone for Completion {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            waker_slot: None,
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(key) = self.waker_slot.take() {
            self.state.borrow_mut().wakers.remove(key);
        }
    }
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that has already fired
    pub fn resolved() -> Self {
        let completion = Self::new();
        completion.state.borrow_mut().resolved = true;
        completion
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    /// Fire the signal
    ///
    /// Returns `false` if it had already fired; observers are notified only
    /// on the first call.
    pub fn resolve(&self) -> bool {
        let (wakers, callbacks) = {
            let mut state = self.state.borrow_mut();
            if state.resolved {
                return false;
            }
            state.resolved = true;
            (
                std::mem::take(&mut state.wakers),
                std::mem::take(&mut state.callbacks),
            )
        };

        for (_, waker) in wakers {
            waker.wake();
        }
        for callback in callbacks {
            callback();
        }
        true
    }

    /// Run `callback` once the signal fires (immediately if it already has)
    pub fn on_resolve<F: FnOnce() + 'static>(&self, callback: F) {
        let mut state = self.state.borrow_mut();
        if state.resolved {
            drop(state);
            callback();
        } else {
            state.callbacks.push(Box::new(callback));
        }
    }

    #[cfg(test)]
    fn pending_wakers(&self) -> usize {
        self.state.borrow().wakers.len()
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let mut state = this.state.borrow_mut();
        if state.resolved {
            return Poll::Ready(());
        }

        // Re-polling replaces this observer's waker instead of adding one
        let slot = this.waker_slot.filter(|key| state.wakers.contains_key(*key));
        match slot {
            Some(key) => state.wakers[key].clone_from(cx.waker()),
            None => this.waker_slot = Some(state.wakers.insert(cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::Wake;

    #[derive(Default)]
    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_waker() -> (Arc<CountingWaker>, Waker) {
        let counter = Arc::new(CountingWaker::default());
        (counter.clone(), Waker::from(counter))
    }

    #[test]
    fn test_resolve_notifies_every_observer_once() {
        let completion = Completion::new();
        let count = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let count = count.clone();
            completion.clone().on_resolve(move || count.set(count.get() + 1));
        }

        assert!(completion.resolve());
        assert!(!completion.resolve());
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_on_resolve_after_fire_runs_immediately() {
        let completion = Completion::resolved();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        completion.on_resolve(move || ran_clone.set(true));
        assert!(ran.get());
    }

    #[test]
    fn test_await_after_resolve() {
        let completion = Completion::new();
        let observer = completion.clone();
        completion.resolve();
        pollster::block_on(observer);
        assert!(completion.is_resolved());
    }

    #[test]
    fn test_repoll_replaces_observer_waker() {
        let completion = Completion::new();
        let mut observer = completion.clone();
        let (first_count, first) = counting_waker();
        let (second_count, second) = counting_waker();

        for _ in 0..3 {
            let poll = Pin::new(&mut observer).poll(&mut Context::from_waker(&first));
            assert!(poll.is_pending());
        }
        assert_eq!(completion.pending_wakers(), 1);

        let poll = Pin::new(&mut observer).poll(&mut Context::from_waker(&second));
        assert!(poll.is_pending());
        assert_eq!(completion.pending_wakers(), 1);

        completion.resolve();
        assert_eq!(first_count.0.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_observer_releases_waker() {
        let completion = Completion::new();
        let (count, waker) = counting_waker();

        let mut observers = vec![completion.clone(), completion.clone()];
        for observer in &mut observers {
            let poll = Pin::new(observer).poll(&mut Context::from_waker(&waker));
            assert!(poll.is_pending());
        }
        assert_eq!(completion.pending_wakers(), 2);

        observers.pop();
        assert_eq!(completion.pending_wakers(), 1);
        drop(observers);
        assert_eq!(completion.pending_wakers(), 0);

        assert!(completion.resolve());
        assert_eq!(count.0.load(Ordering::SeqCst), 0);
    }
}
