//! Cooperative cancellation
//!
//! The engine polls its signal once per sampled scanline, so a cancellation
//! is observed within one scanline's rendering time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something the render loop can ask "should I stop?"
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancelSignal for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shareable flag; clones observe the same cancellation
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Fires once a point in time has passed
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    pub fn after(timeout: Duration) -> Self {
        Self::at(Instant::now() + timeout)
    }
}

impl CancelSignal for Deadline {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Fires when either side fires, e.g. a user token plus a timeout
#[derive(Debug, Clone)]
pub struct Either<A, B>(pub A, pub B);

impl<A: CancelSignal, B: CancelSignal> CancelSignal for Either<A, B> {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled() || self.1.is_cancelled()
    }
}

/// Signal backed by a closure, see [`from_fn`]
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Wrap a closure as a signal
pub fn from_fn<F: Fn() -> bool>(check: F) -> FromFn<F> {
    FromFn(check)
}

impl<F: Fn() -> bool> CancelSignal for FromFn<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
