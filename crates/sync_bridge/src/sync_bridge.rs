//! Blocking handoff for single-shot completion callbacks.
//!
//! Platform APIs such as `LAContext` or `UNUserNotificationCenter` report their
//! result through a completion handler that runs on a platform-owned queue.
//! [`channel`] returns a [`Completer`] to move into that handler and a
//! [`Completion`] the calling thread blocks on until the handler fires.
//!
//! The result slot and the wake-up share one mutex, so everything the
//! handler wrote is visible to the waiter once `wait` returns.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a wait ended without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The configured bound elapsed before the handler ran.
    #[error("timed out after {0:?} waiting for completion")]
    TimedOut(Duration),
    /// Every completer was dropped without being invoked.
    #[error("completion handler was released without being invoked")]
    Abandoned,
}

enum Slot<T> {
    Pending,
    Ready(T),
    Abandoned,
    /// The waiter has gone away (value taken, timed out, or dropped).
    Closed,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
    completers: AtomicUsize,
    invocations: AtomicUsize,
}

/// Sending half. Cloneable so it can live inside a block the platform copies.
pub struct Completer<T> {
    shared: Arc<Shared<T>>,
}

/// Receiving half. Consumed by the wait.
pub struct Completion<T> {
    shared: Arc<Shared<T>>,
}

/// Create a connected completer/completion pair.
pub fn channel<T>() -> (Completer<T>, Completion<T>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot::Pending),
        ready: Condvar::new(),
        completers: AtomicUsize::new(1),
        invocations: AtomicUsize::new(0),
    });
    (
        Completer {
            shared: shared.clone(),
        },
        Completion { shared },
    )
}

/// Issue an operation with a fresh completer and block until it fires.
pub fn block_on<T>(start: impl FnOnce(Completer<T>)) -> Result<T, WaitError> {
    block_on_timeout(start, None)
}

/// Like [`block_on`], giving up after `timeout` when one is set.
pub fn block_on_timeout<T>(
    start: impl FnOnce(Completer<T>),
    timeout: Option<Duration>,
) -> Result<T, WaitError> {
    let (completer, completion) = channel();
    start(completer);
    completion.wait_for(timeout)
}

impl<T> Completer<T> {
    /// Deliver the result. Only the first call counts; later calls return false.
    pub fn complete(&self, value: T) -> bool {
        self.shared.invocations.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.shared.slot.lock();
        match *slot {
            Slot::Pending => {
                *slot = Slot::Ready(value);
                drop(slot);
                self.shared.ready.notify_all();
                true
            }
            Slot::Closed => {
                debug!("Completion arrived after the waiter gave up");
                false
            }
            Slot::Ready(_) | Slot::Abandoned => {
                warn!("Completion handler invoked more than once; ignoring");
                false
            }
        }
    }

    /// How many times `complete` has been called on this pair.
    pub fn invocations(&self) -> usize {
        self.shared.invocations.load(Ordering::SeqCst)
    }
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        self.shared.completers.fetch_add(1, Ordering::AcqRel);
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if self.shared.completers.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }
        let mut slot = self.shared.slot.lock();
        if matches!(*slot, Slot::Pending) {
            *slot = Slot::Abandoned;
            drop(slot);
            self.shared.ready.notify_all();
        }
    }
}

impl<T> Completion<T> {
    /// Block until the handler fires or every completer is gone.
    pub fn wait(self) -> Result<T, WaitError> {
        let mut slot = self.shared.slot.lock();
        loop {
            match std::mem::replace(&mut *slot, Slot::Closed) {
                Slot::Ready(value) => return Ok(value),
                Slot::Abandoned | Slot::Closed => return Err(WaitError::Abandoned),
                Slot::Pending => {
                    *slot = Slot::Pending;
                    self.shared.ready.wait(&mut slot);
                }
            }
        }
    }

    /// Block for at most `timeout`. A bound past the representable future
    /// waits without one.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, WaitError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait();
        };
        let mut slot = self.shared.slot.lock();
        loop {
            match std::mem::replace(&mut *slot, Slot::Closed) {
                Slot::Ready(value) => return Ok(value),
                Slot::Abandoned | Slot::Closed => return Err(WaitError::Abandoned),
                Slot::Pending => {
                    if Instant::now() >= deadline {
                        return Err(WaitError::TimedOut(timeout));
                    }
                    *slot = Slot::Pending;
                    self.shared.ready.wait_until(&mut slot, deadline);
                }
            }
        }
    }

    /// Unbounded when `timeout` is `None`.
    pub fn wait_for(self, timeout: Option<Duration>) -> Result<T, WaitError> {
        match timeout {
            Some(timeout) => self.wait_timeout(timeout),
            None => self.wait(),
        }
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        let mut slot = self.shared.slot.lock();
        if matches!(*slot, Slot::Pending) {
            *slot = Slot::Closed;
        }
    }
}
