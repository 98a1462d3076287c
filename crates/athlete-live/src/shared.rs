//! Process-wide, lazily initialized detector handle.
//!
//! Loading a pose model is slow and the model is large, so every session in
//! the process shares one instance. The first caller of
//! [`SharedDetector::acquire`] runs the initializer; callers arriving while it
//! runs are queued and resolved with the same outcome. A failed
//! initialization leaves the slot empty so a later call can try again.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use athlete_core::{Error, Result};

type Waiter<D> = oneshot::Sender<Result<Arc<D>>>;

enum Slot<D> {
    Empty,
    Loading(Vec<Waiter<D>>),
    Ready(Arc<D>),
}

/// Single-initialization guard around a shared detector.
///
/// Usable as a `static`:
///
/// ```ignore
/// static DETECTOR: SharedDetector<MyDetector> = SharedDetector::new();
/// let detector = DETECTOR.acquire(MyDetector::load).await?;
/// ```
pub struct SharedDetector<D> {
    slot: Mutex<Slot<D>>,
}

impl<D> SharedDetector<D> {
    pub const fn new() -> Self {
        Self {
            slot: parking_lot::const_mutex(Slot::Empty),
        }
    }

    /// The detector, if initialization has completed
    pub fn get(&self) -> Option<Arc<D>> {
        match &*self.slot.lock() {
            Slot::Ready(detector) => Some(Arc::clone(detector)),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Loading(_))
    }

    /// Drop the shared handle so the next `acquire` initializes again.
    ///
    /// Sessions already holding the detector keep it. Has no effect while an
    /// initialization is running.
    pub fn reset(&self) -> bool {
        let mut slot = self.slot.lock();
        if matches!(*slot, Slot::Ready(_)) {
            *slot = Slot::Empty;
            true
        } else {
            false
        }
    }

    /// Return the shared detector, running `init` if nobody has yet.
    ///
    /// Exactly one caller runs `init` at a time; concurrent callers wait for
    /// its outcome. If the initializing call is cancelled, waiters receive
    /// [`Error::DetectorInit`] and the slot is reset.
    pub async fn acquire<F, Fut>(&self, init: F) -> Result<Arc<D>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D>>,
    {
        let waiter = {
            let mut slot = self.slot.lock();
            match &mut *slot {
                Slot::Ready(detector) => return Ok(Arc::clone(detector)),
                Slot::Loading(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    debug!(queued = waiters.len(), "detector initialization in progress, waiting");
                    Some(rx)
                }
                Slot::Empty => {
                    *slot = Slot::Loading(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return rx
                .await
                .unwrap_or_else(|_| Err(Error::DetectorInit("initialization was abandoned".into())));
        }

        let guard = LoadingGuard { shared: self };
        info!("initializing shared pose detector");
        let result = init().await.map(Arc::new);
        std::mem::forget(guard);

        self.publish(result)
    }

    /// Store the outcome and resolve every queued waiter with it
    fn publish(&self, result: Result<Arc<D>>) -> Result<Arc<D>> {
        let waiters = {
            let mut slot = self.slot.lock();
            let next = match &result {
                Ok(detector) => Slot::Ready(Arc::clone(detector)),
                Err(_) => Slot::Empty,
            };
            match std::mem::replace(&mut *slot, next) {
                Slot::Loading(waiters) => waiters,
                _ => Vec::new(),
            }
        };

        match &result {
            Ok(_) => info!(waiters = waiters.len(), "pose detector ready"),
            Err(e) => error!(waiters = waiters.len(), error = %e, "pose detector initialization failed"),
        }

        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        result
    }
}

impl<D> Default for SharedDetector<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects waiters and resets the slot if the initializing future is dropped
/// before it completes
struct LoadingGuard<'a, D> {
    shared: &'a SharedDetector<D>,
}

impl<D> Drop for LoadingGuard<'_, D> {
    fn drop(&mut self) {
        let waiters = {
            let mut slot = self.shared.slot.lock();
            match std::mem::replace(&mut *slot, Slot::Empty) {
                Slot::Loading(waiters) => waiters,
                other => {
                    *slot = other;
                    Vec::new()
                }
            }
        };

        error!(waiters = waiters.len(), "detector initialization cancelled");
        let err = Error::DetectorInit("initialization cancelled".into());
        for waiter in waiters {
            let _ = waiter.send(Err(err.clone()));
        }
    }
}
