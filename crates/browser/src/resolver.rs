//! One-shot completion handles with an explicit resolve/reject pair and a
//! deadline after which they reject on their own.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use sie_core::{RejectReason, Rejected};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::id::{DEFAULT_ID_LEN, generate_id};

pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_millis(5000);

/// Shared future yielding the resolver's single outcome
pub type Completion<T> = Shared<BoxFuture<'static, Result<T, Rejected>>>;

enum Settlement<T> {
    Pending(oneshot::Sender<Result<T, Rejected>>),
    Resolved,
    Rejected,
}

struct Inner<T> {
    id: String,
    state: Mutex<Settlement<T>>,
    deadline: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Inner<T> {
    fn state(&self) -> MutexGuard<'_, Settlement<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move from pending to the terminal state matching `outcome`.
    /// Returns false if something else got there first.
    fn settle(&self, outcome: Result<T, RejectReason>) -> bool {
        let mut state = self.state();
        let terminal = match outcome {
            Ok(_) => Settlement::Resolved,
            Err(_) => Settlement::Rejected,
        };
        let sender = match std::mem::replace(&mut *state, terminal) {
            Settlement::Pending(sender) => sender,
            previous => {
                *state = previous;
                return false;
            }
        };
        drop(state);

        let outcome = outcome.map_err(|reason| Rejected {
            id: self.id.clone(),
            reason,
        });
        // Completion futures may all have been dropped already.
        let _ = sender.send(outcome);
        true
    }

    fn cancel_deadline(&self) {
        let handle = self
            .deadline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

/// A completion handle that can be settled exactly once, by its owner or by
/// its deadline.
///
/// Cloning shares the same underlying state; any clone may settle it.
pub struct Resolver<T> {
    inner: Arc<Inner<T>>,
    completion: Completion<T>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            completion: self.completion.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("id", &self.inner.id)
            .field("resolved", &self.resolved())
            .field("rejected", &self.rejected())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Resolver<T> {
    /// Arms the deadline on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(timeout: Duration) -> Self {
        let id = generate_id(DEFAULT_ID_LEN);
        let (tx, rx) = oneshot::channel();

        let closed_id = id.clone();
        let completion = rx
            .map(move |received| match received {
                Ok(outcome) => outcome,
                Err(_) => Err(Rejected {
                    id: closed_id,
                    reason: RejectReason::Dropped,
                }),
            })
            .boxed()
            .shared();

        let inner = Arc::new(Inner {
            id,
            state: Mutex::new(Settlement::Pending(tx)),
            deadline: Mutex::new(None),
        });

        let timer = Arc::clone(&inner);
        let deadline = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if timer.settle(Err(RejectReason::Timeout)) {
                tracing::warn!(
                    "Resolver {} timed out after {}ms",
                    timer.id,
                    timeout.as_millis()
                );
            }
        });
        *inner.deadline.lock().unwrap_or_else(PoisonError::into_inner) = Some(deadline);

        tracing::debug!("Created resolver {} ({}ms)", inner.id, timeout.as_millis());
        Self { inner, completion }
    }

    pub fn with_default_timeout() -> Self {
        Self::new(DEFAULT_RESOLVER_TIMEOUT)
    }

    /// Fulfil with `value`. Only the first settling call has any effect.
    pub fn resolve(&self, value: T) -> bool {
        let settled = self.inner.settle(Ok(value));
        if settled {
            self.inner.cancel_deadline();
            tracing::trace!("Resolver {} resolved", self.inner.id);
        }
        settled
    }

    /// Reject. Only the first settling call has any effect.
    pub fn reject(&self) -> bool {
        let settled = self.inner.settle(Err(RejectReason::Explicit));
        if settled {
            self.inner.cancel_deadline();
            tracing::trace!("Resolver {} rejected", self.inner.id);
        }
        settled
    }
}

impl<T> Resolver<T> {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn completed(&self) -> bool {
        !matches!(*self.inner.state(), Settlement::Pending(_))
    }

    pub fn resolved(&self) -> bool {
        matches!(*self.inner.state(), Settlement::Resolved)
    }

    pub fn rejected(&self) -> bool {
        matches!(*self.inner.state(), Settlement::Rejected)
    }

    /// A future for the outcome; every clone observes the same result.
    pub fn completion(&self) -> Completion<T> {
        self.completion.clone()
    }
}

/// Shorthand for [`Resolver::new`]
pub fn create_resolver<T: Clone + Send + Sync + 'static>(timeout: Duration) -> Resolver<T> {
    Resolver::new(timeout)
}
