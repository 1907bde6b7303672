//! One-shot promises.
//!
//! A promise is resolved either by its producer, run on first demand, or by
//! an explicit `deliver`/`fail`. Whichever happens first wins; a second
//! explicit delivery fails with `AlreadyDelivered`. Readers block until a
//! value or error is available.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::resolve::ResolveOnce;
use crate::value::Value;

type Producer = Box<dyn FnOnce() -> Result<Value> + Send>;

struct PromiseState {
    producer: Mutex<Option<Producer>>,
    has_producer: bool,
    outcome: ResolveOnce<Result<Value>>,
}

#[derive(Clone)]
pub struct Promise {
    inner: Arc<PromiseState>,
}

impl Default for Promise {
    fn default() -> Self {
        Self::new()
    }
}

impl Promise {
    /// A promise that is resolved by `deliver` or `fail`.
    pub fn new() -> Self {
        Promise {
            inner: Arc::new(PromiseState {
                producer: Mutex::new(None),
                has_producer: false,
                outcome: ResolveOnce::new(),
            }),
        }
    }

    /// A promise that runs `producer` the first time it is resolved.
    pub fn with_producer<F>(producer: F) -> Self
    where
        F: FnOnce() -> Result<Value> + Send + 'static,
    {
        Promise {
            inner: Arc::new(PromiseState {
                producer: Mutex::new(Some(Box::new(producer))),
                has_producer: true,
                outcome: ResolveOnce::new(),
            }),
        }
    }

    pub fn deliver(&self, value: Value) -> Result<()> {
        self.settle(Ok(value))
    }

    /// Resolve with an error that every reader will observe.
    pub fn fail(&self, err: Error) -> Result<()> {
        self.settle(Err(err))
    }

    fn settle(&self, outcome: Result<Value>) -> Result<()> {
        if self.inner.outcome.try_resolve(outcome) {
            debug!("promise delivered");
            Ok(())
        } else {
            Err(Error::already_delivered())
        }
    }

    /// Block until the promise is resolved and return its outcome.
    pub fn resolve(&self) -> Result<Value> {
        let outcome = if self.inner.has_producer {
            self.inner.outcome.resolve_with(|| {
                let producer = self
                    .inner
                    .producer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                match producer {
                    Some(produce) => {
                        debug!("running promise producer");
                        produce()
                    }
                    // Only reachable if an earlier producer panicked.
                    None => Err(Error::new(
                        ErrorKind::Raised,
                        "promise producer did not complete",
                    )),
                }
            })
        } else {
            self.inner.outcome.wait()
        };
        outcome.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.outcome.is_resolved()
    }

    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity of this promise, for identity-based hashing.
    pub fn addr(&self) -> u64 {
        Arc::as_ptr(&self.inner) as usize as u64
    }
}

impl fmt::Display for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "#<promise:resolved>")
        } else {
            write!(f, "#<promise:pending>")
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
