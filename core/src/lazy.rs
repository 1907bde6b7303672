//! Lazy sequences.
//!
//! Each node holds a resolver that produces `(first, rest, has_more)` on
//! first demand. The outcome, success or failure, is memoized: the resolver
//! runs at most once no matter how many threads split the node, and every
//! caller observes the same result.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::resolve::ResolveOnce;
use crate::sequence::{Pair, Prepender, Sequence, Split};
use crate::value::{Quoted, Value};

type Resolver = Box<dyn FnOnce() -> Result<Split> + Send>;

static EMPTY: Lazy<LazySequence> = Lazy::new(|| {
    LazySequence::new(|| Ok((Value::Null, Value::Lazy(LazySequence::empty()), false)))
});

struct LazyNode {
    resolver: Mutex<Option<Resolver>>,
    result: ResolveOnce<Result<Split>>,
}

#[derive(Clone)]
pub struct LazySequence {
    node: Arc<LazyNode>,
}

impl LazySequence {
    /// A node that calls `resolver` the first time it is split.
    pub fn new<F>(resolver: F) -> Self
    where
        F: FnOnce() -> Result<Split> + Send + 'static,
    {
        LazySequence {
            node: Arc::new(LazyNode {
                resolver: Mutex::new(Some(Box::new(resolver))),
                result: ResolveOnce::new(),
            }),
        }
    }

    /// A node that is already resolved to `first` followed by `rest`.
    pub fn resolved(first: Value, rest: Value) -> Self {
        LazySequence {
            node: Arc::new(LazyNode {
                resolver: Mutex::new(None),
                result: ResolveOnce::resolved(Ok((first, rest, true))),
            }),
        }
    }

    /// The canonical empty lazy sequence.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Lazily walk `iter`, pulling one element per node on demand.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + Send + 'static,
    {
        LazySequence::new(move || {
            let mut iter = iter;
            Ok(match iter.next() {
                Some(value) => (value, Value::Lazy(LazySequence::from_iter(iter)), true),
                None => (Value::Null, Value::Lazy(LazySequence::empty()), false),
            })
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.node.result.is_resolved()
    }

    /// Force this node. Later calls return the memoized outcome.
    pub fn split(&self) -> Result<Split> {
        self.node
            .result
            .resolve_with(|| {
                let resolver = self
                    .node
                    .resolver
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                match resolver {
                    Some(resolve) => {
                        trace!("resolving lazy sequence node");
                        resolve()
                    }
                    // Only reachable if an earlier resolver panicked.
                    None => Err(Error::new(
                        ErrorKind::Raised,
                        "lazy sequence resolver did not complete",
                    )),
                }
            })
            .clone()
    }

    /// A new, already-resolved node in front of this one. Does not force
    /// this node.
    pub fn prepend(&self, value: Value) -> LazySequence {
        LazySequence::resolved(value, Value::Lazy(self.clone()))
    }

    pub fn ptr_eq(&self, other: &LazySequence) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Identity of this node, for identity-based hashing.
    pub fn addr(&self) -> u64 {
        Arc::as_ptr(&self.node) as usize as u64
    }
}

/// Take the lazy successor out of a resolved node, if it is one.
fn take_next(result: &mut ResolveOnce<Result<Split>>) -> Option<Arc<LazyNode>> {
    match result.take() {
        Some(Ok((_, Value::Lazy(rest), _))) => Some(rest.node),
        _ => None,
    }
}

// Long realized chains would otherwise drop recursively, one frame per node.
impl Drop for LazyNode {
    fn drop(&mut self) {
        let mut next = take_next(&mut self.result);
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = take_next(&mut node.result),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Display for LazySequence {
    /// Printing realizes the whole sequence.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut current = self.clone();
        let mut first = true;
        loop {
            match current.split() {
                Ok((value, rest, true)) => {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "{}", Quoted(&value))?;
                    match rest {
                        Value::Lazy(next) => current = next,
                        other => {
                            for item in crate::sequence::iter(&other).into_iter().flatten() {
                                match item {
                                    Ok(item) => write!(f, " {}", Quoted(&item))?,
                                    Err(err) => return write!(f, " #<lazy-error: {err}>)"),
                                }
                            }
                            break;
                        }
                    }
                }
                Ok(_) => break,
                Err(err) => {
                    if !first {
                        write!(f, " ")?;
                    }
                    return write!(f, "#<lazy-error: {err}>)");
                }
            }
        }
        write!(f, ")")
    }
}

impl fmt::Debug for LazySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_resolved() { "resolved" } else { "pending" };
        write!(f, "#<lazy-sequence:{state}>")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for LazySequence {
    fn car(&self) -> Result<Value> {
        Ok(LazySequence::split(self)?.0)
    }

    fn cdr(&self) -> Result<Value> {
        Ok(LazySequence::split(self)?.1)
    }
}

impl Sequence for LazySequence {
    fn split(&self) -> Result<Split> {
        LazySequence::split(self)
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(!LazySequence::split(self)?.2)
    }
}

impl Prepender for LazySequence {
    fn prepend(&self, value: Value) -> Result<Value> {
        Ok(Value::Lazy(LazySequence::prepend(self, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(calls: Arc<AtomicUsize>) -> LazySequence {
        LazySequence::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok((Value::from(1), Value::Lazy(LazySequence::empty()), true))
        })
    }

    #[test]
    fn test_resolver_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = counting(Arc::clone(&calls));
        assert!(!lazy.is_resolved());
        assert_eq!(lazy.split().unwrap().0, Value::from(1));
        assert_eq!(lazy.split().unwrap().0, Value::from(1));
        assert!(lazy.is_resolved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = {
            let calls = Arc::clone(&calls);
            LazySequence::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::raised(Value::from("boom")))
            })
        };
        let first = lazy.split().unwrap_err();
        let second = lazy.split().unwrap_err();
        assert_eq!(first.raised_value(), Some(&Value::from("boom")));
        assert_eq!(second.raised_value(), Some(&Value::from("boom")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prepend_does_not_force() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = counting(Arc::clone(&calls));
        let longer = lazy.prepend(Value::from(0));
        assert!(longer.is_resolved());
        assert_eq!(longer.split().unwrap().0, Value::from(0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_iter_and_display() {
        let lazy = LazySequence::from_iter((1..=3i64).map(Value::from));
        assert_eq!(lazy.to_string(), "(1 2 3)");
        assert_eq!(LazySequence::empty().to_string(), "()");
    }

    #[test]
    fn test_empty_is_canonical() {
        let (first, rest, more) = LazySequence::empty().split().unwrap();
        assert!(!more);
        assert_eq!(first, Value::Null);
        assert_eq!(rest, Value::Lazy(LazySequence::empty()));
    }

    #[test]
    fn test_drop_long_chain() {
        let lazy = LazySequence::from_iter((0..100_000i64).map(Value::from));
        let items = crate::sequence::to_vec(&Value::Lazy(lazy.clone())).unwrap();
        assert_eq!(items.len(), 100_000);
        drop(lazy);
    }
}
