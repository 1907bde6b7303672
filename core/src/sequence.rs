//! Capability protocol shared by every value.
//!
//! Capabilities are additive: a concrete type implements whichever subset
//! makes sense for it, and callers discover them at runtime through the
//! `Value::as_*` accessors. The free functions in this module perform that
//! lookup and fail with `CapabilityMissing` when a capability is absent.

use crate::error::{Error, Result};
use crate::value::Value;

/// Result of splitting a sequence: `(first, rest, has_more)`.
///
/// When `has_more` is false the sequence was empty, `first` is `Null`, and
/// `rest` is the canonical empty instance of the sequence's family.
pub type Split = (Value, Value, bool);

/// Minimal 2-slot structure.
pub trait Pair {
    fn car(&self) -> Result<Value>;
    fn cdr(&self) -> Result<Value>;
}

/// A (possibly lazy) sequence of values.
pub trait Sequence: Pair {
    fn split(&self) -> Result<Split>;
    fn is_empty(&self) -> Result<bool>;

    fn first(&self) -> Result<Value> {
        Ok(self.split()?.0)
    }

    fn rest(&self) -> Result<Value> {
        Ok(self.split()?.1)
    }
}

/// Sequences that know their length without walking it.
pub trait Counted {
    fn count(&self) -> usize;
}

/// Sequences supporting positional access. Out-of-range access returns
/// `(Null, false)`.
pub trait Indexed: Counted {
    fn element_at(&self, index: usize) -> (Value, bool);
}

pub trait Prepender {
    fn prepend(&self, value: Value) -> Result<Value>;
}

pub trait Appender {
    fn append(&self, value: Value) -> Result<Value>;
}

pub trait Reverser {
    fn reverse(&self) -> Result<Value>;
}

// ============================================================================
// Capability-checked operations
// ============================================================================

fn sequence_of<'a>(value: &'a Value, method: &str) -> Result<&'a dyn Sequence> {
    value
        .as_sequence()
        .ok_or_else(|| Error::capability_missing("Sequence", method, value))
}

pub fn split(value: &Value) -> Result<Split> {
    sequence_of(value, "split")?.split()
}

pub fn first(value: &Value) -> Result<Value> {
    sequence_of(value, "first")?.first()
}

pub fn rest(value: &Value) -> Result<Value> {
    sequence_of(value, "rest")?.rest()
}

pub fn is_empty(value: &Value) -> Result<bool> {
    sequence_of(value, "is_empty")?.is_empty()
}

pub fn car(value: &Value) -> Result<Value> {
    value
        .as_pair()
        .ok_or_else(|| Error::capability_missing("Pair", "car", value))?
        .car()
}

pub fn cdr(value: &Value) -> Result<Value> {
    value
        .as_pair()
        .ok_or_else(|| Error::capability_missing("Pair", "cdr", value))?
        .cdr()
}

/// Count a sequence. Fails for sequences that are not `Counted`; callers
/// needing a count of an arbitrary sequence must materialize it first.
pub fn count(value: &Value) -> Result<usize> {
    value
        .as_counted()
        .map(|c| c.count())
        .ok_or_else(|| Error::capability_missing("Counted", "count", value))
}

pub fn element_at(value: &Value, index: usize) -> Result<(Value, bool)> {
    value
        .as_indexed()
        .map(|i| i.element_at(index))
        .ok_or_else(|| Error::capability_missing("Indexed", "element_at", value))
}

pub fn prepend(value: &Value, item: Value) -> Result<Value> {
    value
        .as_prepender()
        .ok_or_else(|| Error::capability_missing("Prepender", "prepend", value))?
        .prepend(item)
}

pub fn append(value: &Value, item: Value) -> Result<Value> {
    value
        .as_appender()
        .ok_or_else(|| Error::capability_missing("Appender", "append", value))?
        .append(item)
}

pub fn reverse(value: &Value) -> Result<Value> {
    value
        .as_reverser()
        .ok_or_else(|| Error::capability_missing("Reverser", "reverse", value))?
        .reverse()
}

/// Iterate any sequence, yielding an error (once) if splitting fails.
pub fn iter(value: &Value) -> Result<SeqIter> {
    sequence_of(value, "iter")?;
    Ok(SeqIter {
        current: Some(value.clone()),
    })
}

/// Materialize a sequence into a `Vec`.
pub fn to_vec(value: &Value) -> Result<Vec<Value>> {
    iter(value)?.collect()
}

/// Iterator over a sequence value, driven by repeated `split`.
pub struct SeqIter {
    current: Option<Value>,
}

impl Iterator for SeqIter {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        match split(&current) {
            Ok((first, rest, true)) => {
                self.current = Some(rest);
                Some(Ok(first))
            }
            Ok((_, _, false)) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::list::List;

    fn list(items: &[i64]) -> Value {
        Value::List(List::of(items.iter().map(|n| Value::from(*n))))
    }

    #[test]
    fn test_split_empty_has_no_more() {
        let (first, rest, more) = split(&Value::List(List::empty())).unwrap();
        assert!(!more);
        assert_eq!(first, Value::Null);
        assert_eq!(rest, Value::List(List::empty()));
    }

    #[test]
    fn test_count_missing_capability() {
        let err = count(&Value::from(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapabilityMissing);
        assert!(err.message.contains("Counted"));
        assert!(err.message.contains("integer"));
    }

    #[test]
    fn test_split_missing_capability() {
        let err = split(&Value::Bool(true)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapabilityMissing);
        assert!(err.message.starts_with("split"));
    }

    #[test]
    fn test_iter_collects_in_order() {
        let items = to_vec(&list(&[1, 2, 3])).unwrap();
        assert_eq!(items, vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn test_free_functions_dispatch() {
        let l = list(&[1, 2]);
        assert_eq!(first(&l).unwrap(), Value::from(1));
        assert_eq!(rest(&l).unwrap(), list(&[2]));
        assert_eq!(count(&l).unwrap(), 2);
        assert_eq!(element_at(&l, 1).unwrap(), (Value::from(2), true));
        assert_eq!(prepend(&l, Value::from(0)).unwrap(), list(&[0, 1, 2]));
        assert_eq!(append(&l, Value::from(3)).unwrap(), list(&[1, 2, 3]));
        assert_eq!(reverse(&l).unwrap(), list(&[2, 1]));
        assert_eq!(car(&l).unwrap(), Value::from(1));
        assert!(!is_empty(&l).unwrap());
    }
}
