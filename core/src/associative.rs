//! Associative: an ordered list of key/value pairs.
//!
//! Lookups return the first matching key. Storage is an `im::Vector` so
//! prepending and removing share structure with the original.

use std::fmt;

use im::Vector as ImVector;

use crate::cons::Cons;
use crate::error::{Error, Result};
use crate::hash;
use crate::sequence::{Counted, Indexed, Pair, Prepender, Sequence, Split};
use crate::value::{Quoted, Value};

#[derive(Clone, Default)]
pub struct Associative {
    entries: ImVector<(Value, Value)>,
}

/// Interpret `value` as a 2-element pair: a cons cell, or a list or vector
/// of exactly two elements.
pub fn as_pair(value: &Value) -> Result<(Value, Value)> {
    match value {
        Value::Cons(cell) => Ok((cell.car().clone(), cell.cdr().clone())),
        Value::Vector(v) if v.count() == 2 => Ok((v.element_at(0).0, v.element_at(1).0)),
        Value::List(l) if l.count() == 2 => Ok((l.first(), l.rest().first())),
        _ => Err(Error::expected_pair(value)),
    }
}

impl Associative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Associative {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Build from arbitrary values, each of which must be a pair.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let entries = values
            .into_iter()
            .map(|v| as_pair(&v))
            .collect::<Result<ImVector<_>>>()?;
        Ok(Associative { entries })
    }

    /// Value bound to the first entry whose key equals `key`.
    pub fn get(&self, key: &Value) -> (Value, bool) {
        match self.entries.iter().find(|(k, _)| k == key) {
            Some((_, value)) => (value.clone(), true),
            None => (Value::Null, false),
        }
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Replace the first entry for `key`, or add a new entry at the front.
    pub fn put(&self, key: Value, value: Value) -> Associative {
        let mut entries = self.entries.clone();
        match self.position(&key) {
            Some(index) => {
                entries.set(index, (key, value));
            }
            None => entries.push_front((key, value)),
        }
        Associative { entries }
    }

    /// Remove the first entry for `key`.
    pub fn remove(&self, key: &Value) -> Associative {
        let mut entries = self.entries.clone();
        if let Some(index) = self.position(key) {
            entries.remove(index);
        }
        Associative { entries }
    }

    /// Add `pair` in front of every existing entry.
    pub fn prepend(&self, pair: &Value) -> Result<Associative> {
        let mut entries = self.entries.clone();
        entries.push_front(as_pair(pair)?);
        Ok(Associative { entries })
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn element_at(&self, index: usize) -> (Value, bool) {
        match self.entries.get(index) {
            Some((k, v)) => (Value::Cons(Cons::new(k.clone(), v.clone())), true),
            None => (Value::Null, false),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    pub fn split(&self) -> (Value, Associative, bool) {
        if self.is_empty() {
            return (Value::Null, Associative::new(), false);
        }
        let (first, _) = self.element_at(0);
        let rest = Associative {
            entries: self.entries.skip(1),
        };
        (first, rest, true)
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::unordered(
            hash::salts().associative,
            self.iter()
                .map(|(k, v)| hash::entry(k.hash_code(), v.hash_code())),
        )
    }
}

impl PartialEq for Associative {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for Associative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{} {}", Quoted(key), Quoted(value))?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Associative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Associative {
    fn car(&self) -> Result<Value> {
        Ok(self.split().0)
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::Associative(self.split().1))
    }
}

impl Sequence for Associative {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = Associative::split(self);
        Ok((first, Value::Associative(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Associative::is_empty(self))
    }
}

impl Counted for Associative {
    fn count(&self) -> usize {
        Associative::count(self)
    }
}

impl Indexed for Associative {
    fn element_at(&self, index: usize) -> (Value, bool) {
        Associative::element_at(self, index)
    }
}

impl Prepender for Associative {
    fn prepend(&self, value: Value) -> Result<Value> {
        Associative::prepend(self, &value).map(Value::Associative)
    }
}
