//! Array-backed vector.
//!
//! Prepend and append copy the whole block. `rest` shares the underlying
//! storage by advancing an offset.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::hash;
use crate::sequence::{Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence, Split};
use crate::value::{Value, write_spaced};

static EMPTY: Lazy<Vector> = Lazy::new(|| Vector {
    elements: Arc::from(Vec::new()),
    offset: 0,
});

#[derive(Clone)]
pub struct Vector {
    elements: Arc<[Value]>,
    offset: usize,
}

impl Vector {
    /// The canonical empty vector.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::from_vec(items.into_iter().collect())
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        if items.is_empty() {
            return Self::empty();
        }
        Vector {
            elements: Arc::from(items),
            offset: 0,
        }
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.elements[self.offset..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.as_slice().iter()
    }

    pub fn count(&self) -> usize {
        self.elements.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Out-of-range access reports "not found" rather than failing.
    pub fn element_at(&self, index: usize) -> (Value, bool) {
        match self.as_slice().get(index) {
            Some(value) => (value.clone(), true),
            None => (Value::Null, false),
        }
    }

    pub fn first(&self) -> Value {
        self.as_slice().first().cloned().unwrap_or(Value::Null)
    }

    pub fn rest(&self) -> Vector {
        if self.count() <= 1 {
            return Self::empty();
        }
        Vector {
            elements: Arc::clone(&self.elements),
            offset: self.offset + 1,
        }
    }

    pub fn split(&self) -> (Value, Vector, bool) {
        if self.is_empty() {
            (Value::Null, Self::empty(), false)
        } else {
            (self.first(), self.rest(), true)
        }
    }

    pub fn prepend(&self, value: Value) -> Vector {
        let mut items = Vec::with_capacity(self.count() + 1);
        items.push(value);
        items.extend_from_slice(self.as_slice());
        Self::from_vec(items)
    }

    pub fn append(&self, value: Value) -> Vector {
        let mut items = Vec::with_capacity(self.count() + 1);
        items.extend_from_slice(self.as_slice());
        items.push(value);
        Self::from_vec(items)
    }

    pub fn reverse(&self) -> Vector {
        Self::from_vec(self.iter().rev().cloned().collect())
    }

    /// Whether both vectors view the same storage at the same offset.
    pub fn ptr_eq(&self, other: &Vector) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements) && self.offset == other.offset
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::ordered(hash::salts().vector, self.iter().map(Value::hash_code))
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_spaced(f, self.iter())?;
        write!(f, "]")
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Vector {
    fn car(&self) -> Result<Value> {
        Ok(self.first())
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::Vector(self.rest()))
    }
}

impl Sequence for Vector {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = Vector::split(self);
        Ok((first, Value::Vector(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Vector::is_empty(self))
    }
}

impl Counted for Vector {
    fn count(&self) -> usize {
        Vector::count(self)
    }
}

impl Indexed for Vector {
    fn element_at(&self, index: usize) -> (Value, bool) {
        Vector::element_at(self, index)
    }
}

impl Prepender for Vector {
    fn prepend(&self, value: Value) -> Result<Value> {
        Ok(Value::Vector(Vector::prepend(self, value)))
    }
}

impl Appender for Vector {
    fn append(&self, value: Value) -> Result<Value> {
        Ok(Value::Vector(Vector::append(self, value)))
    }
}

impl Reverser for Vector {
    fn reverse(&self) -> Result<Value> {
        Ok(Value::Vector(Vector::reverse(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_at_out_of_range() {
        let v = Vector::of([Value::from("a"), Value::from("b")]);
        assert_eq!(v.element_at(5), (Value::Null, false));
        assert_eq!(v.element_at(1), (Value::from("b"), true));
    }

    #[test]
    fn test_rest_shares_storage() {
        let v = Vector::of([Value::from(1), Value::from(2), Value::from(3)]);
        let rest = v.rest();
        assert!(Arc::ptr_eq(&v.elements, &rest.elements));
        assert_eq!(rest, Vector::of([Value::from(2), Value::from(3)]));
    }

    #[test]
    fn test_rest_of_single_is_canonical_empty() {
        let v = Vector::of([Value::from(1)]);
        assert!(v.rest().ptr_eq(&Vector::empty()));
    }

    #[test]
    fn test_prepend_append_copy() {
        let v = Vector::of([Value::from(2)]);
        assert_eq!(v.prepend(Value::from(1)).to_string(), "[1 2]");
        assert_eq!(v.append(Value::from(3)).to_string(), "[2 3]");
        assert_eq!(v.to_string(), "[2]");
    }

    #[test]
    fn test_prepend_after_rest() {
        let v = Vector::of([Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(v.rest().prepend(Value::from(9)).to_string(), "[9 2 3]");
    }

    #[test]
    fn test_order_sensitive_hash() {
        let ab = Vector::of([Value::from("a"), Value::from("b")]);
        let ba = Vector::of([Value::from("b"), Value::from("a")]);
        assert_ne!(ab.hash_code(), ba.hash_code());
        assert_eq!(ab.hash_code(), ab.reverse().reverse().hash_code());
    }
}
