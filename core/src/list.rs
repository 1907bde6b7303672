//! Persistent singly-linked list.
//!
//! Prepending is O(1) and shares the old list as the new tail. Every node
//! caches the count of the list it heads, so `count` is O(1) as well.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::hash;
use crate::sequence::{Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence, Split};
use crate::value::{Value, write_spaced};

struct Node {
    first: Value,
    rest: List,
    count: usize,
}

#[derive(Clone, Default)]
pub struct List {
    head: Option<Arc<Node>>,
}

impl List {
    /// The empty list.
    pub fn empty() -> Self {
        List { head: None }
    }

    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(List::empty(), |list, item| list.prepend(item))
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self::of(items)
    }

    /// Return a new list headed by `value` that shares this list as its tail.
    pub fn prepend(&self, value: Value) -> List {
        List {
            head: Some(Arc::new(Node {
                first: value,
                rest: self.clone(),
                count: self.count() + 1,
            })),
        }
    }

    /// Return a new list with `value` at the end. Copies every node.
    pub fn append(&self, value: Value) -> List {
        let mut items: Vec<Value> = self.iter().cloned().collect();
        items.push(value);
        List::of(items)
    }

    pub fn first(&self) -> Value {
        self.head
            .as_ref()
            .map_or(Value::Null, |node| node.first.clone())
    }

    pub fn rest(&self) -> List {
        self.head
            .as_ref()
            .map_or_else(List::empty, |node| node.rest.clone())
    }

    pub fn split(&self) -> (Value, List, bool) {
        match &self.head {
            Some(node) => (node.first.clone(), node.rest.clone(), true),
            None => (Value::Null, List::empty(), false),
        }
    }

    pub fn count(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.count)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn reverse(&self) -> List {
        self.iter()
            .fold(List::empty(), |list, item| list.prepend(item.clone()))
    }

    pub fn element_at(&self, index: usize) -> (Value, bool) {
        match self.iter().nth(index) {
            Some(value) => (value.clone(), true),
            None => (Value::Null, false),
        }
    }

    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            current: self.head.as_deref(),
        }
    }

    /// Whether both lists share the same head node.
    pub fn ptr_eq(&self, other: &List) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::unordered(hash::salts().list, self.iter().map(Value::hash_code))
    }
}

// Long lists would otherwise drop recursively, one stack frame per node.
impl Drop for List {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.rest.head.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct ListIter<'a> {
    current: Option<&'a Node>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.rest.head.as_deref();
        Some(&node.first)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        if self.count() != other.count() {
            return false;
        }
        let (mut a, mut b) = (self.head.as_ref(), other.head.as_ref());
        while let (Some(x), Some(y)) = (a, b) {
            if Arc::ptr_eq(x, y) {
                return true;
            }
            if x.first != y.first {
                return false;
            }
            a = x.rest.head.as_ref();
            b = y.rest.head.as_ref();
        }
        true
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_spaced(f, self.iter())?;
        write!(f, ")")
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for List {
    fn car(&self) -> Result<Value> {
        Ok(self.first())
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::List(self.rest()))
    }
}

impl Sequence for List {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = List::split(self);
        Ok((first, Value::List(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(List::is_empty(self))
    }
}

impl Counted for List {
    fn count(&self) -> usize {
        List::count(self)
    }
}

impl Indexed for List {
    fn element_at(&self, index: usize) -> (Value, bool) {
        List::element_at(self, index)
    }
}

impl Prepender for List {
    fn prepend(&self, value: Value) -> Result<Value> {
        Ok(Value::List(List::prepend(self, value)))
    }
}

impl Appender for List {
    fn append(&self, value: Value) -> Result<Value> {
        Ok(Value::List(List::append(self, value)))
    }
}

impl Reverser for List {
    fn reverse(&self) -> Result<Value> {
        Ok(Value::List(List::reverse(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(items: &[i64]) -> List {
        List::of(items.iter().map(|n| Value::from(*n)))
    }

    #[test]
    fn test_prepend_display() {
        assert_eq!(ints(&[1, 2, 3]).prepend(Value::from(0)).to_string(), "(0 1 2 3)");
    }

    #[test]
    fn test_prepend_shares_tail() {
        let list = ints(&[1, 2, 3]);
        let longer = list.prepend(Value::from(0));
        assert!(longer.rest().ptr_eq(&list));
        assert_eq!(longer.rest(), list);
    }

    #[test]
    fn test_count_is_cached() {
        let list = ints(&[1, 2, 3]);
        assert_eq!(list.count(), 3);
        assert_eq!(list.rest().count(), 2);
        assert_eq!(List::empty().count(), 0);
    }

    #[test]
    fn test_rest_of_single_is_empty() {
        let list = ints(&[1]);
        assert!(list.rest().is_empty());
        assert_eq!(list.rest(), List::empty());
    }

    #[test]
    fn test_reverse_and_append() {
        assert_eq!(ints(&[1, 2, 3]).reverse(), ints(&[3, 2, 1]));
        assert_eq!(ints(&[1, 2]).append(Value::from(3)), ints(&[1, 2, 3]));
    }

    #[test]
    fn test_element_at() {
        let list = ints(&[10, 20]);
        assert_eq!(list.element_at(1), (Value::from(20), true));
        assert_eq!(list.element_at(2), (Value::Null, false));
    }

    #[test]
    fn test_equality_elementwise() {
        assert_eq!(ints(&[1, 2]), ints(&[1, 2]));
        assert_ne!(ints(&[1, 2]), ints(&[2, 1]));
        assert_ne!(ints(&[1, 2]), ints(&[1, 2, 3]));
    }

    #[test]
    fn test_drop_long_list() {
        let list = List::of((0..200_000i64).map(Value::from));
        assert_eq!(list.count(), 200_000);
        drop(list);
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(List::empty().to_string(), "()");
    }
}
