//! Immutable strings, treated as sequences of characters.
//!
//! Counting and indexing are by `char`, not by byte. Splitting yields the
//! first character as a one-character string. `rest` shares the underlying
//! text by advancing a byte offset.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::sequence::{Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence, Split};
use crate::value::Value;

static EMPTY: Lazy<Str> = Lazy::new(|| Str {
    text: Arc::from(""),
    offset: 0,
});

#[derive(Clone)]
pub struct Str {
    text: Arc<str>,
    /// Byte offset of the first visible character; always a char boundary.
    offset: usize,
}

impl Str {
    /// The canonical empty string.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.text[self.offset..]
    }

    pub fn count(&self) -> usize {
        self.as_str().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn element_at(&self, index: usize) -> (Value, bool) {
        match self.as_str().chars().nth(index) {
            Some(c) => (Value::String(Str::from(c.to_string())), true),
            None => (Value::Null, false),
        }
    }

    pub fn split(&self) -> (Value, Str, bool) {
        match self.as_str().chars().next() {
            Some(c) => (Value::String(Str::from(c.to_string())), self.advance(c), true),
            None => (Value::Null, Str::empty(), false),
        }
    }

    fn advance(&self, first: char) -> Str {
        let offset = self.offset + first.len_utf8();
        if offset == self.text.len() {
            return Str::empty();
        }
        Str {
            text: Arc::clone(&self.text),
            offset,
        }
    }

    /// Whether both strings view the same text at the same offset.
    pub fn ptr_eq(&self, other: &Str) -> bool {
        Arc::ptr_eq(&self.text, &other.text) && self.offset == other.offset
    }

    /// Prefix the display form of `value`.
    pub fn prepend(&self, value: &Value) -> Str {
        Str::from(format!("{value}{}", self.as_str()))
    }

    /// Suffix the display form of `value`.
    pub fn append(&self, value: &Value) -> Str {
        Str::from(format!("{}{value}", self.as_str()))
    }

    pub fn reverse(&self) -> Str {
        Str::from(self.as_str().chars().rev().collect::<String>())
    }

    /// Characters `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Str> {
        let count = self.count();
        if start > end || end > count {
            return Err(Error::index_out_of_range(start, end, count));
        }
        Ok(Str::from(
            self.as_str().chars().skip(start).take(end - start).collect::<String>(),
        ))
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Str {
            text: Arc::from(s),
            offset: 0,
        }
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Str {
            text: Arc::from(s),
            offset: 0,
        }
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

impl Eq for Str {}

impl Hash for Str {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Str {
    fn car(&self) -> Result<Value> {
        Ok(self.split().0)
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::String(self.split().1))
    }
}

impl Sequence for Str {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = Str::split(self);
        Ok((first, Value::String(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Str::is_empty(self))
    }
}

impl Counted for Str {
    fn count(&self) -> usize {
        Str::count(self)
    }
}

impl Indexed for Str {
    fn element_at(&self, index: usize) -> (Value, bool) {
        Str::element_at(self, index)
    }
}

impl Prepender for Str {
    fn prepend(&self, value: Value) -> Result<Value> {
        Ok(Value::String(Str::prepend(self, &value)))
    }
}

impl Appender for Str {
    fn append(&self, value: Value) -> Result<Value> {
        Ok(Value::String(Str::append(self, &value)))
    }
}

impl Reverser for Str {
    fn reverse(&self) -> Result<Value> {
        Ok(Value::String(Str::reverse(self)))
    }
}
