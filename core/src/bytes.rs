//! Immutable byte vectors. `rest` shares storage by advancing an offset.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hash;
use crate::numeric::Number;
use crate::sequence::{Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence, Split};
use crate::value::Value;

#[derive(Clone)]
pub struct Bytes {
    data: Arc<[u8]>,
    offset: usize,
}

/// Accept an Integer in 0..=255.
fn to_byte(value: &Value) -> Result<u8> {
    match value {
        Value::Number(Number::Integer(n)) => {
            u8::try_from(*n).map_err(|_| Error::byte_out_of_range(value))
        }
        _ => Err(Error::byte_out_of_range(value)),
    }
}

impl Bytes {
    fn from_vec(bytes: Vec<u8>) -> Self {
        Bytes {
            data: Arc::from(bytes),
            offset: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Bytes {
            data: Arc::from(bytes),
            offset: 0,
        }
    }

    /// Build from integer values, each of which must fit in a byte.
    pub fn from_values(values: &[Value]) -> Result<Self> {
        let bytes = values.iter().map(to_byte).collect::<Result<Vec<u8>>>()?;
        Ok(Self::from_vec(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.offset..]
    }

    pub fn count(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn element_at(&self, index: usize) -> (Value, bool) {
        match self.as_slice().get(index) {
            Some(b) => (Value::from(i64::from(*b)), true),
            None => (Value::Null, false),
        }
    }

    pub fn split(&self) -> (Value, Bytes, bool) {
        match self.as_slice().first() {
            Some(b) => {
                let rest = Bytes {
                    data: Arc::clone(&self.data),
                    offset: self.offset + 1,
                };
                (Value::from(i64::from(*b)), rest, true)
            }
            None => (Value::Null, Bytes::empty(), false),
        }
    }

    /// Whether both byte vectors view the same storage at the same offset.
    pub fn ptr_eq(&self, other: &Bytes) -> bool {
        Arc::ptr_eq(&self.data, &other.data) && self.offset == other.offset
    }

    pub fn prepend(&self, value: &Value) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(self.count() + 1);
        bytes.push(to_byte(value)?);
        bytes.extend_from_slice(self.as_slice());
        Ok(Self::from_vec(bytes))
    }

    pub fn append(&self, value: &Value) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(self.count() + 1);
        bytes.extend_from_slice(self.as_slice());
        bytes.push(to_byte(value)?);
        Ok(Self::from_vec(bytes))
    }

    pub fn reverse(&self) -> Bytes {
        Self::from_vec(self.as_slice().iter().rev().copied().collect())
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::salts().bytes ^ hash::hash_bytes(self.as_slice())
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_slice() == other.as_slice()
    }
}

impl Eq for Bytes {}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#b[")?;
        for (i, b) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Bytes {
    fn car(&self) -> Result<Value> {
        Ok(self.split().0)
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::Bytes(self.split().1))
    }
}

impl Sequence for Bytes {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = Bytes::split(self);
        Ok((first, Value::Bytes(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Bytes::is_empty(self))
    }
}

impl Counted for Bytes {
    fn count(&self) -> usize {
        Bytes::count(self)
    }
}

impl Indexed for Bytes {
    fn element_at(&self, index: usize) -> (Value, bool) {
        Bytes::element_at(self, index)
    }
}

impl Prepender for Bytes {
    fn prepend(&self, value: Value) -> Result<Value> {
        Bytes::prepend(self, &value).map(Value::Bytes)
    }
}

impl Appender for Bytes {
    fn append(&self, value: Value) -> Result<Value> {
        Bytes::append(self, &value).map(Value::Bytes)
    }
}

impl Reverser for Bytes {
    fn reverse(&self) -> Result<Value> {
        Ok(Value::Bytes(Bytes::reverse(self)))
    }
}
