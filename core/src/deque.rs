//! Double-ended queue built from two persistent lists.
//!
//! `head` holds the front elements in order and `tail` holds the back
//! elements in reverse, so both ends support O(1) insertion. Reversal
//! swaps the two lists.

use std::fmt;

use crate::error::Result;
use crate::hash;
use crate::list::List;
use crate::sequence::{Appender, Counted, Pair, Prepender, Reverser, Sequence, Split};
use crate::value::{Value, write_spaced};

#[derive(Clone, Default)]
pub struct Deque {
    head: List,
    tail: List,
}

impl Deque {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        Deque {
            head: List::of(items),
            tail: List::empty(),
        }
    }

    pub fn prepend(&self, value: Value) -> Deque {
        Deque {
            head: self.head.prepend(value),
            tail: self.tail.clone(),
        }
    }

    pub fn append(&self, value: Value) -> Deque {
        Deque {
            head: self.head.clone(),
            tail: self.tail.prepend(value),
        }
    }

    pub fn split(&self) -> (Value, Deque, bool) {
        if self.head.is_empty() {
            if self.tail.is_empty() {
                return (Value::Null, Deque::empty(), false);
            }
            let (first, head, _) = self.tail.reverse().split();
            return (
                first,
                Deque {
                    head,
                    tail: List::empty(),
                },
                true,
            );
        }
        let (first, head, _) = self.head.split();
        (
            first,
            Deque {
                head,
                tail: self.tail.clone(),
            },
            true,
        )
    }

    pub fn reverse(&self) -> Deque {
        Deque {
            head: self.tail.clone(),
            tail: self.head.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.head.count() + self.tail.count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }

    /// Front-to-back iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        let back: Vec<&Value> = self.tail.iter().collect();
        self.head.iter().chain(back.into_iter().rev())
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::unordered(hash::salts().deque, self.iter().map(Value::hash_code))
    }
}

impl PartialEq for Deque {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

impl fmt::Display for Deque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_spaced(f, self.iter())?;
        write!(f, ")")
    }
}

impl fmt::Debug for Deque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Deque {
    fn car(&self) -> Result<Value> {
        Ok(self.split().0)
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Value::Deque(self.split().1))
    }
}

impl Sequence for Deque {
    fn split(&self) -> Result<Split> {
        let (first, rest, more) = Deque::split(self);
        Ok((first, Value::Deque(rest), more))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Deque::is_empty(self))
    }
}

impl Counted for Deque {
    fn count(&self) -> usize {
        Deque::count(self)
    }
}

impl Prepender for Deque {
    fn prepend(&self, value: Value) -> Result<Value> {
        Ok(Value::Deque(Deque::prepend(self, value)))
    }
}

impl Appender for Deque {
    fn append(&self, value: Value) -> Result<Value> {
        Ok(Value::Deque(Deque::append(self, value)))
    }
}

impl Reverser for Deque {
    fn reverse(&self) -> Result<Value> {
        Ok(Value::Deque(Deque::reverse(self)))
    }
}
