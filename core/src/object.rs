//! Objects: key/value tables with an optional prototype.
//!
//! An object is either a single table of its own properties or a table
//! extending a parent object. Lookups walk the prototype chain; writes only
//! ever build new tables, so a prototype is never modified by its children.

use std::fmt;
use std::sync::Arc;

use im::HashMap as ImHashMap;

use crate::cons::Cons;
use crate::error::Result;
use crate::hash;
use crate::sequence::{Counted, Pair, Sequence, Split};
use crate::value::{Quoted, Value};

type Table = ImHashMap<Value, Value>;

enum Repr {
    Own(Table),
    Extended { own: Table, parent: Object },
}

#[derive(Clone)]
pub struct Object {
    repr: Arc<Repr>,
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// Create an empty object with no prototype.
    pub fn new() -> Self {
        Object {
            repr: Arc::new(Repr::Own(Table::new())),
        }
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Object {
            repr: Arc::new(Repr::Own(pairs.into_iter().collect())),
        }
    }

    fn own(&self) -> &Table {
        match self.repr.as_ref() {
            Repr::Own(own) | Repr::Extended { own, .. } => own,
        }
    }

    pub fn parent(&self) -> Option<&Object> {
        match self.repr.as_ref() {
            Repr::Own(_) => None,
            Repr::Extended { parent, .. } => Some(parent),
        }
    }

    /// Look `key` up, falling back through the prototype chain.
    pub fn get(&self, key: &Value) -> (Value, bool) {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(value) = object.own().get(key) {
                return (value.clone(), true);
            }
            current = object.parent();
        }
        (Value::Null, false)
    }

    /// Return a new object with `key` bound at the own level. The prototype
    /// (if any) is shared, not copied.
    pub fn put(&self, key: Value, value: Value) -> Object {
        let repr = match self.repr.as_ref() {
            Repr::Own(own) => Repr::Own(own.update(key, value)),
            Repr::Extended { own, parent } => Repr::Extended {
                own: own.update(key, value),
                parent: parent.clone(),
            },
        };
        Object {
            repr: Arc::new(repr),
        }
    }

    /// Return a new object whose own properties are `props` and whose
    /// prototype is this object.
    pub fn extend<I>(&self, props: I) -> Object
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Object {
            repr: Arc::new(Repr::Extended {
                own: props.into_iter().collect(),
                parent: self.clone(),
            }),
        }
    }

    /// Materialize the whole prototype chain into a single-level object.
    /// Entries closer to the receiver win on key collisions.
    pub fn flatten(&self) -> Object {
        if self.parent().is_none() {
            return self.clone();
        }
        Object {
            repr: Arc::new(Repr::Own(self.flat_table())),
        }
    }

    fn flat_table(&self) -> Table {
        if let Repr::Own(own) = self.repr.as_ref() {
            return own.clone();
        }
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(object) = current {
            chain.push(object.own());
            current = object.parent();
        }
        let mut table = Table::new();
        for own in chain.into_iter().rev() {
            for (key, value) in own {
                table.insert(key.clone(), value.clone());
            }
        }
        table
    }

    pub fn count(&self) -> usize {
        match self.repr.as_ref() {
            Repr::Own(own) => own.len(),
            Repr::Extended { .. } => self.flat_table().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Keys of the flattened object, in printed order.
    pub fn keys(&self) -> Vec<Value> {
        self.sorted_entries().into_iter().map(|(k, _)| k).collect()
    }

    /// Entries of the flattened object sorted by the printed form of their
    /// keys, for deterministic output.
    fn sorted_entries(&self) -> Vec<(Value, Value)> {
        let mut entries: Vec<(Value, Value)> = self.flat_table().into_iter().collect();
        entries.sort_by_cached_key(|(k, _)| k.to_quoted_string());
        entries
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::unordered(
            hash::salts().object,
            self.flat_table()
                .iter()
                .map(|(k, v)| hash::entry(k.hash_code(), v.hash_code())),
        )
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.repr, &other.repr) || self.flat_table() == other.flat_table()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.sorted_entries().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{} {}", Quoted(key), Quoted(value))?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Pair for Object {
    fn car(&self) -> Result<Value> {
        self.first()
    }

    fn cdr(&self) -> Result<Value> {
        self.rest()
    }
}

/// An object splits into `(key . value)` pairs over its flattened view. The
/// chain is flattened on the first split only; every rest is a single table.
impl Sequence for Object {
    fn split(&self) -> Result<Split> {
        let table = self.flat_table();
        let Some((key, value)) = table.iter().next().map(|(k, v)| (k.clone(), v.clone())) else {
            return Ok((Value::Null, Value::Object(Object::new()), false));
        };
        let rest = Object {
            repr: Arc::new(Repr::Own(table.without(&key))),
        };
        Ok((Value::Cons(Cons::new(key, value)), Value::Object(rest), true))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(Object::is_empty(self))
    }
}

impl Counted for Object {
    fn count(&self) -> usize {
        Object::count(self)
    }
}
