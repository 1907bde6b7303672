use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::hash;
use crate::sequence::Pair;
use crate::value::{Quoted, Value};

/// A raw (car . cdr) cell. The cdr may be any value, so a cons is a pair
/// but not a sequence.
#[derive(Clone)]
pub struct Cons(Arc<(Value, Value)>);

impl Cons {
    pub fn new(car: Value, cdr: Value) -> Self {
        Cons(Arc::new((car, cdr)))
    }

    pub fn car(&self) -> &Value {
        &self.0.0
    }

    pub fn cdr(&self) -> &Value {
        &self.0.1
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash::salts().cons ^ hash::entry(self.car().hash_code(), self.cdr().hash_code())
    }
}

impl PartialEq for Cons {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || (self.car() == other.car() && self.cdr() == other.cdr())
    }
}

impl Pair for Cons {
    fn car(&self) -> Result<Value> {
        Ok(Cons::car(self).clone())
    }

    fn cdr(&self) -> Result<Value> {
        Ok(Cons::cdr(self).clone())
    }
}

impl fmt::Display for Cons {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}", Quoted(self.car()))?;
        let mut tail = self.cdr().clone();
        loop {
            match tail {
                Value::Cons(cell) => {
                    write!(f, " {}", Quoted(cell.car()))?;
                    tail = cell.cdr().clone();
                }
                Value::List(list) => {
                    for item in list.iter() {
                        write!(f, " {}", Quoted(item))?;
                    }
                    break;
                }
                other => {
                    write!(f, " . {}", Quoted(&other))?;
                    break;
                }
            }
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Cons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::List;

    #[test]
    fn test_dotted_pair() {
        let cell = Cons::new(Value::from(1), Value::from(2));
        assert_eq!(cell.to_string(), "(1 . 2)");
    }

    #[test]
    fn test_cons_onto_list_prints_proper() {
        let tail = List::of([Value::from(2), Value::from(3)]);
        let cell = Cons::new(Value::from(1), Value::List(tail));
        assert_eq!(cell.to_string(), "(1 2 3)");
        let single = Cons::new(Value::from(1), Value::List(List::empty()));
        assert_eq!(single.to_string(), "(1)");
    }

    #[test]
    fn test_nested_cons_chain() {
        let inner = Cons::new(Value::from(2), Value::from(3));
        let cell = Cons::new(Value::from(1), Value::Cons(inner));
        assert_eq!(cell.to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_cons_is_not_a_sequence() {
        let cell = Value::Cons(Cons::new(Value::from(1), Value::from(2)));
        assert!(cell.as_sequence().is_none());
        assert_eq!(crate::sequence::cdr(&cell).unwrap(), Value::from(2));
    }
}
