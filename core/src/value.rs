use std::fmt;
use std::hash::{Hash, Hasher};

use crate::associative::Associative;
use crate::bytes::Bytes;
use crate::cons::Cons;
use crate::deque::Deque;
use crate::hash;
use crate::lazy::LazySequence;
use crate::list::List;
use crate::numeric::Number;
use crate::object::Object;
use crate::promise::Promise;
use crate::sequence::{Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence};
use crate::string::Str;
use crate::symbol::{Keyword, Symbol};
use crate::vector::Vector;

// ============================================================================
// Core Type System
// ============================================================================

/// Every value handled by the runtime. Values are immutable once built and
/// may be shared freely between threads.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(Str),
    Bytes(Bytes),
    Symbol(Symbol),
    Keyword(Keyword),
    List(List),
    Vector(Vector),
    Object(Object),
    Associative(Associative),
    Deque(Deque),
    Cons(Cons),
    Lazy(LazySequence),
    Promise(Promise),
}

/// Type tag of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Boolean,
    Integer,
    BigInt,
    Float,
    Ratio,
    String,
    Bytes,
    Symbol,
    Keyword,
    List,
    Vector,
    Object,
    Associative,
    Deque,
    Cons,
    LazySequence,
    Promise,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Null => "null",
            Type::Boolean => "boolean",
            Type::Integer => "integer",
            Type::BigInt => "big-int",
            Type::Float => "float",
            Type::Ratio => "ratio",
            Type::String => "string",
            Type::Bytes => "bytes",
            Type::Symbol => "symbol",
            Type::Keyword => "keyword",
            Type::List => "list",
            Type::Vector => "vector",
            Type::Object => "object",
            Type::Associative => "associative",
            Type::Deque => "deque",
            Type::Cons => "cons",
            Type::LazySequence => "lazy-sequence",
            Type::Promise => "promise",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Boolean,
            Value::Number(Number::Integer(_)) => Type::Integer,
            Value::Number(Number::BigInt(_)) => Type::BigInt,
            Value::Number(Number::Float(_)) => Type::Float,
            Value::Number(Number::Ratio(_)) => Type::Ratio,
            Value::String(_) => Type::String,
            Value::Bytes(_) => Type::Bytes,
            Value::Symbol(_) => Type::Symbol,
            Value::Keyword(_) => Type::Keyword,
            Value::List(_) => Type::List,
            Value::Vector(_) => Type::Vector,
            Value::Object(_) => Type::Object,
            Value::Associative(_) => Type::Associative,
            Value::Deque(_) => Type::Deque,
            Value::Cons(_) => Type::Cons,
            Value::Lazy(_) => Type::LazySequence,
            Value::Promise(_) => Type::Promise,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ============================================================================
// Equality and Hashing
// ============================================================================

impl Value {
    /// Structural equality. Lazy sequences and promises compare by identity
    /// so that comparing them never forces a resolution.
    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.equal(b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Associative(a), Value::Associative(b)) => a == b,
            (Value::Deque(a), Value::Deque(b)) => a == b,
            (Value::Cons(a), Value::Cons(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// 64-bit hash code, consistent with `equal`. Values without a better
    /// strategy hash their display string.
    pub fn hash_code(&self) -> u64 {
        match self {
            Value::Number(n) => n.hash_code(),
            Value::Bytes(b) => b.hash_code(),
            Value::List(l) => l.hash_code(),
            Value::Vector(v) => v.hash_code(),
            Value::Object(o) => o.hash_code(),
            Value::Associative(a) => a.hash_code(),
            Value::Deque(d) => d.hash_code(),
            Value::Cons(c) => c.hash_code(),
            Value::Lazy(l) => hash::hash_bytes(&l.addr().to_le_bytes()),
            Value::Promise(p) => hash::hash_bytes(&p.addr().to_le_bytes()),
            _ => hash::hash_str(&self.to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

// ============================================================================
// Capabilities
// ============================================================================

impl Value {
    pub fn as_pair(&self) -> Option<&dyn Pair> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::Cons(c) => Some(c),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            Value::Object(o) => Some(o),
            Value::Associative(a) => Some(a),
            Value::Lazy(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&dyn Sequence> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            Value::Object(o) => Some(o),
            Value::Associative(a) => Some(a),
            Value::Lazy(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_counted(&self) -> Option<&dyn Counted> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            Value::Object(o) => Some(o),
            Value::Associative(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_indexed(&self) -> Option<&dyn Indexed> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            Value::Associative(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_prepender(&self) -> Option<&dyn Prepender> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            Value::Associative(a) => Some(a),
            Value::Lazy(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_appender(&self) -> Option<&dyn Appender> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_reverser(&self) -> Option<&dyn Reverser> {
        match self {
            Value::List(l) => Some(l),
            Value::Vector(v) => Some(v),
            Value::Deque(d) => Some(d),
            Value::String(s) => Some(s),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

/// Display adapter that prints a value in its quoted (readable) form.
pub(crate) struct Quoted<'a>(pub &'a Value);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "\"{}\"", escape_string(s.as_str())),
            other => write!(f, "{other}"),
        }
    }
}

/// Write `items` separated by single spaces, each in quoted form.
pub(crate) fn write_spaced<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", Quoted(item))?;
    }
    Ok(())
}

pub(crate) fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c if c.is_control() => result.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

impl Value {
    /// Readable form: strings are quoted and escaped, everything else
    /// prints as its display form.
    pub fn to_quoted_string(&self) -> String {
        Quoted(self).to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Bytes(b) => write!(f, "{b}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Keyword(k) => write!(f, "{k}"),
            Value::List(l) => write!(f, "{l}"),
            Value::Vector(v) => write!(f, "{v}"),
            Value::Object(o) => write!(f, "{o}"),
            Value::Associative(a) => write!(f, "{a}"),
            Value::Deque(d) => write!(f, "{d}"),
            Value::Cons(c) => write!(f, "{c}"),
            Value::Lazy(l) => write!(f, "{l}"),
            Value::Promise(p) => write!(f, "{p}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Quoted(self))
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::Integer(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::Integer(i64::from(n)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(Number::Float(x))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Str::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Str::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Keyword> for Value {
    fn from(k: Keyword) -> Self {
        Value::Keyword(k)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(v)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Associative> for Value {
    fn from(a: Associative) -> Self {
        Value::Associative(a)
    }
}

impl From<Deque> for Value {
    fn from(d: Deque) -> Self {
        Value::Deque(d)
    }
}

impl From<Cons> for Value {
    fn from(c: Cons) -> Self {
        Value::Cons(c)
    }
}

impl From<LazySequence> for Value {
    fn from(l: LazySequence) -> Self {
        Value::Lazy(l)
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Value::Promise(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of_names() {
        assert_eq!(Value::Null.type_of().name(), "null");
        assert_eq!(Value::from(1).type_of(), Type::Integer);
        assert_eq!(Value::from(1.5).type_of(), Type::Float);
        assert_eq!(Value::from("s").type_of(), Type::String);
        assert_eq!(Value::List(List::empty()).type_of().name(), "list");
    }

    #[test]
    fn test_quoted_string_escapes() {
        let v = Value::from("a\"b\n\u{1}");
        assert_eq!(v.to_string(), "a\"b\n\u{1}");
        assert_eq!(v.to_quoted_string(), "\"a\\\"b\\n\\u{1}\"");
    }

    #[test]
    fn test_quoted_non_string_is_display() {
        assert_eq!(Value::from(42).to_quoted_string(), "42");
        assert_eq!(Value::Bool(false).to_quoted_string(), "false");
    }

    #[test]
    fn test_strings_inside_containers_are_quoted() {
        let list = Value::List(List::of([Value::from("a"), Value::from(1)]));
        assert_eq!(list.to_string(), "(\"a\" 1)");
    }

    #[test]
    fn test_equal_is_type_sensitive() {
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(
            Value::List(List::of([Value::from(1)])),
            Value::Vector(Vector::of([Value::from(1)]))
        );
    }

    #[test]
    fn test_symbol_hash_matches_equal() {
        let a = Value::Symbol(Symbol::intern_local("x"));
        let b = Value::Symbol(Symbol::intern_local("x"));
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
    }
}
