//! Value kernel for Ale
//!
//! This crate contains the immutable values every other part of the
//! runtime produces and consumes: persistent collections, the numeric
//! tower, interned symbols, salted hashing, and the lazily resolved values
//! (lazy sequences, promises, channels). It does not include a reader,
//! evaluator, or compiler.

pub mod associative;
pub mod bytes;
pub mod channel;
pub mod cons;
pub mod deque;
pub mod error;
pub mod hash;
pub mod lazy;
pub mod list;
pub mod numeric;
pub mod object;
pub mod promise;
pub mod resolve;
pub mod sequence;
pub mod string;
pub mod symbol;
pub mod value;
pub mod vector;

// Re-export commonly used items for convenience
pub use associative::Associative;
pub use bytes::Bytes;
pub use channel::{ChannelSequence, Emitter, channel};
pub use cons::Cons;
pub use deque::Deque;
pub use error::{Error, ErrorKind, Result};
pub use lazy::LazySequence;
pub use list::List;
pub use numeric::{Comparison, Number, parse_float, parse_integer, parse_ratio};
pub use object::Object;
pub use promise::Promise;
pub use resolve::ResolveOnce;
pub use sequence::{
    Appender, Counted, Indexed, Pair, Prepender, Reverser, Sequence, Split, append, car, cdr,
    count, element_at, first, is_empty, prepend, rest, reverse, split, to_vec,
};
pub use string::Str;
pub use symbol::{Keyword, Symbol};
pub use value::{Type, Value};
pub use vector::Vector;
