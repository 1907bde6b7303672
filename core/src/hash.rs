//! Process-wide salted hashing.
//!
//! Every value produces a 64-bit hash code. Containers fold their elements'
//! hashes into a per-type salt drawn at random when the process first hashes
//! a container, so two different container types holding the same elements
//! do not collide. Hash codes are not stable across process restarts and
//! must never be persisted.

use std::hash::Hasher;

use once_cell::sync::Lazy;
use rustc_hash::FxHasher;
use tracing::debug;

/// Per-type salts, generated once per process.
pub(crate) struct Salts {
    pub list: u64,
    pub vector: u64,
    pub object: u64,
    pub associative: u64,
    pub deque: u64,
    pub cons: u64,
    pub bytes: u64,
}

static SALTS: Lazy<Salts> = Lazy::new(|| {
    let salts = Salts {
        list: rand::random(),
        vector: rand::random(),
        object: rand::random(),
        associative: rand::random(),
        deque: rand::random(),
        cons: rand::random(),
        bytes: rand::random(),
    };
    debug!("generated container hash salts");
    salts
});

pub(crate) fn salts() -> &'static Salts {
    &SALTS
}

pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.finish()
}

pub fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}

/// Mix an element hash with its position, for order-sensitive containers.
/// Plain XOR of the index would cancel out when two elements swap places.
pub(crate) fn positional(hash: u64, index: usize) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_usize(index);
    hasher.write_u64(hash);
    hasher.finish()
}

/// Fold element hashes into `salt` without regard to order.
pub(crate) fn unordered<I>(salt: u64, hashes: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    hashes.into_iter().fold(salt, |acc, h| acc ^ h)
}

/// Fold element hashes into `salt`, mixing in each element's index.
pub(crate) fn ordered<I>(salt: u64, hashes: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    hashes
        .into_iter()
        .enumerate()
        .fold(salt, |acc, (i, h)| acc ^ positional(h, i))
}

/// Hash of a key/value entry, asymmetric so that `{a b}` and `{b a}` differ.
pub(crate) fn entry(key: u64, value: u64) -> u64 {
    key ^ value.rotate_left(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_str_is_deterministic() {
        assert_eq!(hash_str("hello"), hash_str("hello"));
        assert_ne!(hash_str("hello"), hash_str("world"));
    }

    #[test]
    fn test_ordered_depends_on_position() {
        let a = hash_str("a");
        let b = hash_str("b");
        assert_ne!(ordered(0, [a, b]), ordered(0, [b, a]));
    }

    #[test]
    fn test_unordered_ignores_position() {
        let a = hash_str("a");
        let b = hash_str("b");
        assert_eq!(unordered(7, [a, b]), unordered(7, [b, a]));
    }

    #[test]
    fn test_salts_are_stable_within_process() {
        assert_eq!(salts().list, salts().list);
    }
}
