//! Property-based tests for hash/equality consistency.
//!
//! If two values are equal their hash codes must agree, so that values can
//! serve as keys in hashed collections.

use ale::{Associative, Cons, Deque, Keyword, List, Number, Object, Str, Symbol, Value, Vector};
use num_bigint::BigInt;
use proptest::prelude::*;

fn assert_hash_eq_consistent(a: &Value, b: &Value) {
    assert_eq!(a, b, "values should be equal");
    assert_eq!(a.hash_code(), b.hash_code(), "hashes should be equal");
}

/// Scalar values with a small domain, so that collisions between
/// independently generated values are common.
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-20i64..20).prop_map(Value::from),
        (-20i64..20).prop_map(|n| Value::from(Number::from(BigInt::from(n)))),
        (-4.0f64..4.0).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(|s| Value::String(Str::from(s))),
        "[a-c]{1,2}".prop_map(|s| Value::Keyword(Keyword::new(&s))),
        "[a-c]{1,2}".prop_map(|s| Value::Symbol(Symbol::intern_local(&s))),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|v| Value::List(List::of(v))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|v| Value::Vector(Vector::of(v))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|v| Value::Deque(Deque::of(v))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Value::Cons(Cons::new(a, b))),
            prop::collection::vec((inner.clone(), inner.clone()), 0..3)
                .prop_map(|pairs| Value::Associative(Associative::from_pairs(pairs))),
            prop::collection::vec((scalar(), inner), 0..3)
                .prop_map(|pairs| Value::Object(Object::from_pairs(pairs))),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn clone_is_equal_with_equal_hash(v in value()) {
        assert_hash_eq_consistent(&v, &v.clone());
    }

    #[test]
    fn equal_values_hash_equal(a in value(), b in value()) {
        if a == b {
            prop_assert_eq!(a.hash_code(), b.hash_code());
        }
    }

    #[test]
    fn integer_and_bigint_agree(n in any::<i64>()) {
        let small = Value::from(n);
        let wide = Value::from(Number::from(BigInt::from(n)));
        assert_hash_eq_consistent(&small, &wide);
    }

    #[test]
    fn rebuilt_list_is_equal(items in prop::collection::vec(scalar(), 0..8)) {
        let a = Value::List(List::of(items.clone()));
        let b = Value::List(List::of(items.iter().rev().cloned().collect::<Vec<_>>()).reverse());
        assert_hash_eq_consistent(&a, &b);
    }

    #[test]
    fn deque_layout_does_not_matter(items in prop::collection::vec(scalar(), 0..8)) {
        let front = Value::Deque(Deque::of(items.clone()));
        let back = Value::Deque(items.iter().cloned().fold(Deque::empty(), |d, v| d.append(v)));
        assert_hash_eq_consistent(&front, &back);
    }

    #[test]
    fn object_put_order_does_not_matter(keys in prop::collection::hash_set("[a-e]", 0..5)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let kw = |k: &String| Value::Keyword(Keyword::new(k));
        let forward = keys.iter().fold(Object::new(), |o, k| o.put(kw(k), Value::from(1)));
        let backward = keys.iter().rev().fold(Object::new(), |o, k| o.put(kw(k), Value::from(1)));
        assert_hash_eq_consistent(&Value::Object(forward), &Value::Object(backward));
    }

    #[test]
    fn prepend_rest_shares_structure(items in prop::collection::vec(scalar(), 0..8), v in scalar()) {
        let list = List::of(items);
        let longer = list.prepend(v);
        prop_assert!(longer.rest().ptr_eq(&list));
        prop_assert_eq!(longer.rest(), list);
    }
}

#[test]
fn test_vector_swap_changes_hash() {
    let ab = Value::Vector(Vector::of([Value::from("a"), Value::from("b")]));
    let ba = Value::Vector(Vector::of([Value::from("b"), Value::from("a")]));
    assert_ne!(ab, ba);
    assert_ne!(ab.hash_code(), ba.hash_code());
}

#[test]
fn test_nan_keys_hash_consistently() {
    let a = Value::from(f64::NAN);
    let b = Value::from(f64::NAN);
    assert_hash_eq_consistent(&a, &b);
}
