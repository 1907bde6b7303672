use ale::{LazySequence, List, Number, Object, Symbol, Value, Vector, sequence};
use codspeed_criterion_compat::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

// ============================================================================
// Collection Benchmarks
// ============================================================================

fn bench_list_prepend(c: &mut Criterion) {
    c.bench_function("list prepend 1000", |b| {
        b.iter(|| {
            let mut list = List::empty();
            for i in 0..1000i64 {
                list = list.prepend(Value::from(i));
            }
            black_box(list)
        })
    });
}

fn bench_vector_append(c: &mut Criterion) {
    c.bench_function("vector append 100", |b| {
        b.iter(|| {
            let mut vector = Vector::empty();
            for i in 0..100i64 {
                vector = vector.append(Value::from(i));
            }
            black_box(vector)
        })
    });
}

fn bench_object_chain_lookup(c: &mut Criterion) {
    let key = Value::Keyword(ale::Keyword::new("root"));
    let mut obj = Object::from_pairs([(key.clone(), Value::from(1))]);
    for i in 0..20i64 {
        obj = obj.extend([(Value::from(i), Value::from(i))]);
    }
    c.bench_function("object lookup through 20 prototypes", |b| {
        b.iter(|| black_box(obj.get(&key)))
    });
}

fn bench_lazy_walk(c: &mut Criterion) {
    c.bench_function("lazy sequence walk 1000", |b| {
        b.iter(|| {
            let lazy = LazySequence::from_iter((0..1000i64).map(Value::from));
            black_box(sequence::to_vec(&Value::Lazy(lazy)).unwrap())
        })
    });
}

// ============================================================================
// Numeric Benchmarks
// ============================================================================

fn bench_integer_add(c: &mut Criterion) {
    let a = Number::Integer(12345);
    let b_num = Number::Integer(67890);
    c.bench_function("integer add", |b| b.iter(|| black_box(a.add(&b_num))));
}

fn bench_mixed_add(c: &mut Criterion) {
    let a = Number::Integer(20);
    let b_num = Number::Float(0.5);
    c.bench_function("integer + float add", |b| b.iter(|| black_box(a.add(&b_num))));
}

fn bench_overflow_add(c: &mut Criterion) {
    let a = Number::Integer(i64::MAX);
    let b_num = Number::Integer(1);
    c.bench_function("overflowing add", |b| b.iter(|| black_box(a.add(&b_num))));
}

// ============================================================================
// Hashing and Interning Benchmarks
// ============================================================================

fn bench_hash_vector(c: &mut Criterion) {
    let vector = Value::Vector(Vector::of((0..100i64).map(Value::from)));
    c.bench_function("hash vector of 100", |b| {
        b.iter(|| black_box(vector.hash_code()))
    });
}

fn bench_intern_symbol(c: &mut Criterion) {
    c.bench_function("intern existing symbol", |b| {
        b.iter(|| black_box(Symbol::intern_local("benchmark-symbol")))
    });
}

criterion_group!(
    name = collection_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(5));
    targets =
        bench_list_prepend,
        bench_vector_append,
        bench_object_chain_lookup,
        bench_lazy_walk
);

criterion_group!(
    numeric_benches,
    bench_integer_add,
    bench_mixed_add,
    bench_overflow_add
);

criterion_group!(hash_benches, bench_hash_vector, bench_intern_symbol);

criterion_main!(collection_benches, numeric_benches, hash_benches);
