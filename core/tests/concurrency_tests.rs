use ale::{Error, ErrorKind, LazySequence, Promise, Value, channel, sequence};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Route kernel events to the test output; set RUST_LOG=ale=trace to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ale=warn".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

#[test]
fn test_values_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
    assert_send_sync::<LazySequence>();
    assert_send_sync::<Promise>();
    assert_send_sync::<ale::Emitter>();
}

#[test]
fn test_lazy_resolves_once_under_contention() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let lazy = {
        let calls = Arc::clone(&calls);
        LazySequence::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(10));
            Ok((Value::from(42), Value::Lazy(LazySequence::empty()), true))
        })
    };

    let barrier = Arc::new(Barrier::new(50));
    let handles: Vec<_> = (0..50)
        .map(|_| {
            let lazy = lazy.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lazy.split().unwrap().0
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::from(42));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_promise_first_delivery_wins() {
    init_tracing();
    let promise = Promise::new();
    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let promise = promise.clone();
            thread::spawn(move || promise.resolve().unwrap())
        })
        .collect();

    promise.deliver(Value::from("first")).unwrap();
    let err = promise.deliver(Value::from("second")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyDelivered);

    for waiter in waiters {
        assert_eq!(waiter.join().unwrap(), Value::from("first"));
    }
}

#[test]
fn test_promise_producer_runs_once_under_contention() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let promise = {
        let calls = Arc::clone(&calls);
        Promise::with_producer(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(10));
            Ok(Value::from("computed"))
        })
    };

    let barrier = Arc::new(Barrier::new(50));
    let handles: Vec<_> = (0..50)
        .map(|_| {
            let promise = promise.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                promise.resolve().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::from("computed"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(promise.is_resolved());
}

#[test]
fn test_promise_producer_failure_reraised() {
    let promise = Promise::with_producer(|| Err(Error::raised(Value::from("nope"))));
    for _ in 0..3 {
        let err = promise.resolve().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Raised);
        assert_eq!(err.raised_value(), Some(&Value::from("nope")));
    }
    assert_eq!(
        promise.deliver(Value::Null).unwrap_err().kind,
        ErrorKind::AlreadyDelivered
    );
}

#[test]
fn test_rendezvous_channel() {
    init_tracing();
    let (emitter, seq) = channel(0);
    let written = Arc::new(AtomicBool::new(false));

    let writer = {
        let written = Arc::clone(&written);
        thread::spawn(move || {
            emitter.write(Value::from(1)).unwrap();
            written.store(true, Ordering::SeqCst);
            emitter.close();
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!written.load(Ordering::SeqCst), "write must wait for a reader");

    let (first, rest, more) = seq.as_lazy().split().unwrap();
    assert!(more);
    assert_eq!(first, Value::from(1));

    writer.join().unwrap();
    assert!(written.load(Ordering::SeqCst));

    let (first, _, more) = sequence::split(&rest).unwrap();
    assert!(!more);
    assert_eq!(first, Value::Null);
}

#[test]
fn test_channel_preserves_write_order() {
    let (emitter, seq) = channel(4);
    let writer = thread::spawn(move || {
        for n in 0..100i64 {
            emitter.write(Value::from(n)).unwrap();
        }
    });
    let items = sequence::to_vec(&seq.into_value()).unwrap();
    writer.join().unwrap();
    let expected: Vec<Value> = (0..100i64).map(Value::from).collect();
    assert_eq!(items, expected);
}

#[test]
fn test_channel_readers_share_realized_prefix() {
    let (emitter, seq) = channel(3);
    for n in 1..=3i64 {
        emitter.write(Value::from(n)).unwrap();
    }
    drop(emitter);

    let value = seq.into_value();
    let a = sequence::to_vec(&value).unwrap();
    let b = sequence::to_vec(&value).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
}

#[test]
fn test_channel_error_reaches_reader() {
    init_tracing();
    let (emitter, seq) = channel(1);
    let writer = thread::spawn(move || {
        emitter.write(Value::from("ok")).unwrap();
        emitter.error(Error::raised(Value::from("broken"))).unwrap();
    });
    let results: Vec<_> = sequence::iter(&seq.into_value()).unwrap().collect();
    writer.join().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &Value::from("ok"));
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.raised_value(), Some(&Value::from("broken")));
}

#[test]
fn test_double_close_is_noop() {
    let (emitter, seq) = channel(1);
    emitter.close();
    emitter.close();
    assert!(emitter.is_closed());
    assert!(sequence::is_empty(&seq.into_value()).unwrap());
}

#[test]
fn test_dropped_reader_releases_writer() {
    init_tracing();
    let (emitter, seq) = channel(0);
    let writer = thread::spawn(move || emitter.write(Value::from(1)));
    thread::sleep(Duration::from_millis(20));
    drop(seq);
    let err = writer.join().unwrap().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ChannelClosed);
}
