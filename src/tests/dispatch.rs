use crate::{
    BoxError, EmitterConfig, EmitterError, ErrorPolicy, EventEmitter, EventHandler, Kind, Value,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Helper: create a shared call-log that handlers append to.
fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Emitting to a topic nobody listens on is a no-op
#[test]
fn emit_to_unregistered_topic_is_noop() {
    let emitter = EventEmitter::new();
    assert!(emitter.emit_sync("nobody", (1u64,)).is_ok());
    assert!(emitter.emit("nobody", ("any", "shape", 3i32)).is_ok());
    assert!(emitter.topics().is_empty());
}

/// Handlers fire in registration order under emit_sync
#[test]
fn emit_sync_preserves_registration_order() {
    let emitter = EventEmitter::new();
    let log = make_log();
    for name in ["a", "b", "c", "d"] {
        let log = Arc::clone(&log);
        emitter
            .on("ready", move |v: u64| {
                log.lock().unwrap().push(format!("{name}:{v}"))
            })
            .unwrap();
    }

    emitter.emit_sync("ready", (1u64,)).unwrap();
    emitter.emit_sync("ready", (2u64,)).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:1", "b:1", "c:1", "d:1", "a:2", "b:2", "c:2", "d:2"]
    );
}

/// Handlers receive the emitted values in position
#[test]
fn handlers_receive_arguments() {
    let emitter = EventEmitter::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);
    emitter
        .on(
            "user",
            move |name: String, age: u32, admin: bool, score: f64| {
                log_clone
                    .lock()
                    .unwrap()
                    .push(format!("{name}/{age}/{admin}/{score}"));
            },
        )
        .unwrap();

    emitter
        .emit_sync("user", ("ada", 36u32, true, 9.5f64))
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["ada/36/true/9.5"]);
}

/// Wrong argument count is rejected before any handler runs
#[test]
fn argument_count_mismatch() {
    let emitter = EventEmitter::new();
    let called = Arc::new(AtomicBool::new(false));
    let called_clone = Arc::clone(&called);
    emitter
        .on("ready", move |_: String, _: u64| {
            called_clone.store(true, Ordering::SeqCst)
        })
        .unwrap();

    let err = emitter.emit_sync("ready", ("only-one",)).unwrap_err();
    assert!(matches!(
        err,
        EmitterError::ArgumentCountMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
    let err = emitter.emit("ready", ("a", 1u64, 2u64)).unwrap_err();
    assert!(matches!(
        err,
        EmitterError::ArgumentCountMismatch {
            expected: 2,
            actual: 3,
            ..
        }
    ));
    assert!(!called.load(Ordering::SeqCst));
}

/// Wrong argument kind names position, expected and actual kind
#[test]
fn argument_type_mismatch() {
    let emitter = EventEmitter::new();
    let called = Arc::new(AtomicBool::new(false));
    let called_clone = Arc::clone(&called);
    emitter
        .on("ready", move |_: String, _: u64| {
            called_clone.store(true, Ordering::SeqCst)
        })
        .unwrap();

    let err = emitter.emit_sync("ready", ("name", 5i32)).unwrap_err();
    match &err {
        EmitterError::ArgumentTypeMismatch {
            topic,
            position,
            expected,
            actual,
        } => {
            assert_eq!(topic, "ready");
            assert_eq!(*position, 1);
            assert_eq!(*expected, Kind::U64);
            assert_eq!(*actual, Kind::I32);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "T[ready] invalid argument at position 1. Expected u64; got i32"
    );
    assert!(emitter.emit("ready", (5u64, 5u64)).is_err());
    assert!(!called.load(Ordering::SeqCst));
}

/// Prebuilt value lists go through the same validation
#[test]
fn emit_with_value_list() {
    let emitter = EventEmitter::new();
    let total = Arc::new(AtomicU64::new(0));
    let total_clone = Arc::clone(&total);
    emitter
        .on("add", move |a: u64, b: u64| {
            total_clone.fetch_add(a + b, Ordering::SeqCst);
        })
        .unwrap();

    emitter
        .emit_sync("add", vec![Value::U64(2), Value::U64(3)])
        .unwrap();
    assert_eq!(total.load(Ordering::SeqCst), 5);
    assert!(emitter.emit_sync("add", vec![Value::U64(2)]).is_err());
}

/// The counter scenario: five incrementing handlers and one completion check
#[test]
fn ready_counter_scenario() {
    let emitter = EventEmitter::new();
    let counter = Arc::new(AtomicU64::new(1));
    let done = Arc::new(AtomicU64::new(0));

    for _ in 0..5 {
        let counter = Arc::clone(&counter);
        emitter
            .on("ready", move |_: u64| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }
    {
        let counter = Arc::clone(&counter);
        let done = Arc::clone(&done);
        emitter
            .on("ready", move |_: u64| {
                if counter.load(Ordering::SeqCst) > 5 {
                    done.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();
    }

    emitter.emit_sync("ready", (5u64,)).unwrap();
    emitter.emit_sync("ready", (6u64,)).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 11);
    assert!(done.load(Ordering::SeqCst) >= 1);
}

#[cfg(test)]
mod handler_failures {
    use super::*;

    fn register_three(emitter: &EventEmitter, calls: &Arc<Mutex<Vec<usize>>>) {
        for i in 0..3 {
            let calls = Arc::clone(calls);
            emitter
                .on("job", move |_: u64| -> Result<(), BoxError> {
                    calls.lock().unwrap().push(i);
                    if i == 1 {
                        return Err("second handler broke".into());
                    }
                    Ok(())
                })
                .unwrap();
        }
    }

    /// Fail-fast: the third handler is skipped after the second fails
    #[test]
    fn emit_sync_fail_fast() {
        let emitter = EventEmitter::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        register_three(&emitter, &calls);

        let err = emitter.emit_sync("job", (1u64,)).unwrap_err();
        match err {
            EmitterError::Handler { index, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(source.to_string(), "second handler broke");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*calls.lock().unwrap(), vec![0, 1]);

        // Persistent handlers stay registered after a failed batch
        assert_eq!(emitter.listener_count("job"), Some(3));
    }

    /// Continue-on-error: every handler runs and the failures are collected
    #[test]
    fn emit_sync_continue_on_error() {
        let emitter = EventEmitter::with_config(
            EmitterConfig::default().with_error_policy(ErrorPolicy::ContinueOnError),
        );
        let calls = Arc::new(Mutex::new(Vec::new()));
        register_three(&emitter, &calls);

        let err = emitter.emit_sync("job", (1u64,)).unwrap_err();
        match err {
            EmitterError::HandlersFailed { failures, .. } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*calls.lock().unwrap(), vec![0, 1, 2]);
    }

    /// Fail-fast drops once-handlers that were snapshotted but never reached
    #[test]
    fn fail_fast_consumes_skipped_once_handlers() {
        let emitter = EventEmitter::new();
        let fired = Arc::new(AtomicBool::new(false));
        emitter
            .on("job", |_: u64| -> Result<(), BoxError> { Err("boom".into()) })
            .unwrap();
        let fired_clone = Arc::clone(&fired);
        emitter
            .once("job", move |_: u64| fired_clone.store(true, Ordering::SeqCst))
            .unwrap();

        assert!(emitter.emit_sync("job", (1u64,)).is_err());
        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(emitter.listener_count("job"), Some(1));
    }

    /// An opaque argument of the wrong concrete type fails inside the handler
    #[test]
    fn opaque_conversion_failure_is_handler_error() {
        struct Door;
        struct Window;

        let emitter = EventEmitter::new();
        emitter.on("opened", |_: Arc<Door>| {}).unwrap();

        assert!(emitter.emit_sync("opened", (Arc::new(Door),)).is_ok());
        let err = emitter
            .emit_sync("opened", (Arc::new(Window),))
            .unwrap_err();
        match err {
            EmitterError::Handler { index, source, .. } => {
                assert_eq!(index, 0);
                assert!(source.to_string().contains("position 0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
mod reentrancy {
    use super::*;

    /// A handler may emit another topic through a clone of the emitter
    #[test]
    fn handler_emits_other_topic() {
        let emitter = EventEmitter::new();
        let log = make_log();

        let log_clone = Arc::clone(&log);
        emitter
            .on("pong", move |v: u64| log_clone.lock().unwrap().push(format!("pong:{v}")))
            .unwrap();
        let inner = emitter.clone();
        emitter
            .on("ping", move |v: u64| {
                inner.emit_sync("pong", (v + 1,)).unwrap();
            })
            .unwrap();

        emitter.emit_sync("ping", (1u64,)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["pong:2"]);
    }

    /// A handler may register on and re-emit its own topic without deadlocking
    #[test]
    fn handler_registers_and_emits_same_topic() {
        let emitter = EventEmitter::new();
        let count = Arc::new(AtomicU64::new(0));

        let inner = emitter.clone();
        let count_clone = Arc::clone(&count);
        emitter
            .once("grow", move |depth: u64| {
                let count = Arc::clone(&count_clone);
                inner
                    .on("grow", move |_: u64| {
                        count.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
                inner.emit_sync("grow", (depth + 1,)).unwrap();
            })
            .unwrap();

        emitter.emit_sync("grow", (0u64,)).unwrap();
        // The nested emit sees only the handler added inside the callback
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count("grow"), Some(1));
    }
}

/// A list parameter takes its vector wrapped in a one-element tuple
#[test]
fn list_argument_needs_one_tuple() {
    let emitter = EventEmitter::new();
    let total = Arc::new(AtomicU64::new(0));
    let total_clone = Arc::clone(&total);
    emitter
        .on("batch", move |items: Vec<Value>| {
            total_clone.fetch_add(items.len() as u64, Ordering::SeqCst);
        })
        .unwrap();

    let err = emitter
        .emit_sync("batch", vec![Value::U64(1), Value::U64(2)])
        .unwrap_err();
    assert!(matches!(
        err,
        EmitterError::ArgumentCountMismatch {
            expected: 1,
            actual: 2,
            ..
        }
    ));

    emitter
        .emit_sync("batch", (vec![Value::U64(1), Value::U64(2)],))
        .unwrap();
    assert_eq!(total.load(Ordering::SeqCst), 2);
}
