//! Example: five counters and a completion check on a "ready" topic
use rs_topics::{EventEmitter, EventHandler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn main() {
    let emitter = EventEmitter::new();
    let counter = Arc::new(AtomicU64::new(1));

    for _ in 0..5 {
        let counter = Arc::clone(&counter);
        emitter
            .on("ready", move |val: u64| {
                println!("CB: {val}");
                println!("Val of counter: {}", counter.fetch_add(1, Ordering::SeqCst));
            })
            .unwrap();
    }

    let seen = Arc::clone(&counter);
    emitter
        .on("ready", move |_: u64| {
            if seen.load(Ordering::SeqCst) > 5 {
                println!("done");
            }
        })
        .unwrap();

    for val in [5u64, 6] {
        if let Err(err) = emitter.emit_sync("ready", (val,)) {
            println!("Error at emit: {err}");
        }
    }

    // Wrong argument kind is rejected, not dispatched
    if let Err(err) = emitter.emit_sync("ready", ("six",)) {
        println!("Error at emit: {err}");
    }
    println!("Final counter: {}", counter.load(Ordering::SeqCst));
}
