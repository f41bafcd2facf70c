use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, error, info, trace, warn};

use crate::constants::HANDLER_THREAD_PREFIX;
use crate::listener::{Listener, Topic};
use crate::{
    EmitterConfig, EmitterError, ErrorPolicy, EventHandler, Handler, HandlerFailure, IntoArgs,
    IntoHandler, Signature, Value,
};

/// A topic-based event emitter with per-topic handler signatures.
///
/// Topics are stored in a `DashMap`, whose shard locks cover structural
/// changes. Each topic guards its own listener list with a separate mutex.
/// Neither lock is held while a handler runs, so handlers may re-enter the
/// emitter. Clones share the same topics.
///
/// # Example
/// ```
/// use rs_topics::{EventEmitter, EventHandler};
///
/// let emitter = EventEmitter::new();
/// emitter.on("ready", |name: String, value: u64| println!("{name} = {value}")).unwrap();
/// emitter.emit_sync("ready", ("answer", 42u64)).unwrap();
/// ```
#[derive(Clone, Default)]
pub struct EventEmitter {
    config: Arc<EmitterConfig>,
    topics: Arc<DashMap<String, Arc<Topic>>>,
}

/// The handlers picked for one emit, plus their shared arguments.
struct Batch {
    handlers: Vec<Handler>,
    args: Arc<[Value]>,
}

impl EventEmitter {
    /// Creates an emitter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter from an explicit configuration.
    ///
    /// # Example
    /// ```
    /// use rs_topics::{EmitterConfig, EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::with_config(EmitterConfig::default().with_max_listeners(1));
    /// emitter.on("tick", || {}).unwrap();
    /// assert!(emitter.on("tick", || {}).is_err());
    /// ```
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            config: Arc::new(config),
            topics: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn register<M>(
        &self,
        topic: &str,
        handler: impl IntoHandler<M>,
        once: bool,
    ) -> Result<(), EmitterError> {
        let handler = handler
            .into_handler()
            .map_err(|not_callable| EmitterError::InvalidHandlerKind {
                topic: topic.to_owned(),
                kind: not_callable.0,
            })?;

        // The first handler for a topic fixes its signature.
        let entry = Arc::clone(
            self.topics
                .entry(topic.to_owned())
                .or_insert_with(|| {
                    debug!(topic, signature = %handler.params(), "topic created");
                    Arc::new(Topic::new(handler.params().clone()))
                })
                .value(),
        );
        entry.signature().check_handler(topic, handler.params())?;

        let count = entry
            .push(Listener::new(handler, once), |len| self.config.is_full(len))
            .ok_or_else(|| EmitterError::OverloadedTopic {
                topic: topic.to_owned(),
                max: self.config.max_listeners,
            })?;
        debug!(topic, once, count, "handler registered");
        Ok(())
    }

    /// Validates `args` and takes the batch to fire. `None` means there is nothing to run.
    fn prepare(&self, topic: &str, args: Vec<Value>) -> Result<Option<Batch>, EmitterError> {
        let Some(entry) = self.topics.get(topic).map(|entry| Arc::clone(entry.value())) else {
            info!(topic, "no listeners registered for topic, skipping emit");
            return Ok(None);
        };
        entry.signature().check_args(topic, &args)?;

        let handlers = entry.take_batch();
        if handlers.is_empty() {
            debug!(topic, "all listeners consumed, nothing to fire");
            return Ok(None);
        }
        trace!(topic, handlers = handlers.len(), args = args.len(), "dispatching");
        Ok(Some(Batch {
            handlers,
            args: Arc::from(args),
        }))
    }
}

/// Runs `job` detached: on the runtime's blocking pool if there is one, else on
/// a fresh OS thread.
///
/// A runtime that has shut down cancels the task before it starts. The job is
/// then still in its slot and moves to a thread instead.
fn spawn_detached<J>(runtime: Option<&Handle>, topic: &str, index: usize, job: J)
where
    J: FnOnce() + Send + 'static,
{
    let Some(handle) = runtime else {
        spawn_thread(topic, index, job);
        return;
    };

    let slot = Arc::new(Mutex::new(Some(job)));
    let task_slot = Arc::clone(&slot);
    let task = handle.spawn_blocking(move || {
        let job = task_slot.lock().take();
        if let Some(job) = job {
            job();
        }
    });
    if task.is_finished() {
        let refused = slot.lock().take();
        if let Some(job) = refused {
            warn!(topic, index, "runtime refused handler, falling back to a thread");
            spawn_thread(topic, index, job);
        }
    }
    // The join handle is dropped; nothing awaits detached handlers.
}

fn spawn_thread(topic: &str, index: usize, job: impl FnOnce() + Send + 'static) {
    let spawned = std::thread::Builder::new()
        .name(format!("{HANDLER_THREAD_PREFIX}-{index}"))
        .spawn(job);
    if let Err(err) = spawned {
        error!(topic, index, error = %err, "failed to spawn handler thread");
    }
}

impl EventHandler for EventEmitter {
    /// Returns every topic that has ever had a handler registered.
    ///
    /// # Example
    /// ```
    /// use rs_topics::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::new();
    /// emitter.on("one", || {}).unwrap();
    /// emitter.once("two", || {}).unwrap();
    ///
    /// let topics = emitter.topics();
    /// assert_eq!(topics.len(), 2);
    /// assert!(topics.contains(&"one".to_string()));
    /// ```
    fn topics(&self) -> Vec<String> {
        self.topics.iter().map(|entry| entry.key().clone()).collect()
    }

    fn listener_count(&self, topic: &str) -> Option<usize> {
        self.topics.get(topic).map(|entry| entry.len())
    }

    /// # Example
    /// ```
    /// use rs_topics::{EventEmitter, EventHandler, Kind};
    ///
    /// let emitter = EventEmitter::new();
    /// emitter.on("ready", |_: u64| {}).unwrap();
    /// let signature = emitter.signature("ready").unwrap();
    /// assert_eq!(signature.kinds(), &[Kind::U64]);
    /// ```
    fn signature(&self, topic: &str) -> Option<Signature> {
        self.topics.get(topic).map(|entry| entry.signature().clone())
    }

    /// # Example
    /// ```
    /// use rs_topics::{EmitterError, EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::new();
    /// emitter.on("ready", |_: String, _: u64| {}).unwrap();
    ///
    /// let err = emitter.on("ready", |_: String| {}).unwrap_err();
    /// assert!(matches!(err, EmitterError::ArityMismatch { expected: 2, actual: 1, .. }));
    /// assert_eq!(emitter.listener_count("ready"), Some(1));
    /// ```
    fn on<M>(&self, topic: &str, handler: impl IntoHandler<M>) -> Result<(), EmitterError> {
        self.register(topic, handler, false)
    }

    /// # Example
    /// ```
    /// use rs_topics::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::new();
    /// emitter.once("ready", |_: u64| {}).unwrap();
    /// emitter.emit_sync("ready", (1u64,)).unwrap();
    /// assert_eq!(emitter.listener_count("ready"), Some(0));
    /// ```
    fn once<M>(&self, topic: &str, handler: impl IntoHandler<M>) -> Result<(), EmitterError> {
        self.register(topic, handler, true)
    }

    /// # Example
    /// ```
    /// use std::sync::mpsc;
    /// use std::sync::Mutex;
    /// use rs_topics::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::new();
    /// let (tx, rx) = mpsc::channel();
    /// let tx = Mutex::new(tx);
    /// emitter.on("ready", move |value: u64| {
    ///     let _ = tx.lock().unwrap().send(value);
    /// }).unwrap();
    ///
    /// emitter.emit("ready", (7u64,)).unwrap();
    /// assert_eq!(rx.recv().unwrap(), 7);
    /// ```
    fn emit(&self, topic: &str, args: impl IntoArgs) -> Result<(), EmitterError> {
        let Some(batch) = self.prepare(topic, args.into_args())? else {
            return Ok(());
        };
        let runtime = self.config.runtime.clone().or_else(|| Handle::try_current().ok());

        for (index, handler) in batch.handlers.into_iter().enumerate() {
            let args = Arc::clone(&batch.args);
            let owned_topic = topic.to_owned();
            spawn_detached(runtime.as_ref(), topic, index, move || {
                if let Err(err) = handler.call(&args) {
                    warn!(topic = %owned_topic, index, error = %err, "detached handler failed");
                }
            });
        }
        Ok(())
    }

    /// # Example
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use rs_topics::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::new();
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// for name in ["a", "b", "c"] {
    ///     let log = Arc::clone(&log);
    ///     emitter.on("ready", move |v: u64| log.lock().unwrap().push(format!("{name}:{v}"))).unwrap();
    /// }
    ///
    /// emitter.emit_sync("ready", (1u64,)).unwrap();
    /// assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "c:1"]);
    /// ```
    fn emit_sync(&self, topic: &str, args: impl IntoArgs) -> Result<(), EmitterError> {
        let Some(batch) = self.prepare(topic, args.into_args())? else {
            return Ok(());
        };

        match self.config.error_policy {
            ErrorPolicy::FailFast => {
                for (index, handler) in batch.handlers.iter().enumerate() {
                    handler
                        .call(&batch.args)
                        .map_err(|source| EmitterError::Handler {
                            topic: topic.to_owned(),
                            index,
                            source,
                        })?;
                }
                Ok(())
            }
            ErrorPolicy::ContinueOnError => {
                let failures: Vec<HandlerFailure> = batch
                    .handlers
                    .iter()
                    .enumerate()
                    .filter_map(|(index, handler)| {
                        handler
                            .call(&batch.args)
                            .err()
                            .map(|source| HandlerFailure { index, source })
                    })
                    .collect();
                if failures.is_empty() {
                    return Ok(());
                }
                Err(EmitterError::HandlersFailed {
                    topic: topic.to_owned(),
                    failures,
                })
            }
        }
    }
}
