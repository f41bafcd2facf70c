use std::fmt::{Debug, Formatter};

use parking_lot::Mutex;

use crate::{Handler, Signature};

/// A registered handler together with its once flag.
#[derive(Clone)]
pub(crate) struct Listener {
    handler: Handler,
    once: bool,
}

impl Listener {
    pub(crate) fn new(handler: Handler, once: bool) -> Self {
        Self { handler, once }
    }

    #[inline]
    pub(crate) fn is_once(&self) -> bool {
        self.once
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("params", self.handler.params())
            .field("once", &self.once)
            .finish()
    }
}

/// Per-topic record: the fixed signature and the ordered listener list.
///
/// The list lock is only held for bookkeeping, never while a handler runs.
#[derive(Debug)]
pub(crate) struct Topic {
    signature: Signature,
    listeners: Mutex<Vec<Listener>>,
}

impl Topic {
    pub(crate) fn new(signature: Signature) -> Self {
        Self {
            signature,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Appends `listener` unless the list already holds `is_full` entries.
    /// Returns the new length, or `None` if the topic is full.
    pub(crate) fn push(&self, listener: Listener, is_full: impl Fn(usize) -> bool) -> Option<usize> {
        let mut listeners = self.listeners.lock();
        if is_full(listeners.len()) {
            return None;
        }
        listeners.push(listener);
        Some(listeners.len())
    }

    /// Snapshots the handlers to fire, in registration order, and drops every
    /// once listener in the same critical section.
    pub(crate) fn take_batch(&self) -> Vec<Handler> {
        let mut listeners = self.listeners.lock();
        let batch = listeners.iter().map(|l| l.handler.clone()).collect();
        listeners.retain(|l| !l.is_once());
        batch
    }
}
