use tokio::runtime::Handle;

use crate::constants::DEFAULT_MAX_LISTENERS;

/// How `emit_sync` reacts to a failing handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failure; later handlers in the batch are skipped.
    #[default]
    FailFast,
    /// Run every handler, then report all failures together.
    ContinueOnError,
}

/// Settings for an [`EventEmitter`](crate::EventEmitter).
///
/// # Example
/// ```
/// use rs_topics::{EmitterConfig, ErrorPolicy};
///
/// let config = EmitterConfig::default()
///     .with_max_listeners(8)
///     .with_error_policy(ErrorPolicy::ContinueOnError);
/// assert_eq!(config.max_listeners, 8);
/// ```
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Per-topic listener cap. `0` means unlimited.
    pub max_listeners: usize,
    pub error_policy: ErrorPolicy,
    /// Runtime `emit` spawns handlers on. Falls back to the ambient runtime,
    /// then to one OS thread per handler.
    pub runtime: Option<Handle>,
}

impl Default for EmitterConfig {
    /// Provides a default configuration:
    /// - `max_listeners = 0` (unlimited)
    /// - `error_policy = ErrorPolicy::FailFast`
    /// - `runtime = None` (ambient runtime, else one thread per handler)
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            error_policy: ErrorPolicy::default(),
            runtime: None,
        }
    }
}

impl EmitterConfig {
    pub fn with_max_listeners(mut self, max: usize) -> Self {
        self.max_listeners = max;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Spawns `emit` handlers on `handle`'s blocking pool.
    ///
    /// If that runtime has already shut down, each refused handler runs on its own
    /// OS thread instead and a warning is logged.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub(crate) fn is_full(&self, count: usize) -> bool {
        self.max_listeners > 0 && count >= self.max_listeners
    }
}
