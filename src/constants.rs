use std::sync::Arc;

use crate::Value;

/// Error type a handler may fail with.
///
/// Any `std::error::Error + Send + Sync` converts into it, as do `&str` and `String`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), BoxError>;

/// Type-erased handler body, invoked with an already validated argument list.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_topics::{HandlerFn, HandlerResult, Value};
///
/// let body: HandlerFn = Arc::new(|args: &[Value]| -> HandlerResult {
///     println!("called with {} args", args.len());
///     Ok(())
/// });
/// ```
pub type HandlerFn = Arc<dyn Fn(&[Value]) -> HandlerResult + Send + Sync>;

/// Default per-topic listener cap. `0` means unlimited.
pub const DEFAULT_MAX_LISTENERS: usize = 0;

/// Name prefix for OS threads spawned by `emit` when no tokio runtime is available.
pub(crate) const HANDLER_THREAD_PREFIX: &str = "rs-topics-handler";
