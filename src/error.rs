use thiserror::Error;

use crate::{BoxError, Kind};

/// Errors that can occur while registering handlers or emitting topics.
///
/// Registration errors leave the emitter untouched. Argument errors are raised
/// before any handler runs. Handler errors only surface from `emit_sync`.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// Registering:
    /// - The value passed as a handler is not callable.
    #[error("T[{topic}] expected handler of kind func, got {kind}")]
    InvalidHandlerKind { topic: String, kind: Kind },

    /// Registering:
    /// - The handler's parameter count differs from the topic's signature.
    #[error("T[{topic}] new handler wrong argument count. Expected {expected}; got {actual}")]
    ArityMismatch {
        topic: String,
        expected: usize,
        actual: usize,
    },

    /// Registering:
    /// - The handler's parameter kind at `position` differs from the topic's signature.
    #[error("T[{topic}] new handler invalid argument at position {position}. Expected {expected}; got {actual}")]
    TypeMismatch {
        topic: String,
        position: usize,
        expected: Kind,
        actual: Kind,
    },

    /// Registering:
    /// - The topic already holds `max` listeners.
    #[error("T[{topic}] already has the maximum of {max} listeners")]
    OverloadedTopic { topic: String, max: usize },

    /// Emitting:
    /// - The number of arguments differs from the topic's signature.
    #[error("T[{topic}] has {expected} input args; got {actual}")]
    ArgumentCountMismatch {
        topic: String,
        expected: usize,
        actual: usize,
    },

    /// Emitting:
    /// - The argument kind at `position` differs from the topic's signature.
    #[error("T[{topic}] invalid argument at position {position}. Expected {expected}; got {actual}")]
    ArgumentTypeMismatch {
        topic: String,
        position: usize,
        expected: Kind,
        actual: Kind,
    },

    /// Synchronous emit, fail-fast:
    /// - The handler at `index` of the batch failed; later handlers were skipped.
    #[error("T[{topic}] handler {index} failed: {source}")]
    Handler {
        topic: String,
        index: usize,
        #[source]
        source: BoxError,
    },

    /// Synchronous emit, continue-on-error:
    /// - Every handler ran; these ones failed.
    #[error("T[{topic}] {} handler(s) failed", .failures.len())]
    HandlersFailed {
        topic: String,
        failures: Vec<HandlerFailure>,
    },
}

/// A single failed invocation collected under [`ErrorPolicy::ContinueOnError`](crate::ErrorPolicy::ContinueOnError).
#[derive(Debug)]
pub struct HandlerFailure {
    pub index: usize,
    pub source: BoxError,
}

/// Raised inside a typed handler when an argument of the right kind holds a
/// different concrete type. Only opaque arguments can trigger it.
#[derive(Debug, Error)]
#[error("argument at position {position} is not a {expected}")]
pub struct ConversionError {
    pub position: usize,
    pub expected: &'static str,
}

/// Returned by [`IntoHandler`](crate::IntoHandler) when the value is not callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotCallable(pub Kind);
