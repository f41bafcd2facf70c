//! # Rust Topics Crate
//!
//! This crate provides an in-process, topic-based event emitter with typed handler signatures.
//!
//! - **EventEmitter**: Owns the topics and dispatches emitted arguments to their handlers.
//! - **EventHandler**: Trait defining the emitter API (`on`, `once`, `emit`, `emit_sync`).
//! - **Handler**: A callable with a declared parameter signature.
//! - **Value** / **Kind**: Dynamically kinded arguments and their semantic kinds.
//!
//! The first handler registered under a topic fixes that topic's [`Signature`]. Later
//! handlers and every emitted argument list must match it, kind by kind.
//!
//! `emit_sync` runs handlers on the calling thread in registration order. `emit` spawns each
//! handler detached (on the tokio blocking pool when a runtime is available) and returns at once.

mod args;
mod config;
mod constants;
mod error;
mod event_emitter;
mod event_handler;
mod handler;
mod listener;
mod signature;
mod value;

pub use args::IntoArgs;
pub use config::{EmitterConfig, ErrorPolicy};
pub use constants::{BoxError, HandlerFn, HandlerResult, DEFAULT_MAX_LISTENERS};
pub use error::{ConversionError, EmitterError, HandlerFailure, NotCallable};
pub use event_emitter::EventEmitter;
pub use event_handler::EventHandler;
pub use handler::{Handler, HandlerOutput, IntoHandler};
pub use signature::Signature;
pub use value::{Arg, Kind, Value};

#[cfg(test)]
mod tests;
