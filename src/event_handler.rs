use crate::{EmitterError, IntoArgs, IntoHandler, Signature};

/// Defines the contract for topic-based emitters with typed handler signatures.
///
/// Every topic owns one fixed signature, taken from its first handler. Later
/// handlers and every emitted argument list are checked against it.
///
/// All methods take `&self` so handlers may capture the emitter and register or
/// emit from inside a callback.
///
/// # Thread Safety
/// All implementors must be `Send + Sync`.
pub trait EventHandler: Send + Sync {
    /// Gets the names of every topic that has ever had a handler registered.
    fn topics(&self) -> Vec<String>;

    /// Gets the number of handlers currently registered to a topic.
    ///
    /// # Returns
    /// * `Some(n)` for a known topic, including `Some(0)` once all its once-handlers fired.
    /// * `None` if nothing was ever registered under `topic`.
    fn listener_count(&self, topic: &str) -> Option<usize>;

    /// Returns `true` if the topic has at least one handler left.
    fn has_listener(&self, topic: &str) -> bool {
        self.listener_count(topic).is_some_and(|count| count > 0)
    }

    /// Gets the fixed signature of a topic, if it has one.
    fn signature(&self, topic: &str) -> Option<Signature>;

    /// Registers a handler that fires on every emit of `topic`.
    ///
    /// # Returns
    /// * `Ok(())` if the handler was appended.
    /// * `Err(EmitterError::InvalidHandlerKind)` if `handler` is not callable.
    /// * `Err(EmitterError::ArityMismatch)` / `Err(EmitterError::TypeMismatch)` if it does not match the topic's signature.
    /// * `Err(EmitterError::OverloadedTopic)` if the topic is at its listener cap.
    fn on<M>(&self, topic: &str, handler: impl IntoHandler<M>) -> Result<(), EmitterError>;

    /// Registers a handler that fires on the next emit of `topic` only.
    ///
    /// Fails exactly like [`EventHandler::on`].
    fn once<M>(&self, topic: &str, handler: impl IntoHandler<M>) -> Result<(), EmitterError>;

    /// Emits `topic`, spawning every handler detached and returning immediately.
    ///
    /// Handler failures are not reported to the caller.
    ///
    /// A `Vec<Value>` passed as `args` is the whole argument list; a single `list`
    /// argument is written `(vec![..],)`.
    ///
    /// # Returns
    /// * `Ok(())` once all handlers were scheduled, or if `topic` has no handlers.
    /// * `Err(EmitterError::ArgumentCountMismatch)` / `Err(EmitterError::ArgumentTypeMismatch)` if `args` do not match the signature.
    fn emit(&self, topic: &str, args: impl IntoArgs) -> Result<(), EmitterError>;

    /// Emits `topic`, running every handler on the calling thread in registration order.
    ///
    /// # Returns
    /// * `Ok(())` after every handler returned successfully, or if `topic` has no handlers.
    /// * The same argument errors as [`EventHandler::emit`].
    /// * `Err(EmitterError::Handler)` / `Err(EmitterError::HandlersFailed)` per the configured error policy.
    fn emit_sync(&self, topic: &str, args: impl IntoArgs) -> Result<(), EmitterError>;
}
