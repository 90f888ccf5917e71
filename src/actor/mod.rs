//! The narrow interface to an external actor runtime.
//!
//! actor-testkit never spawns processes or threads itself; it drives an
//! actor runtime supplied by the host application through the traits in
//! this module:
//!
//! - [`ActorRuntime`] - spawning, messaging, and context lookup
//! - [`ActorHandle`] - an opaque reference to a running actor
//! - [`SpawnRequest`] - an in-flight spawn whose id is readable before
//!   the spawn resolves
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::actor::{ActorRuntime, Concurrency, SpawnOptions};
//! use actor_testkit::mock::MockActorRuntime;
//!
//! let runtime = MockActorRuntime::new();
//! let request = runtime.spawn(Concurrency::Thread, SpawnOptions::default());
//!
//! // The actor id is available before the spawn completes.
//! assert!(!request.aid().is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

mod request;

pub use request::SpawnRequest;

/// Opaque actor identifier.
pub type ActorId = String;

/// The isolation strategy used when spawning an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Concurrency {
    /// Actors run on threads inside the current process.
    #[default]
    Thread,
    /// Actors run in separate OS processes.
    Process,
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concurrency::Thread => write!(f, "thread"),
            Concurrency::Process => write!(f, "process"),
        }
    }
}

/// Configuration carried by a resolved actor handle.
///
/// A freshly spawned actor is expected to resolve with a non-empty
/// configuration; the harness treats an empty one as a failed spawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorConfig {
    concurrency: Concurrency,
    settings: HashMap<String, String>,
}

impl ActorConfig {
    /// Create a configuration for the given concurrency mode, with no
    /// settings yet.
    #[must_use]
    pub fn new(concurrency: Concurrency) -> Self {
        Self {
            concurrency,
            settings: HashMap::new(),
        }
    }

    /// Add a setting (builder style).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Insert a setting.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    /// Look up a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// The concurrency mode this configuration was created with.
    #[must_use]
    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    /// Returns `true` if no settings have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Number of recorded settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }
}

/// The execution context of the current actor, obtained once from the
/// runtime and passed explicitly to whatever needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorContext {
    cfg: ActorConfig,
}

impl ActorContext {
    /// Create a context around the given configuration.
    #[must_use]
    pub fn new(cfg: ActorConfig) -> Self {
        Self { cfg }
    }

    /// The context's configuration.
    #[must_use]
    pub fn cfg(&self) -> &ActorConfig {
        &self.cfg
    }

    /// The concurrency mode the current process was started with.
    #[must_use]
    pub fn concurrency(&self) -> Concurrency {
        self.cfg.concurrency()
    }
}

/// A command sent to a running actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Ask the actor to stop.
    Stop,
    /// Liveness check.
    Ping,
    /// An application-defined message.
    Message(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Stop => write!(f, "stop"),
            Command::Ping => write!(f, "ping"),
            Command::Message(body) => write!(f, "message({body})"),
        }
    }
}

/// The reply to a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// The command was acknowledged with no payload.
    Ack,
    /// The command produced a textual payload.
    Text(String),
}

/// Parameters passed to the runtime when spawning an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    name: Option<String>,
    params: HashMap<String, String>,
}

impl SpawnOptions {
    /// Create empty spawn options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a specific actor name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an arbitrary spawn parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The requested actor name, if any.
    #[must_use]
    pub fn requested_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Look up a spawn parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// An opaque reference to a running actor, usable to send it messages.
///
/// Handles are cheap to clone and comparable; `proxy()` must be
/// reflexive (`handle.proxy() == &handle`), which the harness verifies
/// on every spawn.
pub trait ActorHandle: Clone + PartialEq + Send + Sync + 'static {
    /// The actor's identifier.
    fn aid(&self) -> &str;

    /// The configuration the actor resolved with.
    fn cfg(&self) -> &ActorConfig;

    /// The handle's own proxy reference.
    fn proxy(&self) -> &Self {
        self
    }
}

/// An external actor runtime, consumed by the harness.
///
/// # Dispatch contract
///
/// [`send`](ActorRuntime::send) must issue the request at call time; the
/// returned future resolves when the command is acknowledged. The
/// harness relies on this to dispatch a batch of stop commands before
/// suspending on any of them.
pub trait ActorRuntime: Send + Sync {
    /// The handle type produced by a resolved spawn.
    type Handle: ActorHandle;
    /// The future resolving a spawn into a handle.
    type SpawnFuture: Future<Output = crate::Result<Self::Handle>> + Send;
    /// The future resolving a sent command into its acknowledgment.
    type SendFuture: Future<Output = crate::Result<Response>> + Send;

    /// Request a new actor. The returned [`SpawnRequest`] exposes the
    /// actor id synchronously, before the spawn resolves.
    fn spawn(
        &self,
        concurrency: Concurrency,
        options: SpawnOptions,
    ) -> SpawnRequest<Self::SpawnFuture>;

    /// Send a command to a running actor. The request is issued before
    /// this method returns.
    fn send(&self, handle: &Self::Handle, command: Command) -> Self::SendFuture;

    /// The current actor context, if the runtime has been initialized
    /// in this process.
    fn current(&self) -> Option<ActorContext>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_defaults_to_thread() {
        assert_eq!(Concurrency::default(), Concurrency::Thread);
    }

    #[test]
    fn concurrency_display() {
        assert_eq!(Concurrency::Thread.to_string(), "thread");
        assert_eq!(Concurrency::Process.to_string(), "process");
    }

    #[test]
    fn actor_config_builder() {
        let cfg = ActorConfig::new(Concurrency::Process)
            .with("name", "worker")
            .with("mailbox", "64");

        assert_eq!(cfg.concurrency(), Concurrency::Process);
        assert_eq!(cfg.get("name"), Some("worker"));
        assert_eq!(cfg.len(), 2);
        assert!(!cfg.is_empty());
    }

    #[test]
    fn fresh_actor_config_is_empty() {
        assert!(ActorConfig::new(Concurrency::Thread).is_empty());
    }

    #[test]
    fn context_exposes_concurrency() {
        let ctx = ActorContext::new(ActorConfig::new(Concurrency::Process));
        assert_eq!(ctx.concurrency(), Concurrency::Process);
    }

    #[test]
    fn command_and_response_shapes() {
        assert_eq!(Command::Stop.to_string(), "stop");
        assert_eq!(Command::Ping.to_string(), "ping");
        assert_eq!(
            Command::Message("rebalance".to_owned()).to_string(),
            "message(rebalance)",
        );
        assert_ne!(Response::Ack, Response::Text("pong".to_owned()));
    }

    #[test]
    fn spawn_options_builder() {
        let options = SpawnOptions::new().name("echo").param("retries", "3");
        assert_eq!(options.requested_name(), Some("echo"));
        assert_eq!(options.get("retries"), Some("3"));
        assert_eq!(options.get("missing"), None);
    }
}
