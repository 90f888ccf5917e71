//! # actor-testkit 🧰
//!
//! > Test harness for actor-based async systems
//!
//! **actor-testkit** tracks every actor a test spawns, stops them all on
//! teardown, and lets assertions take values that are still in flight.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use actor_testkit::prelude::*;
//!
//! #[actor_testkit::test(timeout = 30)]
//! async fn worker_echoes() {
//!     // Every spawned actor is asked to stop when the scope ends,
//!     // pass, fail, or panic.
//!     ActorHarness::scope(runtime(), |harness| async move {
//!         let worker = harness.spawn_actor(None, SpawnOptions::new()).await?;
//!
//!         harness
//!             .check()
//!             .assert_eq("pong".to_owned(), Eventual::pending(ping(worker)))
//!             .await
//!     })
//!     .await
//!     .unwrap();
//! }
//! ```
//!
//! ## Features
//!
//! - 🎭 **Lifecycle harness** - spawn tracking with guaranteed stop on teardown
//! - ⏳ **Async assertions** - arguments resolved concurrently, call sites stay synchronous-looking
//! - 📡 **Reachability probe** - boolean-only external-service checks, safe inside a running event loop
//! - 🗓️ **Scheduling metadata** - sequential execution and timeout overrides for the runner
//! - 🎛️ **Mock collaborators** - a controllable runtime, config, and store for hermetic tests

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod assert;
pub mod error;
pub mod harness;
pub mod mock;
pub mod probe;
pub mod schedule;

/// Prelude for convenient imports
///
/// ```rust
/// use actor_testkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::actor::{
        ActorConfig, ActorContext, ActorHandle, ActorRuntime, Command, Concurrency, Response,
        SpawnOptions, SpawnRequest,
    };
    pub use crate::assert::{AsyncAssert, Eventual};
    pub use crate::error::{Error, Result};
    pub use crate::harness::{ActorHarness, SpawnRecord};
    pub use crate::probe::check_server;
    pub use crate::schedule::{
        effective_timeout, skip_unless_concurrency, SchedulingMetadata, SkipDecision,
        TestRegistration,
    };
}

// Re-exports
pub use error::{Error, Result};

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use actor_testkit_macros::test;
