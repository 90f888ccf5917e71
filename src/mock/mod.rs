//! Test doubles for the harness's external collaborators.
//!
//! This module provides hermetic stand-ins for the actor runtime, the
//! process configuration, and the data-store client factory:
//!
//! - [`MockActorRuntime`] - records spawns and sends, with knobs for
//!   every misbehavior the harness guards against
//! - [`MockConfig`] - an in-memory [`ConfigSource`](crate::probe::ConfigSource)
//! - [`MockStoreFactory`] / [`MockStore`] - a store whose ping outcome
//!   is chosen up front
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::actor::{ActorRuntime, Concurrency, SpawnOptions};
//! use actor_testkit::mock::MockActorRuntime;
//!
//! let runtime = MockActorRuntime::new();
//! let request = runtime.spawn(Concurrency::Thread, SpawnOptions::new());
//!
//! assert_eq!(request.aid(), "actor-1");
//! assert_eq!(runtime.spawn_log().len(), 1);
//! ```

mod runtime;
mod store;

pub use runtime::{AckFuture, MockActorRuntime, MockHandle};
pub use store::{MockConfig, MockStore, MockStoreFactory, PingOutcome};
