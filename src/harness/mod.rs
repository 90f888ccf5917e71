//! Actor lifecycle harness.
//!
//! [`ActorHarness`] is the piece a test keeps on hand while it runs:
//! it spawns actors through the external runtime, records every handle
//! it produced, and on [`teardown`](ActorHarness::teardown) asks all of
//! them to stop - concurrently, waiting for every acknowledgment.
//!
//! [`ActorHarness::scope`] runs a test body and guarantees the
//! teardown call whatever the body does: on success, on an error
//! return, and on a panic (the panic is re-raised once every tracked
//! actor has been asked to stop).
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::actor::SpawnOptions;
//! use actor_testkit::harness::ActorHarness;
//! use actor_testkit::mock::MockActorRuntime;
//!
//! # futures::executor::block_on(async {
//! ActorHarness::scope(MockActorRuntime::new(), |harness| async move {
//!     harness
//!         .spawn_actor(None, SpawnOptions::new().name("worker"))
//!         .await?;
//!     assert_eq!(harness.spawned().len(), 1);
//!     assert_eq!(harness.spawned()[0].aid, "worker");
//!     Ok(())
//! })
//! .await
//! .unwrap();
//! # });
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future;
use futures::FutureExt;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::actor::{
    ActorHandle, ActorId, ActorRuntime, Command, Concurrency, Response, SpawnOptions,
};
use crate::assert::AsyncAssert;
use crate::error::{Error, Result};

/// One tracked spawn: the actor's id, its handle, and the concurrency
/// mode it was created under.
#[derive(Clone, Debug)]
pub struct SpawnRecord<H> {
    /// The actor's identifier.
    pub aid: ActorId,
    /// The resolved handle.
    pub handle: H,
    /// The concurrency mode used for the spawn.
    pub concurrency: Concurrency,
}

struct HarnessInner<R: ActorRuntime> {
    runtime: R,
    concurrency: Concurrency,
    spawned: Mutex<Vec<SpawnRecord<R::Handle>>>,
    check: OnceCell<AsyncAssert>,
}

/// Tracks every actor a test spawns and stops them all on teardown.
///
/// The harness is cheap to clone; all clones share the same tracked
/// records, so a body running under [`scope`](ActorHarness::scope) and
/// the scope's own teardown observe the same spawns. Distinct harness
/// instances are independent: tests running concurrently each hold
/// their own.
pub struct ActorHarness<R: ActorRuntime> {
    inner: Arc<HarnessInner<R>>,
}

impl<R: ActorRuntime> Clone for ActorHarness<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ActorRuntime> ActorHarness<R> {
    /// Create a harness over the given runtime, spawning with
    /// thread-based concurrency by default.
    #[must_use]
    pub fn new(runtime: R) -> Self {
        Self::with_concurrency(runtime, Concurrency::default())
    }

    /// Create a harness with an explicit default concurrency mode for
    /// [`spawn_actor`](Self::spawn_actor).
    #[must_use]
    pub fn with_concurrency(runtime: R, concurrency: Concurrency) -> Self {
        Self {
            inner: Arc::new(HarnessInner {
                runtime,
                concurrency,
                spawned: Mutex::new(Vec::new()),
                check: OnceCell::new(),
            }),
        }
    }

    /// Run a test body with a fresh harness and tear it down whatever
    /// the outcome: after the body returns (`Ok` or `Err`) every
    /// tracked actor is asked to stop and every acknowledgment is
    /// awaited; a panicking body is caught, torn down, and the panic
    /// re-raised.
    ///
    /// A body error takes precedence over a teardown error.
    ///
    /// # Errors
    ///
    /// Returns the body's error, or the teardown's when only the
    /// teardown failed.
    ///
    /// # Panics
    ///
    /// Re-raises the body's panic once teardown has completed.
    pub async fn scope<F, Fut, T>(runtime: R, body: F) -> Result<T>
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let harness = Self::new(runtime);
        let outcome = AssertUnwindSafe(body(harness.clone())).catch_unwind().await;
        let stopped = harness.teardown().await;
        match outcome {
            Err(panic) => std::panic::resume_unwind(panic),
            Ok(result) => {
                let value = result?;
                stopped?;
                Ok(value)
            }
        }
    }

    /// The underlying runtime.
    pub fn runtime(&self) -> &R {
        &self.inner.runtime
    }

    /// The default concurrency mode.
    #[must_use]
    pub fn concurrency(&self) -> Concurrency {
        self.inner.concurrency
    }

    /// Every spawn this harness performed, in spawn order.
    #[must_use]
    pub fn spawned(&self) -> Vec<SpawnRecord<R::Handle>> {
        self.inner.spawned.lock().clone()
    }

    /// The asynchronous assertion proxy, built lazily on first access;
    /// repeated access returns the same instance.
    pub fn check(&self) -> &AsyncAssert {
        self.inner.check.get_or_init(AsyncAssert::new)
    }

    /// Spawn an actor and verify the runtime's answer before tracking
    /// it: the request must carry a non-empty id, the resolved handle
    /// must report the same id, its proxy must be reflexive, and its
    /// configuration must be non-empty.
    ///
    /// # Errors
    ///
    /// Any verification failure surfaces as
    /// [`Error::AssertionFailed`]; a runtime spawn failure propagates
    /// unmodified.
    pub async fn spawn_actor(
        &self,
        concurrency: Option<Concurrency>,
        options: SpawnOptions,
    ) -> Result<R::Handle> {
        let concurrency = concurrency.unwrap_or(self.inner.concurrency);
        let request = self.inner.runtime.spawn(concurrency, options);

        let aid = request.aid().to_owned();
        if aid.is_empty() {
            return Err(Error::assertion("spawn request carries an empty actor id"));
        }

        let handle = request.await?;

        if handle.aid() != aid {
            return Err(Error::assertion(format!(
                "resolved actor id {:?} does not match requested id {aid:?}",
                handle.aid()
            )));
        }
        if handle.proxy() != &handle {
            return Err(Error::assertion(format!(
                "actor {aid} resolved with a non-reflexive proxy"
            )));
        }
        if handle.cfg().is_empty() {
            return Err(Error::assertion(format!(
                "actor {aid} resolved with an empty configuration"
            )));
        }

        tracing::debug!(%aid, %concurrency, "actor spawned");
        self.inner.spawned.lock().push(SpawnRecord {
            aid,
            handle: handle.clone(),
            concurrency,
        });
        Ok(handle)
    }

    /// Send a stop command to each given handle.
    ///
    /// All stop requests are dispatched before the harness suspends on
    /// any acknowledgment, and the combined result completes only once
    /// every individual stop has completed. Acknowledgments are
    /// returned in the caller-supplied order, whatever order they
    /// arrived in.
    ///
    /// # Errors
    ///
    /// After every stop has completed, the first failure (in handle
    /// order) is surfaced.
    pub async fn stop_actors(&self, handles: &[R::Handle]) -> Result<Vec<Response>> {
        // Issue every request first; only then wait.
        let pending: Vec<_> = handles
            .iter()
            .map(|handle| self.inner.runtime.send(handle, Command::Stop))
            .collect();
        let acks = future::join_all(pending).await;
        acks.into_iter().collect()
    }

    /// Stop every tracked actor. Completes immediately when nothing was
    /// spawned.
    ///
    /// # Errors
    ///
    /// See [`stop_actors`](Self::stop_actors).
    pub async fn stop_all(&self) -> Result<Vec<Response>> {
        let handles: Vec<R::Handle> = self
            .inner
            .spawned
            .lock()
            .iter()
            .map(|record| record.handle.clone())
            .collect();
        if handles.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(count = handles.len(), "stopping all tracked actors");
        self.stop_actors(&handles).await
    }

    /// The teardown hook: stop every tracked actor and wait for the
    /// acknowledgments. This waits for the stop *requests* to be
    /// acknowledged, not for the underlying processes or threads to
    /// exit.
    ///
    /// # Errors
    ///
    /// See [`stop_actors`](Self::stop_actors).
    pub async fn teardown(&self) -> Result<()> {
        self.stop_all().await.map(drop)
    }
}
