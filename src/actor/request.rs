//! The `SpawnRequest` wrapper future.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::ActorId;

pin_project_lite::pin_project! {
    /// An in-flight actor spawn.
    ///
    /// The actor id is assigned when the request is created and is
    /// readable synchronously via [`aid`](SpawnRequest::aid); awaiting
    /// the request suspends until the runtime resolves the spawn into a
    /// handle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use actor_testkit::actor::SpawnRequest;
    ///
    /// let request = SpawnRequest::new("actor-1", std::future::ready(42));
    /// assert_eq!(request.aid(), "actor-1");
    ///
    /// let value = futures::executor::block_on(request);
    /// assert_eq!(value, 42);
    /// ```
    #[must_use = "a spawn request does nothing until awaited"]
    pub struct SpawnRequest<F> {
        aid: ActorId,
        #[pin]
        resolution: F,
    }
}

impl<F> SpawnRequest<F> {
    /// Create a request with a pre-assigned actor id and the future that
    /// resolves the spawn.
    pub fn new(aid: impl Into<ActorId>, resolution: F) -> Self {
        Self {
            aid: aid.into(),
            resolution,
        }
    }

    /// The actor id, available before the spawn resolves.
    #[must_use]
    pub fn aid(&self) -> &str {
        &self.aid
    }
}

impl<F: Future> Future for SpawnRequest<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().resolution.poll(cx)
    }
}
