//! A controllable in-memory actor runtime.

use std::future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::actor::{
    ActorConfig, ActorContext, ActorHandle, ActorId, ActorRuntime, Command, Concurrency,
    Response, SpawnOptions, SpawnRequest,
};
use crate::error::Error;

/// Handle produced by [`MockActorRuntime`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockHandle {
    aid: ActorId,
    cfg: ActorConfig,
}

impl ActorHandle for MockHandle {
    fn aid(&self) -> &str {
        &self.aid
    }

    fn cfg(&self) -> &ActorConfig {
        &self.cfg
    }
}

#[derive(Clone, Debug, Default)]
struct SpawnBehavior {
    blank_ids: bool,
    misreport_ids: bool,
    empty_cfg: bool,
    fail_with: Option<String>,
    hold_acks: bool,
}

struct RuntimeInner {
    next_id: AtomicU64,
    behavior: Mutex<SpawnBehavior>,
    context: Mutex<Option<ActorContext>>,
    /// Every spawn request: (request id, concurrency mode).
    spawn_log: Mutex<Vec<(ActorId, Concurrency)>>,
    /// Every dispatched command, recorded at `send` time.
    send_log: Mutex<Vec<(ActorId, Command)>>,
    /// Acknowledgments withheld while `hold_acks` is set.
    held_acks: Mutex<Vec<oneshot::Sender<()>>>,
}

/// An in-memory [`ActorRuntime`] that records every interaction.
///
/// Spawns resolve immediately with sequential ids (`actor-1`,
/// `actor-2`, ...) unless a misbehavior knob says otherwise. Commands
/// are logged the moment [`send`](ActorRuntime::send) is called, so
/// tests can observe that a batch was dispatched before any
/// acknowledgment was awaited.
#[derive(Clone)]
pub struct MockActorRuntime {
    inner: Arc<RuntimeInner>,
}

impl Default for MockActorRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockActorRuntime {
    /// Create a well-behaved runtime.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RuntimeInner {
                next_id: AtomicU64::new(0),
                behavior: Mutex::new(SpawnBehavior::default()),
                context: Mutex::new(None),
                spawn_log: Mutex::new(Vec::new()),
                send_log: Mutex::new(Vec::new()),
                held_acks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Install the context returned by [`current`](ActorRuntime::current).
    pub fn set_context(&self, context: ActorContext) {
        *self.inner.context.lock() = Some(context);
    }

    /// Make spawn requests carry an empty actor id.
    pub fn return_blank_ids(&self) {
        self.inner.behavior.lock().blank_ids = true;
    }

    /// Make resolved handles report a different id than their request.
    pub fn misreport_resolved_ids(&self) {
        self.inner.behavior.lock().misreport_ids = true;
    }

    /// Make resolved handles carry an empty configuration.
    pub fn resolve_with_empty_cfg(&self) {
        self.inner.behavior.lock().empty_cfg = true;
    }

    /// Make every spawn resolve with the given error.
    pub fn fail_spawns(&self, message: impl Into<String>) {
        self.inner.behavior.lock().fail_with = Some(message.into());
    }

    /// Withhold command acknowledgments until
    /// [`release_acks`](Self::release_acks) is called.
    pub fn hold_acks(&self) {
        self.inner.behavior.lock().hold_acks = true;
    }

    /// Acknowledge every held command; returns how many were released.
    pub fn release_acks(&self) -> usize {
        let held: Vec<_> = self.inner.held_acks.lock().drain(..).collect();
        let count = held.len();
        for ack in held {
            let _ = ack.send(());
        }
        count
    }

    /// Drop every held acknowledgment, failing the waiting sends;
    /// returns how many were abandoned.
    pub fn abandon_acks(&self) -> usize {
        self.inner.held_acks.lock().drain(..).count()
    }

    /// Number of commands currently waiting for an acknowledgment.
    #[must_use]
    pub fn pending_acks(&self) -> usize {
        self.inner.held_acks.lock().len()
    }

    /// Every spawn request so far: (request id, concurrency mode).
    #[must_use]
    pub fn spawn_log(&self) -> Vec<(ActorId, Concurrency)> {
        self.inner.spawn_log.lock().clone()
    }

    /// Every dispatched command so far: (target actor id, command).
    #[must_use]
    pub fn send_log(&self) -> Vec<(ActorId, Command)> {
        self.inner.send_log.lock().clone()
    }
}

impl ActorRuntime for MockActorRuntime {
    type Handle = MockHandle;
    type SpawnFuture = future::Ready<crate::Result<MockHandle>>;
    type SendFuture = AckFuture;

    fn spawn(
        &self,
        concurrency: Concurrency,
        options: SpawnOptions,
    ) -> SpawnRequest<Self::SpawnFuture> {
        let behavior = self.inner.behavior.lock().clone();
        let serial = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        let aid = if behavior.blank_ids {
            String::new()
        } else {
            options
                .requested_name()
                .map_or_else(|| format!("actor-{serial}"), str::to_owned)
        };
        self.inner
            .spawn_log
            .lock()
            .push((aid.clone(), concurrency));

        let resolution = if let Some(message) = behavior.fail_with {
            Err(Error::spawn(message))
        } else {
            let resolved_aid = if behavior.misreport_ids {
                format!("{aid}-ghost")
            } else {
                aid.clone()
            };
            let cfg = if behavior.empty_cfg {
                ActorConfig::new(concurrency)
            } else {
                ActorConfig::new(concurrency)
                    .with("actor_id", &resolved_aid)
                    .with("concurrency", concurrency.to_string())
            };
            Ok(MockHandle {
                aid: resolved_aid,
                cfg,
            })
        };

        SpawnRequest::new(aid, future::ready(resolution))
    }

    fn send(&self, handle: &Self::Handle, command: Command) -> Self::SendFuture {
        // Dispatch is recorded here, at call time, not on first poll.
        self.inner
            .send_log
            .lock()
            .push((handle.aid().to_owned(), command));

        if self.inner.behavior.lock().hold_acks {
            let (tx, rx) = oneshot::channel();
            self.inner.held_acks.lock().push(tx);
            AckFuture { pending: Some(rx) }
        } else {
            AckFuture { pending: None }
        }
    }

    fn current(&self) -> Option<ActorContext> {
        self.inner.context.lock().clone()
    }
}

/// Acknowledgment future returned by [`MockActorRuntime::send`].
///
/// Resolves immediately unless acknowledgments are being held; a held
/// acknowledgment that is abandoned resolves to [`Error::Stop`].
pub struct AckFuture {
    pending: Option<oneshot::Receiver<()>>,
}

impl std::future::Future for AckFuture {
    type Output = crate::Result<Response>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.pending.as_mut() {
            None => Poll::Ready(Ok(Response::Ack)),
            Some(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(())) => Poll::Ready(Ok(Response::Ack)),
                Poll::Ready(Err(_)) => Poll::Ready(Err(Error::stop(
                    "acknowledgment abandoned by the runtime",
                ))),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
