//! Conditional skip based on the process's concurrency mode.

use crate::actor::{ActorContext, Concurrency};

/// The outcome of a skip predicate, consumed by the runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipDecision {
    /// Run the test.
    Run,
    /// Skip the test, with a human-readable reason.
    Skip {
        /// Why the test is being skipped.
        reason: String,
    },
}

impl SkipDecision {
    /// Returns `true` if the test should be skipped.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, SkipDecision::Skip { .. })
    }

    /// The skip reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            SkipDecision::Run => None,
            SkipDecision::Skip { reason } => Some(reason),
        }
    }
}

/// Mark a test to run only under the required concurrency mode.
///
/// With no actor context (the runtime is not initialized yet, e.g. at
/// registration time) the test runs unconditionally.
///
/// # Example
///
/// ```rust
/// use actor_testkit::actor::{ActorConfig, ActorContext, Concurrency};
/// use actor_testkit::schedule::skip_unless_concurrency;
///
/// let ctx = ActorContext::new(ActorConfig::new(Concurrency::Thread));
/// let decision = skip_unless_concurrency(Some(&ctx), Concurrency::Process);
/// assert!(decision.is_skip());
/// ```
#[must_use]
pub fn skip_unless_concurrency(
    context: Option<&ActorContext>,
    required: Concurrency,
) -> SkipDecision {
    match context {
        None => SkipDecision::Run,
        Some(ctx) if ctx.concurrency() == required => SkipDecision::Run,
        Some(ctx) => SkipDecision::Skip {
            reason: format!(
                "run only when concurrency is {required} (current mode is {})",
                ctx.concurrency()
            ),
        },
    }
}
