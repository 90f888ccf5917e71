//! Execution-control metadata consumed by the test runner.
//!
//! Tests are described to the runner through explicit registration
//! records instead of attributes injected at runtime:
//!
//! - [`TestRegistration`] - one test plus its [`SchedulingMetadata`]
//! - [`effective_timeout`] - how long the runner should wait before
//!   treating a test as hung
//! - [`skip_unless_concurrency`](skip::skip_unless_concurrency) - mark a
//!   test to run only under a given concurrency mode
//! - [`sequential_guard`] - process-wide exclusion for tests that must
//!   not overlap
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::schedule::{effective_timeout, TestRegistration};
//! use std::time::Duration;
//!
//! let test = TestRegistration::new("spawns_two_actors")
//!     .sequential()
//!     .with_timeout(Duration::from_secs(30));
//!
//! assert!(test.metadata().force_sequential);
//! assert_eq!(
//!     effective_timeout(test.metadata(), Duration::from_secs(10)),
//!     Duration::from_secs(30),
//! );
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

mod skip;

pub use skip::{skip_unless_concurrency, SkipDecision};

/// Scheduling metadata attached to a test registration.
///
/// Immutable once registered; the runner only reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulingMetadata {
    /// Run this unit's tests one at a time instead of concurrently.
    pub force_sequential: bool,
    /// Per-test timeout override, if any.
    pub timeout_override: Option<Duration>,
}

impl SchedulingMetadata {
    /// Combine this metadata with inherited metadata (e.g. from the
    /// suite the test belongs to).
    ///
    /// Sequential flags are ORed. When both carry a timeout override,
    /// the larger one wins; the last-applied value never silently
    /// replaces an earlier, longer one.
    #[must_use]
    pub fn merge(&self, inherited: &Self) -> Self {
        let timeout_override = match (self.timeout_override, inherited.timeout_override) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        Self {
            force_sequential: self.force_sequential || inherited.force_sequential,
            timeout_override,
        }
    }
}

/// A test known to the runner: its name, scheduling metadata, and an
/// optional skip reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRegistration {
    name: String,
    metadata: SchedulingMetadata,
    skip_reason: Option<String>,
}

impl TestRegistration {
    /// Register a test with default metadata.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: SchedulingMetadata::default(),
            skip_reason: None,
        }
    }

    /// Force this test to run sequentially.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.metadata.force_sequential = true;
        self
    }

    /// Set a timeout override. Applying several overrides keeps the
    /// maximum of all of them.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let current = self.metadata.timeout_override.unwrap_or(Duration::ZERO);
        self.metadata.timeout_override = Some(current.max(timeout));
        self
    }

    /// Merge metadata inherited from the enclosing suite.
    #[must_use]
    pub fn inherit(mut self, suite: &SchedulingMetadata) -> Self {
        self.metadata = self.metadata.merge(suite);
        self
    }

    /// Apply a skip decision to this registration.
    #[must_use]
    pub fn with_skip(mut self, decision: SkipDecision) -> Self {
        if let SkipDecision::Skip { reason } = decision {
            self.skip_reason = Some(reason);
        }
        self
    }

    /// The test's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The test's scheduling metadata.
    #[must_use]
    pub fn metadata(&self) -> &SchedulingMetadata {
        &self.metadata
    }

    /// The skip reason, if the test is marked to be skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }
}

/// How long the runner should wait for a unit before treating it as
/// hung: the unit's override (or zero) capped from below by the
/// runner's baseline.
#[must_use]
pub fn effective_timeout(metadata: &SchedulingMetadata, baseline: Duration) -> Duration {
    metadata.timeout_override.unwrap_or(Duration::ZERO).max(baseline)
}

/// Method names the runner must treat as lifecycle hooks, never as
/// tests.
pub const LIFECYCLE_METHODS: [&str; 6] = [
    "setup",
    "teardown",
    "pre_setup",
    "post_teardown",
    "setup_class",
    "teardown_class",
];

/// Returns `true` for setup/teardown hook names.
#[must_use]
pub fn is_lifecycle_method(name: &str) -> bool {
    LIFECYCLE_METHODS.contains(&name)
}

/// A test failure captured for runner-side reporting: the failure
/// message plus the display chain of its sources.
#[derive(Clone, Debug)]
pub struct FailureReport {
    chain: Vec<String>,
}

impl FailureReport {
    /// Capture an error and its source chain.
    #[must_use]
    pub fn new(error: &(dyn StdError + 'static)) -> Self {
        let mut chain = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self { chain }
    }

    /// The top-level failure message.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.chain[0]
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain.join("\n"))
    }
}

static SEQUENTIAL_TESTS: Mutex<()> = Mutex::new(());

/// Acquire the process-wide guard used by sequential tests.
///
/// Generated test wrappers take this guard first, so tests marked
/// sequential never overlap even when the test binary runs them on
/// multiple threads.
#[must_use]
pub fn sequential_guard() -> MutexGuard<'static, ()> {
    SEQUENTIAL_TESTS.lock()
}
