//! Asynchronous assertion proxy.
//!
//! [`AsyncAssert`] lets a test call assertion methods whose arguments
//! are still in flight, with the call site reading like a synchronous
//! assertion:
//!
//! - every [`Eventual`] argument is resolved **concurrently**, so
//!   resolving N arguments takes the time of the slowest one;
//! - assertion bodies may themselves be asynchronous and are awaited
//!   before the proxy returns;
//! - failures surface as [`Error::AssertionFailed`] carrying the
//!   assertion's name.
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::assert::{AsyncAssert, Eventual};
//!
//! # futures::executor::block_on(async {
//! let check = AsyncAssert::new();
//! check
//!     .assert_eq(3, Eventual::pending(async { 3 }))
//!     .await
//!     .unwrap();
//! # });
//! ```

use std::fmt::Debug;
use std::future::Future;

use futures::future;

use crate::error::{Error, Result};

mod eventual;

pub use eventual::Eventual;

/// A dynamically typed error returned by a callable under
/// [`AsyncAssert::assert_raises`].
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The assertion proxy.
///
/// One proxy is built lazily per harness and handed out by reference,
/// so repeated access observes the same instance (see
/// [`ActorHarness::check`](crate::harness::ActorHarness::check)).
#[derive(Debug, Default)]
pub struct AsyncAssert {
    _private: (),
}

impl AsyncAssert {
    /// Create a standalone proxy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic assertion dispatch: resolve all arguments concurrently,
    /// run the named assertion over the resolved values, and await the
    /// assertion's own (possibly asynchronous) verdict.
    ///
    /// Named assertions such as [`assert_eq`](Self::assert_eq) are thin
    /// wrappers over this function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] tagged with `name` when the
    /// assertion reports a failure message.
    pub async fn forward<T, C, Fut>(
        &self,
        name: &str,
        args: Vec<Eventual<T>>,
        assertion: C,
    ) -> Result<()>
    where
        T: Send,
        C: FnOnce(Vec<T>) -> Fut,
        Fut: Future<Output = std::result::Result<(), String>>,
    {
        let resolved = future::join_all(args.into_iter().map(Eventual::resolve)).await;
        assertion(resolved)
            .await
            .map_err(|message| Error::assertion(format!("{name}: {message}")))
    }

    /// Assert that two (possibly pending) values are equal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] when the resolved values
    /// differ.
    pub async fn assert_eq<T>(
        &self,
        expected: impl Into<Eventual<T>>,
        actual: impl Into<Eventual<T>>,
    ) -> Result<()>
    where
        T: PartialEq + Debug + Send,
    {
        self.forward("assert_eq", vec![expected.into(), actual.into()], |values| async move {
            let Ok([expected, actual]) = <[T; 2]>::try_from(values) else {
                return Err("expected exactly two arguments".to_owned());
            };
            if expected == actual {
                Ok(())
            } else {
                Err(format!("{expected:?} != {actual:?}"))
            }
        })
        .await
    }

    /// Assert that two (possibly pending) values are not equal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] when the resolved values are
    /// equal.
    pub async fn assert_ne<T>(
        &self,
        left: impl Into<Eventual<T>>,
        right: impl Into<Eventual<T>>,
    ) -> Result<()>
    where
        T: PartialEq + Debug + Send,
    {
        self.forward("assert_ne", vec![left.into(), right.into()], |values| async move {
            let Ok([left, right]) = <[T; 2]>::try_from(values) else {
                return Err("expected exactly two arguments".to_owned());
            };
            if left == right {
                Err(format!("both sides are {left:?}"))
            } else {
                Ok(())
            }
        })
        .await
    }

    /// Assert that a (possibly pending) boolean resolves to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] when the value resolves to
    /// `false`.
    pub async fn assert_true(&self, value: impl Into<Eventual<bool>>) -> Result<()> {
        self.forward("assert_true", vec![value.into()], |values| async move {
            let Ok([value]) = <[bool; 1]>::try_from(values) else {
                return Err("expected exactly one argument".to_owned());
            };
            if value {
                Ok(())
            } else {
                Err("expected true, got false".to_owned())
            }
        })
        .await
    }

    /// Assert that a (possibly pending) collection contains a (possibly
    /// pending) item. Both are resolved concurrently.
    ///
    /// The needle is lifted into a single-item collection so both
    /// arguments go through [`forward`](Self::forward) together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] when the item is absent.
    pub async fn assert_contains<T>(
        &self,
        haystack: impl Into<Eventual<Vec<T>>>,
        needle: impl Into<Eventual<T>>,
    ) -> Result<()>
    where
        T: PartialEq + Debug + Send + 'static,
    {
        let needle = needle.into().map(|item| vec![item]);
        self.forward(
            "assert_contains",
            vec![haystack.into(), needle],
            |values| async move {
                let Ok([haystack, needle]) = <[Vec<T>; 2]>::try_from(values) else {
                    return Err("expected exactly two arguments".to_owned());
                };
                let Ok([needle]) = <[T; 1]>::try_from(needle) else {
                    return Err("expected exactly one needle".to_owned());
                };
                if haystack.contains(&needle) {
                    Ok(())
                } else {
                    Err(format!("{needle:?} not found in {haystack:?}"))
                }
            },
        )
        .await
    }

    /// Assert that `callable` fails with an error of type `E`.
    ///
    /// An error of any *other* type reports the same "not raised"
    /// failure as no error at all; the unexpected error is not
    /// propagated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssertionFailed`] when the callable succeeds or
    /// fails with a different error type.
    pub async fn assert_raises<E, T, C, Fut>(&self, callable: C) -> Result<()>
    where
        E: std::error::Error + 'static,
        C: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, DynError>>,
    {
        match callable().await {
            Err(error) if error.downcast_ref::<E>().is_some() => Ok(()),
            _ => Err(Error::assertion(format!(
                "{} not raised by callable",
                std::any::type_name::<E>()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::time::Duration;

    #[derive(Debug)]
    struct FlakyValue;

    impl fmt::Display for FlakyValue {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "flaky value")
        }
    }

    impl std::error::Error for FlakyValue {}

    #[derive(Debug)]
    struct WrongShape;

    impl fmt::Display for WrongShape {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrong shape")
        }
    }

    impl std::error::Error for WrongShape {}

    #[tokio::test]
    async fn eq_accepts_plain_and_pending_values() {
        let check = AsyncAssert::new();
        check.assert_eq(3, 3).await.unwrap();
        check
            .assert_eq(3, Eventual::pending(async { 3 }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn eq_failure_names_the_assertion() {
        let check = AsyncAssert::new();
        let error = check.assert_eq(3, 4).await.unwrap_err();
        assert!(error.is_assertion_failure());
        assert!(error.to_string().contains("assert_eq"));
        assert!(error.to_string().contains("3 != 4"));
    }

    #[tokio::test]
    async fn ne_passes_for_different_values() {
        let check = AsyncAssert::new();
        check
            .assert_ne(Eventual::pending(async { 1 }), 2)
            .await
            .unwrap();
        assert!(check.assert_ne(2, 2).await.is_err());
    }

    #[tokio::test]
    async fn true_assertion() {
        let check = AsyncAssert::new();
        check
            .assert_true(Eventual::pending(async { true }))
            .await
            .unwrap();
        let error = check.assert_true(false).await.unwrap_err();
        assert!(error.to_string().contains("assert_true"));
    }

    #[tokio::test]
    async fn contains_resolves_both_sides() {
        let check = AsyncAssert::new();
        check
            .assert_contains(
                Eventual::pending(async { vec![1, 2, 3] }),
                Eventual::pending(async { 2 }),
            )
            .await
            .unwrap();
        assert!(check.assert_contains(vec![1, 2, 3], 9).await.is_err());
    }

    #[tokio::test]
    async fn contains_failure_names_the_assertion() {
        let check = AsyncAssert::new();
        let error = check
            .assert_contains(vec![1, 2, 3], Eventual::pending(async { 9 }))
            .await
            .unwrap_err();
        assert!(error.is_assertion_failure());
        assert!(error.to_string().contains("assert_contains: "));
        assert!(error.to_string().contains("9 not found in [1, 2, 3]"));
    }

    #[tokio::test]
    async fn forward_runs_async_assertion_bodies() {
        let check = AsyncAssert::new();
        check
            .forward("assert_sum", vec![1.into(), 2.into(), 3.into()], |values| async move {
                tokio::task::yield_now().await;
                if values.iter().sum::<i32>() == 6 {
                    Ok(())
                } else {
                    Err("sum mismatch".to_owned())
                }
            })
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn arguments_resolve_concurrently_not_sequentially() {
        let check = AsyncAssert::new();
        let slow = Eventual::pending(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            7
        });
        let slower = Eventual::pending(async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            7
        });

        let started = tokio::time::Instant::now();
        check.assert_eq::<i32>(slow, slower).await.unwrap();

        // Bounded by the slowest argument, not the sum of both.
        assert_eq!(started.elapsed(), Duration::from_millis(150));
    }

    #[tokio::test]
    async fn raises_succeeds_on_the_expected_error() {
        let check = AsyncAssert::new();
        check
            .assert_raises::<FlakyValue, (), _, _>(|| async { Err(FlakyValue.into()) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn raises_fails_when_nothing_is_raised() {
        let check = AsyncAssert::new();
        let error = check
            .assert_raises::<FlakyValue, i32, _, _>(|| async { Ok(42) })
            .await
            .unwrap_err();
        assert!(error.to_string().contains("not raised by callable"));
    }

    #[tokio::test]
    async fn wrong_error_kind_reports_not_raised() {
        // A mismatched error reports the same failure as no error at
        // all; the real error is not propagated.
        let check = AsyncAssert::new();
        let error = check
            .assert_raises::<FlakyValue, (), _, _>(|| async { Err(WrongShape.into()) })
            .await
            .unwrap_err();
        assert!(error.to_string().contains("not raised by callable"));
        assert!(!error.to_string().contains("wrong shape"));
    }
}
