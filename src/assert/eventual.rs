//! Values that may still be in flight.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

/// A value or a pending asynchronous value, awaited at most once.
///
/// Assertion arguments are `Eventual`s so the same call site works for
/// plain values and for results that have not arrived yet.
///
/// # Example
///
/// ```rust
/// use actor_testkit::assert::Eventual;
///
/// let ready: Eventual<i32> = 3.into();
/// let pending = Eventual::pending(async { 3 });
///
/// assert!(ready.is_ready());
/// assert!(!pending.is_ready());
/// ```
pub enum Eventual<T> {
    /// The value is already available.
    Ready(T),
    /// The value is still in flight.
    Pending(BoxFuture<'static, T>),
}

impl<T> Eventual<T> {
    /// Wrap an already-available value.
    #[must_use]
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    /// Wrap a value that is still in flight.
    #[must_use]
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    /// Returns `true` if the value is already available.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Transform the value. A ready value is transformed now; an
    /// in-flight one is transformed once it resolves.
    #[must_use]
    pub fn map<U, M>(self, f: M) -> Eventual<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        M: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Ready(value) => Eventual::Ready(f(value)),
            Self::Pending(future) => Eventual::pending(async move { f(future.await) }),
        }
    }

    /// Obtain the value, awaiting it if it is still in flight.
    pub async fn resolve(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Pending(future) => future.await,
        }
    }
}

impl<T> From<T> for Eventual<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Eventual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
