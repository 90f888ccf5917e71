//! In-memory configuration and store doubles for the probe.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::error::Error;
use crate::probe::{ConfigSource, Store, StoreFactory};

/// An in-memory [`ConfigSource`].
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    values: HashMap<String, String>,
}

impl MockConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair (builder style).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a key/value pair.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigSource for MockConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// What a [`MockStore`]'s ping does.
#[derive(Clone, Debug)]
pub enum PingOutcome {
    /// The service answers and reports itself live.
    Live,
    /// The service answers but reports itself not live.
    NotLive,
    /// The connection is refused with the given message.
    Refused(String),
    /// The client panics mid-ping.
    Panicking,
}

/// A store double whose ping outcome is fixed at creation.
#[derive(Debug)]
pub struct MockStore {
    outcome: PingOutcome,
}

impl Store for MockStore {
    type Ping = BoxFuture<'static, crate::Result<bool>>;

    fn ping(self) -> Self::Ping {
        Box::pin(async move {
            match self.outcome {
                PingOutcome::Live => Ok(true),
                PingOutcome::NotLive => Ok(false),
                PingOutcome::Refused(message) => Err(Error::connection(message)),
                PingOutcome::Panicking => panic!("mock store panicked during ping"),
            }
        })
    }
}

struct FactoryInner {
    outcome: PingOutcome,
    reject_with: Mutex<Option<String>>,
    created: Mutex<Vec<String>>,
}

/// A [`StoreFactory`] double that records every requested address.
#[derive(Clone)]
pub struct MockStoreFactory {
    inner: Arc<FactoryInner>,
}

impl MockStoreFactory {
    fn with_outcome(outcome: PingOutcome) -> Self {
        Self {
            inner: Arc::new(FactoryInner {
                outcome,
                reject_with: Mutex::new(None),
                created: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A factory whose stores ping successfully.
    #[must_use]
    pub fn live() -> Self {
        Self::with_outcome(PingOutcome::Live)
    }

    /// A factory whose stores answer but are not live.
    #[must_use]
    pub fn not_live() -> Self {
        Self::with_outcome(PingOutcome::NotLive)
    }

    /// A factory whose stores refuse the connection.
    #[must_use]
    pub fn refused(message: impl Into<String>) -> Self {
        Self::with_outcome(PingOutcome::Refused(message.into()))
    }

    /// A factory whose stores panic mid-ping.
    #[must_use]
    pub fn panicking() -> Self {
        Self::with_outcome(PingOutcome::Panicking)
    }

    /// Make [`create`](StoreFactory::create) fail with a configuration
    /// error, as a real factory does for malformed addresses.
    pub fn reject_with(&self, message: impl Into<String>) {
        *self.inner.reject_with.lock() = Some(message.into());
    }

    /// Every address a store was requested for, in order.
    #[must_use]
    pub fn created_addresses(&self) -> Vec<String> {
        self.inner.created.lock().clone()
    }
}

impl StoreFactory for MockStoreFactory {
    type Store = MockStore;

    fn create(&self, address: &str) -> crate::Result<Self::Store> {
        self.inner.created.lock().push(address.to_owned());
        if let Some(message) = self.inner.reject_with.lock().clone() {
            return Err(Error::store_config(message));
        }
        Ok(MockStore {
            outcome: self.inner.outcome.clone(),
        })
    }
}
