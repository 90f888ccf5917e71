//! Reachability probe for external services.
//!
//! [`check_server`] answers one question - "is the service named `x`
//! reachable at its configured address?" - and answers it with a plain
//! `bool`. Misconfiguration, connection refusal, protocol errors, even a
//! panicking client all come back as `false`; the probe never fails
//! outward.
//!
//! The liveness check runs on a throwaway single-threaded execution
//! context (a dedicated thread driving the ping future to completion),
//! never on the caller's executor, so the probe is safe to call from
//! inside an already-running async test.
//!
//! # Example
//!
//! ```rust
//! use actor_testkit::mock::{MockConfig, MockStoreFactory};
//! use actor_testkit::probe::check_server;
//!
//! let config = MockConfig::new().with("redis_server", "127.0.0.1:6379");
//! let factory = MockStoreFactory::live();
//!
//! assert!(check_server("redis", &config, &factory));
//! assert!(!check_server("kafka", &config, &factory));
//! ```

use std::collections::HashMap;
use std::future::Future;

/// Process-wide string-keyed configuration, looked up by
/// `"<name>_server"` keys.
pub trait ConfigSource {
    /// Look up a configuration value.
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// A short-lived client for the service under probe.
pub trait Store: Send + 'static {
    /// The future resolving the liveness check.
    type Ping: Future<Output = crate::Result<bool>> + Send;

    /// Run a lightweight liveness operation.
    fn ping(self) -> Self::Ping;
}

/// Creates [`Store`] clients from addresses; errors on malformed or
/// unsupported addresses.
pub trait StoreFactory {
    /// The client type this factory builds.
    type Store: Store;

    /// Build a client bound to the given address.
    fn create(&self, address: &str) -> crate::Result<Self::Store>;
}

/// Check whether the service `name` is reachable at the address stored
/// under the `"<name>_server"` configuration key.
///
/// The address is prefixed with `"<name>://"` when it lacks a scheme.
/// Returns `true` only when the liveness check completes successfully;
/// every failure mode returns `false`.
pub fn check_server<C, F>(name: &str, config: &C, factory: &F) -> bool
where
    C: ConfigSource + ?Sized,
    F: StoreFactory,
{
    let key = format!("{name}_server");
    let Some(address) = config.get(&key) else {
        tracing::debug!(name, "no address configured, treating as unreachable");
        return false;
    };

    let scheme = format!("{name}://");
    let address = if address.contains(&scheme) {
        address
    } else {
        format!("{scheme}{address}")
    };

    let store = match factory.create(&address) {
        Ok(store) => store,
        Err(error) => {
            tracing::debug!(name, %address, %error, "store creation failed");
            return false;
        }
    };

    // Drive the ping on a throwaway thread with its own executor so a
    // probe issued from inside a running event loop cannot deadlock it.
    let probe = std::thread::Builder::new()
        .name(format!("{name}-probe"))
        .spawn(move || futures::executor::block_on(store.ping()));

    let handle = match probe {
        Ok(handle) => handle,
        Err(error) => {
            tracing::debug!(name, %error, "could not start probe thread");
            return false;
        }
    };

    match handle.join() {
        Ok(Ok(live)) => live,
        Ok(Err(error)) => {
            tracing::debug!(name, %error, "liveness check failed");
            false
        }
        Err(_) => {
            tracing::debug!(name, "liveness check panicked");
            false
        }
    }
}
