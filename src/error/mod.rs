//! Error definitions
//!
//! This module provides error types for actor-testkit.

use thiserror::Error;

/// Main error type for actor-testkit
#[derive(Error, Debug)]
pub enum Error {
    /// An assertion made by the harness or the assertion proxy failed.
    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    /// The actor runtime failed to spawn an actor.
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// A stop command was not acknowledged.
    #[error("stop failed: {0}")]
    Stop(String),

    /// A store address was missing, malformed, or used an unsupported scheme.
    #[error("store configuration error: {0}")]
    StoreConfig(String),

    /// A connection-level failure while talking to an external service.
    #[error("connection error: {0}")]
    Connection(String),
}

impl Error {
    /// Create an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed(message.into())
    }

    /// Create a spawn error.
    #[must_use]
    pub fn spawn(message: impl Into<String>) -> Self {
        Self::Spawn(message.into())
    }

    /// Create a stop error.
    #[must_use]
    pub fn stop(message: impl Into<String>) -> Self {
        Self::Stop(message.into())
    }

    /// Create a store configuration error.
    #[must_use]
    pub fn store_config(message: impl Into<String>) -> Self {
        Self::StoreConfig(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns `true` if this error is an assertion failure.
    #[must_use]
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
