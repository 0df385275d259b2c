// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Error types for the backstream reactive value library
//!
//! Every producer in backstream terminates with either a value or a [`StreamError`].
//! The error is cheap to clone so that a single failure can be handed to every
//! registered listener and replayed to late ones.
//!
//! # Examples
//!
//! ```
//! use backstream_error::{Result, StreamError};
//!
//! fn fetch_course() -> Result<String> {
//!     Err(StreamError::timeout("course request exceeded 30s"))
//! }
//!
//! assert!(matches!(fetch_course(), Err(StreamError::Timeout { .. })));
//! ```

use std::sync::Arc;

/// Root error type for all backstream operations
///
/// Failures are forwarded verbatim by the combinators: a joined producer fails
/// with exactly the error its failing input produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamError {
    /// An upstream source failed
    ///
    /// General-purpose failure for network requests and other collaborators
    /// that feed a producer.
    #[error("Upstream error: {context}")]
    Upstream {
        /// Description of what went wrong upstream
        context: String,
    },

    /// An upstream source did not answer in time
    #[error("Timeout error: {context}")]
    Timeout {
        /// Context about the timeout (e.g. duration, endpoint)
        context: String,
    },

    /// Custom error from user code
    ///
    /// Shared behind an `Arc` so the error stays cloneable while keeping its
    /// original type reachable through [`std::error::Error::source`].
    #[error("User error: {0}")]
    User(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// The producer was dropped before it resolved
    ///
    /// Only observed by code that awaits a producer; callback observers of an
    /// abandoned producer are simply never called.
    #[error("Producer abandoned before resolving")]
    Abandoned,
}

impl StreamError {
    /// Create an upstream error with the given context
    pub fn upstream(context: impl Into<String>) -> Self {
        Self::Upstream {
            context: context.into(),
        }
    }

    /// Create a timeout error with the given context
    pub fn timeout(context: impl Into<String>) -> Self {
        Self::Timeout {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Arc::new(error))
    }

    /// Check if this is a recoverable error
    ///
    /// Timeouts may succeed when the caller starts a new load.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::User(_) | Self::Abandoned)
    }
}

/// Specialized Result type for backstream operations
///
/// ```
/// use backstream_error::Result;
///
/// fn enrolled() -> Result<bool> {
///     Ok(true)
/// }
/// ```
pub type Result<T> = std::result::Result<T, StreamError>;

/// Extension trait for converting errors into `StreamError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoStreamError {
    /// Convert this error into a `StreamError` with additional context
    fn into_stream_error(self, context: &str) -> StreamError;

    /// Convert this error into a `StreamError` without additional context
    fn into_stream(self) -> StreamError
    where
        Self: Sized,
    {
        self.into_stream_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoStreamError for E {
    fn into_stream_error(self, context: &str) -> StreamError {
        if context.is_empty() {
            StreamError::user(self)
        } else {
            StreamError::upstream(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(StreamError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(StreamError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StreamError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| attach_context(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| attach_context(e.into(), f()))
    }
}

// Only user errors are rewritten; the typed variants keep their shape so
// callers can still match on them.
fn attach_context(error: StreamError, context: String) -> StreamError {
    match error {
        StreamError::User(inner) => StreamError::Upstream {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[test]
    fn user_error_keeps_source_after_clone() {
        let error = StreamError::user(SocketClosed);
        let cloned = error.clone();

        assert_eq!(cloned.to_string(), "User error: socket closed");
        assert!(cloned.source().is_some());
    }

    #[test]
    fn context_rewrites_user_errors_only() {
        let user: Result<()> = Err(StreamError::user(SocketClosed));
        let timeout: Result<()> = Err(StreamError::timeout("30s"));

        let user = user.context("fetching course").unwrap_err();
        let timeout = timeout.with_context(|| "fetching course".to_string()).unwrap_err();

        assert!(matches!(
            user,
            StreamError::Upstream { ref context } if context == "fetching course: socket closed"
        ));
        assert!(matches!(timeout, StreamError::Timeout { .. }));
    }

    #[test]
    fn into_stream_error_uses_context_when_given() {
        assert!(matches!(SocketClosed.into_stream(), StreamError::User(_)));
        assert!(matches!(
            SocketClosed.into_stream_error("enroll"),
            StreamError::Upstream { ref context } if context == "enroll: socket closed"
        ));
    }

    #[test]
    fn classification() {
        assert!(StreamError::timeout("t").is_recoverable());
        assert!(!StreamError::timeout("t").is_permanent());
        assert!(StreamError::upstream("u").is_permanent());
        assert!(StreamError::Abandoned.is_permanent());
    }
}
