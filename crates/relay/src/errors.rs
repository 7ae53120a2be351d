//! Cross-cutting error types.
//!
//! [`RelayError`] covers conditions that abort the startup resolution
//! sequence; the process fails fast on these. Per-message conditions never
//! surface here — the dispatcher contains them (see [`crate::dispatcher`]).

use std::path::PathBuf;

use thiserror::Error;

/// Boxed source error from an external SDK or collaborator.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Startup-level errors
// ---------------------------------------------------------------------------

/// Errors that abort startup resolution.
///
/// These are deliberately fatal: no top-level handler retries them, the
/// process exits and the supervisor restarts it.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A remote operation on the pub/sub service failed.
    #[error("transport operation failed")]
    Transport(#[from] TransportError),

    /// The subscription record could not be written.
    ///
    /// The write happens after the subscription has been created, so a
    /// failure here leaves an orphaned subscription on the service. The next
    /// startup creates a fresh one; orphan cleanup is out of scope.
    #[error("failed to persist subscription record to {path}")]
    PersistRecord {
        /// The record file path that could not be written.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The process environment does not form a valid configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Error surfaced by a [`crate::Transport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The resource targeted by a create call is already present.
    ///
    /// For topic creation the resolver tolerates exactly this condition and
    /// nothing else; any other failure aborts startup.
    #[error("{resource} already exists")]
    AlreadyExists {
        /// Human-readable description of the resource (e.g. `topic vms_cd`).
        resource: String,
    },

    /// Establishing the client connection failed.
    #[error("failed to connect to the pub/sub transport")]
    Connect {
        /// The underlying SDK failure.
        #[source]
        source: BoxedError,
    },

    /// A request failed for a reason other than `AlreadyExists`.
    #[error("pub/sub request failed: {context}")]
    Request {
        /// What was being attempted (e.g. `create subscription x`).
        context: String,
        /// The underlying SDK failure.
        #[source]
        source: BoxedError,
    },
}

impl TransportError {
    /// Returns `true` for the benign create-collision condition.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

// ---------------------------------------------------------------------------

/// Failure reported by the external pipeline engine for one run.
///
/// The dispatcher maps this to a nack; redelivery is then governed by the
/// transport's own policy.
#[derive(Debug, Error)]
#[error("pipeline run failed: {context}")]
pub struct PipelineError {
    context: String,
    #[source]
    source: Option<BoxedError>,
}

impl PipelineError {
    /// Creates a [`PipelineError`] with a description only.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a [`PipelineError`] wrapping the collaborator's failure.
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}
