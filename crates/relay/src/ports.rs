//! Port trait definitions.
//!
//! Infrastructure crates implement these traits; the domain never sees
//! transport or HTTP types directly. Both traits are dyn-compatible so the
//! binary can inject test doubles and production implementations alike.

use async_trait::async_trait;
use serde_json::Value;

use crate::{PipelineError, SubscriptionName, TopicName, TransportError};

/// Remote operations the resolver needs from the pub/sub service.
///
/// Obtaining a handle to an existing subscription is *not* part of this port:
/// handles are constructed locally by name, without a round trip, so reuse of
/// a persisted subscription performs no remote calls at all.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Creates `topic` on the service.
    ///
    /// Must fail with [`TransportError::AlreadyExists`] when the topic is
    /// already present; the resolver tolerates exactly that condition.
    async fn create_topic(&self, topic: &TopicName) -> Result<(), TransportError>;

    /// Creates a durable subscription named `name`, bound to `topic`.
    async fn create_subscription(
        &self,
        name: &SubscriptionName,
        topic: &TopicName,
    ) -> Result<(), TransportError>;
}

/// The external pipeline engine, invoked once per decoded message payload.
///
/// The completion signal decides message acknowledgment: `Ok` acks, `Err`
/// nacks and leaves redelivery to the transport.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Runs the pipeline with one decoded JSON event.
    async fn run(&self, event: Value) -> Result<(), PipelineError>;
}
