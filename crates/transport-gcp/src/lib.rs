//! Google Cloud Pub/Sub implementation of the [`relay::Transport`] port.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** SDK types, authentication, resource-name
//! qualification, and the message consumption loop all live here. The
//! domain crate sees only [`relay::Transport`] and [`relay::Pipeline`].
//!
//! Connection management, redelivery, and flow control are owned by the SDK;
//! this crate adds no retry logic of its own. Each received message is
//! dispatched on its own task, so handler runs overlap with no ordering
//! guarantee between them.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use google_cloud_gax::grpc::{Code, Status};
use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::subscription::SubscriptionConfig;
use tracing::warn;

use relay::{
    dispatch, Disposition, Pipeline, ProjectId, SubscriptionName, TopicName, Transport,
    TransportError,
};

/// Pub/Sub-backed [`Transport`] and message source.
pub struct GcpTransport {
    client: Client,
}

impl GcpTransport {
    /// Connects a Pub/Sub client using application-default credentials.
    ///
    /// When `project` is `None`, the SDK's own project discovery (metadata
    /// server, credentials file) applies.
    pub async fn connect(project: Option<&ProjectId>) -> Result<Self, TransportError> {
        let mut config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| TransportError::Connect { source: Box::new(e) })?;
        if let Some(project) = project {
            config.project_id = Some(project.as_str().to_owned());
        }
        let client = Client::new(config)
            .await
            .map_err(|e| TransportError::Connect { source: Box::new(e) })?;
        Ok(Self { client })
    }

    /// Consumes messages from `subscription` until the stream ends.
    ///
    /// Each message is handled on its own spawned task: decode, pipeline run,
    /// then ack or nack per the returned [`Disposition`]. Settlement failures
    /// are logged and otherwise ignored — the transport's redelivery policy
    /// covers them.
    pub async fn consume(
        &self,
        subscription: &SubscriptionName,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<(), TransportError> {
        let handle = self.client.subscription(subscription.as_str());
        let mut stream = handle.subscribe(None).await.map_err(|status| {
            map_status(format!("subscribe to {subscription}"), status)
        })?;

        while let Some(mut message) = stream.next().await {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let disposition = dispatch(&message.message.data, pipeline.as_ref()).await;
                let settled = match disposition {
                    Disposition::Ack => message.ack().await,
                    Disposition::Nack => message.nack().await,
                };
                if let Err(error) = settled {
                    warn!(%error, "failed to settle message");
                }
            });
        }

        warn!(subscription = %subscription, "message stream ended");
        Ok(())
    }
}

#[async_trait]
impl Transport for GcpTransport {
    async fn create_topic(&self, topic: &TopicName) -> Result<(), TransportError> {
        self.client
            .topic(topic.as_str())
            .create(None, None)
            .await
            .map_err(|status| map_status(format!("topic {topic}"), status))
    }

    async fn create_subscription(
        &self,
        name: &SubscriptionName,
        topic: &TopicName,
    ) -> Result<(), TransportError> {
        let topic_handle = self.client.topic(topic.as_str());
        self.client
            .subscription(name.as_str())
            .create(
                topic_handle.fully_qualified_name(),
                SubscriptionConfig::default(),
                None,
            )
            .await
            .map_err(|status| map_status(format!("subscription {name}"), status))
    }
}

/// Maps a gRPC status onto the port error, keeping the already-exists
/// condition distinguishable so the resolver can branch on it.
fn map_status(resource: String, status: Status) -> TransportError {
    if status.code() == Code::AlreadyExists {
        TransportError::AlreadyExists { resource }
    } else {
        TransportError::Request {
            context: resource,
            source: Box::new(status),
        }
    }
}
