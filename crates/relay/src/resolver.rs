//! Startup subscription resolution.
//!
//! Runs once, sequentially, before any message handling begins. Produces the
//! name of a live subscription bound to the configured topic, persisting
//! enough state that the next startup with the same topic reuses it instead
//! of creating another one.

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    RecordStore, RelayError, SubscriptionName, SubscriptionRecord, TopicName, Transport,
};

/// Resolves the subscription to consume from.
///
/// Reuse path: a persisted record whose topic matches `topic` is taken at
/// face value — no remote verification, no create calls. Creation path: the
/// topic is created (tolerating only the already-exists collision), a
/// subscription named `<prefix><millis>` is created under it, and the new
/// record is written before returning.
///
/// Errors on the creation path are fatal to startup; see [`RelayError`].
pub async fn resolve(
    transport: &dyn Transport,
    store: &RecordStore,
    topic: &TopicName,
    prefix: &str,
) -> Result<SubscriptionName, RelayError> {
    if let Some(record) = store.load().await {
        if record.is_current_for(topic) {
            info!(subscription = %record.subscription_name, %topic, "reusing persisted subscription");
            return Ok(record.subscription_name);
        }
        info!(
            recorded_topic = %record.topic_name,
            %topic,
            "persisted subscription is bound to a different topic; creating a new one"
        );
    }

    match transport.create_topic(topic).await {
        Ok(()) => info!(%topic, "created topic"),
        Err(error) if error.is_already_exists() => debug!(%topic, "topic already exists"),
        Err(error) => return Err(error.into()),
    }

    let name = generate_subscription_name(prefix, Utc::now().timestamp_millis());
    transport.create_subscription(&name, topic).await?;
    store
        .store(&SubscriptionRecord {
            subscription_name: name.clone(),
            topic_name: topic.clone(),
        })
        .await?;
    info!(subscription = %name, %topic, "created subscription");
    Ok(name)
}

/// Builds a subscription name as `<prefix><timestamp_millis>`.
///
/// With the default `<topic>_<hostname>_` prefix this yields names that are
/// human-traceable and collision-resistant across hosts and processes
/// without any coordination.
pub fn generate_subscription_name(prefix: &str, timestamp_millis: i64) -> SubscriptionName {
    // The timestamp digits guarantee a non-empty name even for an empty prefix.
    SubscriptionName::new(format!("{prefix}{timestamp_millis}"))
        .expect("generated subscription name is never empty")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::TransportError;

    /// Recording transport double. `topic_error` is taken (once) as the
    /// result of the next `create_topic` call.
    #[derive(Default)]
    struct RecordingTransport {
        created_topics: Mutex<Vec<String>>,
        created_subscriptions: Mutex<Vec<(String, String)>>,
        topic_error: Mutex<Option<TransportError>>,
    }

    impl RecordingTransport {
        fn with_topic_error(error: TransportError) -> Self {
            Self {
                topic_error: Mutex::new(Some(error)),
                ..Self::default()
            }
        }

        fn created_subscription_count(&self) -> usize {
            self.created_subscriptions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn create_topic(&self, topic: &TopicName) -> Result<(), TransportError> {
            if let Some(error) = self.topic_error.lock().unwrap().take() {
                return Err(error);
            }
            self.created_topics
                .lock()
                .unwrap()
                .push(topic.as_str().to_owned());
            Ok(())
        }

        async fn create_subscription(
            &self,
            name: &SubscriptionName,
            topic: &TopicName,
        ) -> Result<(), TransportError> {
            self.created_subscriptions
                .lock()
                .unwrap()
                .push((name.as_str().to_owned(), topic.as_str().to_owned()));
            Ok(())
        }
    }

    fn topic(name: &str) -> TopicName {
        TopicName::new(name).unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("data.json"))
    }

    #[tokio::test]
    async fn first_run_creates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let transport = RecordingTransport::default();

        let name = resolve(&transport, &store, &topic("vms_cd"), "vms_cd_host_")
            .await
            .unwrap();

        assert!(name.as_str().starts_with("vms_cd_host_"));
        assert_eq!(transport.created_subscription_count(), 1);
        let record = store.load().await.unwrap();
        assert_eq!(record.subscription_name, name);
        assert_eq!(record.topic_name, topic("vms_cd"));
    }

    #[tokio::test]
    async fn matching_record_is_reused_without_remote_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .store(&SubscriptionRecord {
                subscription_name: SubscriptionName::new("vms_cd_host_1700000000000").unwrap(),
                topic_name: topic("vms_cd"),
            })
            .await
            .unwrap();
        let transport = RecordingTransport::default();

        for _ in 0..2 {
            let name = resolve(&transport, &store, &topic("vms_cd"), "vms_cd_host_")
                .await
                .unwrap();
            assert_eq!(name.as_str(), "vms_cd_host_1700000000000");
        }
        assert!(transport.created_topics.lock().unwrap().is_empty());
        assert_eq!(transport.created_subscription_count(), 0);
    }

    #[tokio::test]
    async fn stale_record_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .store(&SubscriptionRecord {
                subscription_name: SubscriptionName::new("old_topic_host_1").unwrap(),
                topic_name: topic("old_topic"),
            })
            .await
            .unwrap();
        let transport = RecordingTransport::default();

        let name = resolve(&transport, &store, &topic("new_topic"), "new_topic_host_")
            .await
            .unwrap();

        assert_ne!(name.as_str(), "old_topic_host_1");
        assert_eq!(transport.created_subscription_count(), 1);
        let record = store.load().await.unwrap();
        assert_eq!(record.topic_name, topic("new_topic"));
        assert_eq!(record.subscription_name, name);
    }

    #[tokio::test]
    async fn unparsable_record_counts_as_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json at all").unwrap();
        let store = RecordStore::new(path);
        let transport = RecordingTransport::default();

        resolve(&transport, &store, &topic("vms_cd"), "p_")
            .await
            .unwrap();

        assert_eq!(transport.created_subscription_count(), 1);
        assert!(store.load().await.is_some());
    }

    #[tokio::test]
    async fn existing_topic_collision_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let transport = RecordingTransport::with_topic_error(TransportError::AlreadyExists {
            resource: "topic vms_cd".into(),
        });

        resolve(&transport, &store, &topic("vms_cd"), "p_")
            .await
            .unwrap();

        assert_eq!(transport.created_subscription_count(), 1);
    }

    #[tokio::test]
    async fn other_topic_creation_failures_are_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let transport = RecordingTransport::with_topic_error(TransportError::Request {
            context: "create topic vms_cd".into(),
            source: "permission denied".into(),
        });

        let result = resolve(&transport, &store, &topic("vms_cd"), "p_").await;

        assert!(matches!(result, Err(RelayError::Transport(_))));
        assert_eq!(transport.created_subscription_count(), 0);
        assert!(store.load().await.is_none());
    }

    #[test]
    fn generated_names_share_prefix_and_differ_by_timestamp() {
        let a = generate_subscription_name("vms_cd_host_", 1_700_000_000_000);
        let b = generate_subscription_name("vms_cd_host_", 1_700_000_000_001);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("vms_cd_host_"));
        assert!(b.as_str().starts_with("vms_cd_host_"));
        assert_eq!(a.as_str(), "vms_cd_host_1700000000000");
    }
}
