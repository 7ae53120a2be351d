//! The persisted subscription record and its file store.
//!
//! The record is the only durable state this system owns: enough identity to
//! reuse a subscription across restarts. It is read once at startup and
//! written at most once per resolution; no concurrent writers exist, so no
//! file locking is applied.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RelayError, SubscriptionName, TopicName};

/// The identity of a previously created subscription.
///
/// Serialized as pretty-printed JSON with camelCase keys:
/// `{ "subscriptionName": "...", "topicName": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    /// The service-assigned subscription name.
    pub subscription_name: SubscriptionName,
    /// The topic the subscription was bound to at creation time.
    pub topic_name: TopicName,
}

impl SubscriptionRecord {
    /// Returns `true` if this record is still valid for `topic`.
    ///
    /// A record bound to any other topic is stale and must be discarded; the
    /// old subscription is never cleaned up.
    pub fn is_current_for(&self, topic: &TopicName) -> bool {
        &self.topic_name == topic
    }
}

/// Loads and stores the subscription record at a fixed path.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Creates a store over the given record file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the record file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted record.
    ///
    /// Any failure — missing file, unreadable file, invalid JSON — means "no
    /// prior state" and returns `None`. First run looks exactly like a
    /// corrupt file here.
    pub async fn load(&self) -> Option<SubscriptionRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %self.path.display(), %error, "no readable subscription record");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(error) => {
                debug!(path = %self.path.display(), %error, "subscription record is not valid JSON");
                None
            }
        }
    }

    /// Writes `record` as pretty-printed JSON, overwriting prior content.
    ///
    /// This write is awaited on the startup path so a crash cannot leave a
    /// freshly created subscription unrecorded.
    pub async fn store(&self, record: &SubscriptionRecord) -> Result<(), RelayError> {
        let json = serde_json::to_string_pretty(record).map_err(|e| RelayError::PersistRecord {
            path: self.path.clone(),
            source: e.into(),
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| RelayError::PersistRecord {
                path: self.path.clone(),
                source,
            })
    }
}
