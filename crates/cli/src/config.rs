//! Environment configuration.
//!
//! Read once at startup into a plain value owned by `main`; nothing here is
//! process-global. Recognized variables:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `DATA_FILEPATH` | Subscription record path | `data.json` in the working directory |
//! | `GCP_PROJECT_ID` | Target project for the Pub/Sub client | SDK project discovery |
//! | `PUBSUB_TOPIC` | Topic name | `vms_cd` |
//! | `SUBSCRIPTION_PREFIX` | Generated-name prefix | `<topic>_<hostname>_` |
//! | `PIPELINE_URL` | Endpoint of the external pipeline engine | required |
//! | `RUST_LOG` | `tracing-subscriber` env-filter | — |

use std::env;
use std::path::PathBuf;

use relay::{ProjectId, RelayError, TopicName};
use reqwest::Url;

const DEFAULT_TOPIC: &str = "vms_cd";
const DEFAULT_DATA_FILEPATH: &str = "data.json";

/// Runtime configuration for one process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the subscription record lives.
    pub data_filepath: PathBuf,
    /// Explicit project, or `None` to let the SDK discover one.
    pub project_id: Option<ProjectId>,
    /// The topic to bind the subscription to.
    pub topic: TopicName,
    /// Prefix for generated subscription names.
    pub subscription_prefix: String,
    /// Endpoint the decoded events are POSTed to.
    pub pipeline_url: Url,
}

impl Config {
    /// Builds a [`Config`] from the process environment.
    pub fn from_env() -> Result<Self, RelayError> {
        let topic = TopicName::new(
            env::var("PUBSUB_TOPIC").unwrap_or_else(|_| DEFAULT_TOPIC.to_owned()),
        )
        .ok_or_else(|| configuration("PUBSUB_TOPIC must not be empty"))?;

        let data_filepath = env::current_dir()
            .map_err(|e| configuration(format!("working directory is unavailable: {e}")))?
            .join(env::var("DATA_FILEPATH").unwrap_or_else(|_| DEFAULT_DATA_FILEPATH.to_owned()));

        let project_id = env::var("GCP_PROJECT_ID").ok().and_then(ProjectId::new);

        let subscription_prefix = match env::var("SUBSCRIPTION_PREFIX") {
            Ok(prefix) => prefix,
            Err(_) => default_prefix(&topic)?,
        };

        let raw_url = env::var("PIPELINE_URL")
            .map_err(|_| configuration("PIPELINE_URL is required"))?;
        let pipeline_url = Url::parse(&raw_url)
            .map_err(|e| configuration(format!("PIPELINE_URL is not a valid URL: {e}")))?;

        Ok(Self {
            data_filepath,
            project_id,
            topic,
            subscription_prefix,
            pipeline_url,
        })
    }
}

/// Default generated-name prefix: `<topic>_<hostname>_`.
fn default_prefix(topic: &TopicName) -> Result<String, RelayError> {
    let host = hostname::get()
        .map_err(|e| configuration(format!("hostname is unavailable: {e}")))?;
    Ok(format!("{topic}_{}_", host.to_string_lossy()))
}

fn configuration(message: impl Into<String>) -> RelayError {
    RelayError::Configuration {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefix_is_topic_then_hostname() {
        let topic = TopicName::new("vms_cd").unwrap();
        let prefix = default_prefix(&topic).unwrap();
        let host = hostname::get().unwrap().to_string_lossy().into_owned();
        assert_eq!(prefix, format!("vms_cd_{host}_"));
    }
}
