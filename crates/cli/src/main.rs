//! cd_relay entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — read the recognized environment variables
//!    into a [`config::Config`].
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    env-filter; every crate in the workspace logs through it.
//! 3. **Construct infrastructure** — connect the Pub/Sub transport and build
//!    the HTTP pipeline client.
//! 4. **Resolve, then listen** — run startup resolution once (fail-fast),
//!    then consume messages until the process is terminated.

mod config;
mod pipeline_http;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use relay::{resolve, RecordStore};
use transport_gcp::GcpTransport;

use crate::config::Config;
use crate::pipeline_http::HttpPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("reading configuration")?;

    let transport = GcpTransport::connect(config.project_id.as_ref())
        .await
        .context("connecting to Pub/Sub")?;

    let store = RecordStore::new(&config.data_filepath);
    let subscription = resolve(
        &transport,
        &store,
        &config.topic,
        &config.subscription_prefix,
    )
    .await
    .context("resolving subscription")?;

    info!(
        subscription = %subscription,
        topic = %config.topic,
        pipeline = %config.pipeline_url,
        "listening"
    );

    let pipeline = Arc::new(HttpPipeline::new(config.pipeline_url.clone()));
    if let Err(err) = transport.consume(&subscription, pipeline).await {
        error!(error = %err, "subscription stream failed");
        return Err(err).context("consuming messages");
    }
    Ok(())
}
