//! Per-message dispatch.
//!
//! A pair of stateless reactions, held for the process lifetime: decode each
//! message body as JSON and hand it to the pipeline, or drop it with a
//! diagnostic when it does not parse. All per-message errors are contained
//! here; nothing a single message does can crash the listener.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::Pipeline;

/// What the transport should do with a message after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Acknowledge: the message is done, either processed or deliberately dropped.
    Ack,
    /// Negative-acknowledge: the transport's redelivery policy applies.
    Nack,
}

/// Handles one received message body.
///
/// Bodies that are not valid UTF-8 JSON are logged as ignored and acked;
/// decoded payloads are forwarded verbatim to the pipeline, whose completion
/// decides the disposition. No ordering is assumed relative to other
/// in-flight dispatches.
pub async fn dispatch(payload: &[u8], pipeline: &dyn Pipeline) -> Disposition {
    let event: Value = match serde_json::from_slice(payload) {
        Ok(event) => event,
        Err(error) => {
            warn!(
                payload = %String::from_utf8_lossy(payload),
                %error,
                "ignoring invalid message"
            );
            return Disposition::Ack;
        }
    };

    info!(%event, "starting pipeline run");
    match pipeline.run(event).await {
        Ok(()) => Disposition::Ack,
        Err(error) => {
            error!(%error, "pipeline run failed");
            Disposition::Nack
        }
    }
}
