//! Core domain for cd_relay.
//!
//! This crate contains the subscription-identity protocol and the per-message
//! dispatch rules, plus the port traits infrastructure crates implement.
//! Everything here is testable without a live Pub/Sub service.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** The only I/O performed here is the
//! local record file; all remote operations go through the [`Transport`] and
//! [`Pipeline`] ports, supplied by `transport-gcp` and the binary.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TopicName`, `SubscriptionName`, `ProjectId`) |
//! | [`record`] | The persisted subscription record and its file store |
//! | [`resolver`] | Startup resolution: reuse or create a subscription |
//! | [`dispatcher`] | Per-message JSON decode and pipeline hand-off |
//! | [`ports`] | `Transport` and `Pipeline` trait definitions |
//! | [`errors`] | Cross-cutting error types |

pub mod dispatcher;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod record;
pub mod resolver;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use dispatcher::{dispatch, Disposition};
pub use errors::{PipelineError, RelayError, TransportError};
pub use identifiers::{ProjectId, SubscriptionName, TopicName};
pub use ports::{Pipeline, Transport};
pub use record::{RecordStore, SubscriptionRecord};
pub use resolver::{generate_subscription_name, resolve};
