//! Newtype domain identifiers.
//!
//! Every name the listener passes around is a distinct newtype wrapping a
//! `String`. This prevents accidentally interchanging — for example — a
//! [`TopicName`] with a [`SubscriptionName`] even though both are plain
//! strings on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// A Pub/Sub topic name as configured via `PUBSUB_TOPIC`.
    ///
    /// This is the short topic id, not the fully qualified
    /// `projects/<p>/topics/<t>` resource name; qualification is the
    /// transport's concern.
    TopicName
}

string_id! {
    /// The service-assigned name of a durable subscription.
    ///
    /// Generated names follow `<prefix><millis-since-epoch>` (see
    /// [`crate::resolver::generate_subscription_name`]) so they stay
    /// human-traceable and collision-resistant across hosts.
    SubscriptionName
}

string_id! {
    /// A Google Cloud project identifier (`GCP_PROJECT_ID`).
    ProjectId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(TopicName::new("").is_none());
        assert!(SubscriptionName::new(String::new()).is_none());
    }

    #[test]
    fn identifier_round_trips_as_str() {
        let topic = TopicName::new("vms_cd").unwrap();
        assert_eq!(topic.as_str(), "vms_cd");
        assert_eq!(topic.to_string(), "vms_cd");
    }
}
