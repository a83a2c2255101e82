use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Event envelope published on the message broker.
///
/// Routing key format: `matchbot.{domain}.{entity}.{action}`
/// Example: `matchbot.matching.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    /// Recipient of the event on the chat platform.
    pub user_id: Option<UserId>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Broker routing keys
pub mod routing_keys {
    pub const MATCHING_MATCH_CREATED: &str = "matchbot.matching.match.created";
}

/// Event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};

    use crate::types::UserId;

    /// Sent once to each side of a new mutual match.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub recipient_id: UserId,
        pub matched_user_id: UserId,
        pub matched_display_name: String,
        pub matched_handle: Option<String>,
    }
}
