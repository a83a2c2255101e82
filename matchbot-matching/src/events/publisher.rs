use uuid::Uuid;

use matchbot_shared::clients::rabbitmq::RabbitMQClient;
use matchbot_shared::types::event::{payloads, routing_keys, Event};

use crate::matching::decision::DecisionOutcome;

const SOURCE: &str = "matchbot-matching";

/// Hand every match notification in `outcome` to the messaging layer.
///
/// Best effort: failures are logged and never undo the recorded match. Both events of one match
/// share a correlation id. Returns how many notifications the broker accepted.
pub async fn publish_match_notifications(
    rabbitmq: Option<&RabbitMQClient>,
    outcome: &DecisionOutcome,
) -> usize {
    let correlation_id = Uuid::now_v7();
    let mut delivered = 0;

    for notification in outcome.notifications() {
        let event = Event::new(
            SOURCE,
            routing_keys::MATCHING_MATCH_CREATED,
            payloads::MatchCreated::from(notification),
        )
        .with_user(notification.recipient_id)
        .with_correlation(correlation_id);

        let Some(rabbitmq) = rabbitmq else {
            tracing::info!(
                recipient_id = notification.recipient_id,
                matched_user_id = notification.matched_user_id,
                event_id = %event.id,
                "no broker configured, match notification not delivered"
            );
            continue;
        };

        match rabbitmq
            .publish(routing_keys::MATCHING_MATCH_CREATED, &event)
            .await
        {
            Ok(()) => delivered += 1,
            Err(e) => tracing::error!(
                error = %e,
                recipient_id = notification.recipient_id,
                matched_user_id = notification.matched_user_id,
                "failed to deliver match notification"
            ),
        }
    }

    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::decision::{Acknowledgment, MatchNotification};

    #[tokio::test]
    async fn without_a_broker_nothing_is_delivered() {
        let outcome = DecisionOutcome {
            acknowledgment: Acknowledgment::Matched,
            actor_notification: Some(MatchNotification {
                recipient_id: 1,
                matched_user_id: 2,
                matched_display_name: "Bea".into(),
                matched_handle: None,
            }),
            target_notification: Some(MatchNotification {
                recipient_id: 2,
                matched_user_id: 1,
                matched_display_name: "Al".into(),
                matched_handle: Some("al".into()),
            }),
        };

        assert_eq!(publish_match_notifications(None, &outcome).await, 0);
    }
}
