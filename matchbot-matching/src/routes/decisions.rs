use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use matchbot_shared::errors::{AppError, AppResult};
use matchbot_shared::types::ApiResponse;

use crate::events::publisher;
use crate::matching::decision::{Acknowledgment, Decision, MatchNotification};
use crate::models::UserId;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub target_id: UserId,
    pub decision: Decision,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub acknowledgment: Acknowledgment,
    /// For the actor, naming the target. Present only when this decision completed a match.
    pub actor_notification: Option<MatchNotification>,
    /// For the target, naming the actor. Present only when this decision completed a match.
    pub target_notification: Option<MatchNotification>,
    /// Notifications the broker confirmed (0 without a broker).
    pub notifications_delivered: usize,
}

// --- POST /profiles/:user_id/decisions ---

pub async fn submit_decision(
    State(state): State<Arc<AppState>>,
    Path(actor_id): Path<UserId>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<Json<ApiResponse<DecisionResponse>>> {
    let outcome = {
        let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
        state
            .engine
            .submit(&mut conn, actor_id, req.target_id, req.decision)?
    };

    let notifications_delivered =
        publisher::publish_match_notifications(state.rabbitmq.as_ref(), &outcome).await;

    let message = outcome.acknowledgment.message();
    Ok(Json(ApiResponse::ok_with_message(
        DecisionResponse {
            acknowledgment: outcome.acknowledgment,
            actor_notification: outcome.actor_notification,
            target_notification: outcome.target_notification,
            notifications_delivered,
        },
        message,
    )))
}
