use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use matchbot_shared::errors::{AppError, AppResult};
use matchbot_shared::types::ApiResponse;

use crate::models::UserId;
use crate::store::{interactions, profiles};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchView {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub handle: Option<String>,
    pub matched_at: NaiveDateTime,
}

// --- GET /profiles/:user_id/matches ---

/// The caller's matches, newest first, with the other side's contact details.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<ApiResponse<Vec<MatchView>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    profiles::get_profile(&mut conn, user_id)?.ok_or_else(AppError::not_registered)?;

    let matches = interactions::list_matches(&mut conn, user_id)?;
    let partner_ids: Vec<UserId> = matches.iter().map(|m| m.counterpart(user_id)).collect();
    let mut partners: HashMap<UserId, _> = profiles::get_profiles(&mut conn, &partner_ids)?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect();

    let views = matches
        .into_iter()
        .map(|m| {
            let other = m.counterpart(user_id);
            let partner = partners.remove(&other);
            MatchView {
                user_id: other,
                display_name: partner.as_ref().map(|p| p.display_name.clone()),
                handle: partner.and_then(|p| p.handle),
                matched_at: m.created_at,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(views)))
}
