use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use matchbot_shared::errors::{AppError, AppResult};
use matchbot_shared::types::ApiResponse;

use crate::matching::filter::find_candidates;
use crate::matching::scoring::ScoredCandidate;
use crate::models::{Profile, UserId};
use crate::store::profiles;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub limit: Option<usize>,
}

const NO_CANDIDATES: &str = "No matches found right now. Try again later.";

/// Registered users only; everyone else is told to register first.
fn ensure_registered(conn: &mut diesel::sqlite::SqliteConnection, user_id: UserId) -> AppResult<()> {
    match profiles::get_profile(conn, user_id)? {
        Some(_) => Ok(()),
        None => Err(AppError::not_registered()),
    }
}

// --- GET /profiles/:user_id/candidates ---

pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Query(query): Query<CandidateQuery>,
) -> AppResult<Json<ApiResponse<Vec<ScoredCandidate>>>> {
    let limit = state.config.candidate_limit(query.limit);
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    ensure_registered(&mut conn, user_id)?;
    let candidates = find_candidates(&mut conn, user_id, limit)?;

    Ok(Json(ApiResponse::ok(candidates)))
}

// --- GET /profiles/:user_id/candidates/top ---

pub async fn top_candidate(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<ApiResponse<Option<Profile>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    ensure_registered(&mut conn, user_id)?;
    let top = find_candidates(&mut conn, user_id, 1)?
        .into_iter()
        .next()
        .map(|c| c.profile);

    match top {
        Some(profile) => Ok(Json(ApiResponse::ok(Some(profile)))),
        None => Ok(Json(ApiResponse::ok_with_message(None, NO_CANDIDATES))),
    }
}
