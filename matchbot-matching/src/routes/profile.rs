use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use matchbot_shared::errors::{AppError, AppResult, ErrorCode};
use matchbot_shared::types::ApiResponse;

use crate::models::{Gender, NewProfile, Preference, Profile, UserId};
use crate::store::{self, profiles};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterProfileRequest {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    pub display_name: String,
    #[validate(range(min = 1, max = 150, message = "age must be a positive number"))]
    pub age: i32,
    pub gender: String,
    pub preference: String,
    /// Comma-separated, e.g. "music, cricket, coding".
    #[serde(default)]
    #[validate(length(max = 500, message = "interests must be at most 500 characters"))]
    pub interests: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "bio must be at most 1000 characters"))]
    pub bio: String,
    #[validate(length(max = 64, message = "handle must be at most 64 characters"))]
    pub handle: Option<String>,
}

// --- PUT /profiles/:user_id ---

/// Create or fully replace the caller's profile.
pub async fn register_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
    Json(req): Json<RegisterProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    req.validate().map_err(|e| {
        AppError::with_details(
            ErrorCode::ValidationError,
            "invalid profile",
            serde_json::to_value(&e).unwrap_or_default(),
        )
    })?;

    let display_name = req.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::Validation("name must not be blank".into()));
    }
    let gender = req
        .gender
        .parse::<Gender>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let preference = req
        .preference
        .parse::<Preference>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let handle = req
        .handle
        .as_deref()
        .map(|h| h.trim().trim_start_matches('@'))
        .filter(|h| !h.is_empty());

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    profiles::save_profile(
        &mut conn,
        &NewProfile {
            user_id,
            display_name,
            age: Some(req.age),
            gender: gender.as_str(),
            preference: preference.as_str(),
            interests: req.interests.trim(),
            bio: req.bio.trim(),
            handle,
            created_at: store::now(),
        },
    )?;

    let profile = profiles::get_profile(&mut conn, user_id)?
        .ok_or_else(|| AppError::internal("profile missing after save"))?;

    tracing::info!(user_id, gender = %gender, preference = %preference, "profile registered");

    Ok(Json(ApiResponse::ok_with_message(
        profile,
        "Profile saved! Ask for a match whenever you're ready.",
    )))
}

// --- GET /profiles/:user_id ---

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let profile = profiles::get_profile(&mut conn, user_id)?.ok_or_else(AppError::not_registered)?;

    Ok(Json(ApiResponse::ok(profile)))
}
