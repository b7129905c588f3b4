use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::auth::require_user;
use crate::constants::{ERR_NAME_REQUIRED, MAX_NAME_CHARS};
use crate::error::{AppError, Result};
use crate::models::{UserRecord, UserView};
use crate::store;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserView,
    #[serde(rename = "markedCount")]
    pub marked_count: u64,
    #[serde(rename = "readCount")]
    pub read_count: u64,
    #[serde(rename = "totalReadTimes")]
    pub total_read_times: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
}

/// The caller's profile with interaction totals
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let (user, counts) = tokio::task::spawn_blocking(
        move || -> Result<(UserRecord, store::interactions::InteractionCounts)> {
            let user = store::users::get(&db, &user_id)?;
            let counts = store::interactions::counts(&db, &user_id)?;
            Ok((user, counts))
        },
    )
    .await??;

    Ok(Json(ProfileResponse {
        user: UserView::from_record(&session.user_id, &user),
        marked_count: counts.marked,
        read_count: counts.read_articles,
        total_read_times: counts.total_times,
    }))
}

/// Rename the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserView>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput(ERR_NAME_REQUIRED.to_string()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let record =
        tokio::task::spawn_blocking(move || store::users::update_name(&db, &user_id, &name))
            .await??;

    tracing::info!("User {} renamed their profile", session.user_id);

    Ok(Json(UserView::from_record(&session.user_id, &record)))
}
