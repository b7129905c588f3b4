use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::auth::require_user;
use crate::error::Result;
use crate::store;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MarkResponse {
    pub marked: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadResponse {
    pub times: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub marked: bool,
    #[serde(rename = "readTimes")]
    pub read_times: u64,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

/// Toggle the caller's mark on an article
pub async fn toggle_mark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(article_id): Path<u64>,
) -> Result<Json<MarkResponse>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let marked = tokio::task::spawn_blocking(move || {
        store::interactions::toggle_mark(&db, &user_id, article_id)
    })
    .await??;

    tracing::info!(
        "Article {} {} by {}",
        article_id,
        if marked { "marked" } else { "unmarked" },
        session.user_id
    );

    Ok(Json(MarkResponse { marked }))
}

/// Register a read event for the caller on an article
///
/// Every call increments; the presentation layer invokes it once per page
/// view.
pub async fn increment_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(article_id): Path<u64>,
) -> Result<Json<ReadResponse>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let times = tokio::task::spawn_blocking(move || {
        store::interactions::increment_read(&db, &user_id, article_id)
    })
    .await??;

    Ok(Json(ReadResponse { times }))
}

/// The caller's relationship with an article
///
/// Anonymous callers get zero-valued stats without touching the store;
/// this endpoint never errors for them, whatever the article id.
pub async fn article_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(article_id): Path<u64>,
) -> Result<Json<StatsResponse>> {
    let session = match state.auth.get_session(&headers).await? {
        Some(session) => session,
        None => {
            return Ok(Json(StatsResponse {
                marked: false,
                read_times: 0,
                is_logged_in: false,
            }));
        }
    };

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let (marked, read_times) = tokio::task::spawn_blocking(move || {
        store::interactions::stats(&db, &user_id, article_id)
    })
    .await??;

    Ok(Json(StatsResponse {
        marked,
        read_times,
        is_logged_in: true,
    }))
}
