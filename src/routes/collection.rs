use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::require_user;
use crate::constants::COLLECTION_PAGE_SIZE;
use crate::error::Result;
use crate::models::ArticleView;
use crate::routes::validation::clamp_pagination;
use crate::store;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CollectionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MarkedPageResponse {
    pub articles: Vec<ArticleView>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub article: ArticleView,
    pub times: u64,
}

#[derive(Debug, Serialize)]
pub struct HistoryPageResponse {
    pub history: Vec<HistoryEntry>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// The caller's marked articles, newest first
pub async fn marked_collection(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CollectionParams>,
) -> Result<Json<MarkedPageResponse>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;
    let (page, limit) = clamp_pagination(params.page, params.limit, COLLECTION_PAGE_SIZE);

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let (rows, total) = tokio::task::spawn_blocking(move || {
        store::interactions::marked_page(&db, &user_id, page, limit)
    })
    .await??;

    Ok(Json(MarkedPageResponse {
        articles: rows
            .iter()
            .map(|(id, record)| ArticleView::from_record(*id, record))
            .collect(),
        total,
        page,
        limit,
    }))
}

/// The caller's read history, most-read first
pub async fn read_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CollectionParams>,
) -> Result<Json<HistoryPageResponse>> {
    let session = require_user(state.auth.get_session(&headers).await?)?;
    let (page, limit) = clamp_pagination(params.page, params.limit, COLLECTION_PAGE_SIZE);

    let db = state.db.clone();
    let user_id = session.user_id.clone();
    let (rows, total) = tokio::task::spawn_blocking(move || {
        store::interactions::history_page(&db, &user_id, page, limit)
    })
    .await??;

    Ok(Json(HistoryPageResponse {
        history: rows
            .iter()
            .map(|(id, record, times)| HistoryEntry {
                article: ArticleView::from_record(*id, record),
                times: *times,
            })
            .collect(),
        total,
        page,
        limit,
    }))
}
