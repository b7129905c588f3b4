use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::constants::{
    ADMIN_TITLE_MAX_CHARS, CATEGORY_PAGE_SIZE, ERR_IDS_REQUIRED, ERR_QUERY_REQUIRED,
    HOTTEST_ARTICLE_COUNT, LATEST_ARTICLE_COUNT,
};
use crate::error::{AppError, Result};
use crate::models::{ArticleInput, ArticleView, Category};
use crate::routes::validation::clamp_pagination;
use crate::store;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ArticlePageParams {
    pub category: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ArticlePageResponse {
    pub articles: Vec<ArticleView>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    #[serde(default)]
    pub ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteManyResponse {
    pub message: String,
    pub deleted: u64,
}

/// Create an article (admin)
///
/// All field checks and the closed-set category lookup run before any store
/// write.
pub async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ArticleInput>,
) -> Result<(StatusCode, Json<ArticleView>)> {
    let session = require_admin(state.auth.get_session(&headers).await?)?;
    let category = payload.validate()?;

    let db = state.db.clone();
    let (id, record) =
        tokio::task::spawn_blocking(move || store::articles::create(&db, &payload, category))
            .await??;

    tracing::info!("Article {} created by {}", id, session.user_id);

    Ok((StatusCode::CREATED, Json(ArticleView::from_record(id, &record))))
}

/// Fetch one article with its category
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ArticleView>> {
    let db = state.db.clone();
    let record = tokio::task::spawn_blocking(move || store::articles::get(&db, id)).await??;

    Ok(Json(ArticleView::from_record(id, &record)))
}

/// Update an article's mutable fields (admin)
pub async fn update_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(payload): Json<ArticleInput>,
) -> Result<Json<ArticleView>> {
    let session = require_admin(state.auth.get_session(&headers).await?)?;
    let category = payload.validate()?;

    let db = state.db.clone();
    let record =
        tokio::task::spawn_blocking(move || store::articles::update(&db, id, &payload, category))
            .await??;

    tracing::info!("Article {} updated by {}", id, session.user_id);

    Ok(Json(ArticleView::from_record(id, &record)))
}

/// Delete one article (admin); cascades its interaction rows
pub async fn delete_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    let session = require_admin(state.auth.get_session(&headers).await?)?;

    let db = state.db.clone();
    tokio::task::spawn_blocking(move || store::articles::delete(&db, id)).await??;

    tracing::info!("Article {} deleted by {}", id, session.user_id);

    Ok(Json(DeleteResponse {
        message: "Article deleted".to_string(),
    }))
}

/// Bulk delete (admin); best-effort over the id set
pub async fn delete_articles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DeleteManyRequest>,
) -> Result<Json<DeleteManyResponse>> {
    let session = require_admin(state.auth.get_session(&headers).await?)?;

    if payload.ids.is_empty() {
        return Err(AppError::InvalidInput(ERR_IDS_REQUIRED.to_string()));
    }

    let db = state.db.clone();
    let ids = payload.ids.clone();
    let deleted =
        tokio::task::spawn_blocking(move || store::articles::delete_many(&db, &ids)).await??;

    tracing::info!(
        "{} of {} articles deleted by {}",
        deleted,
        payload.ids.len(),
        session.user_id
    );

    Ok(Json(DeleteManyResponse {
        message: format!("{} articles deleted", deleted),
        deleted,
    }))
}

/// Paginated listing, optionally scoped to a category, newest first
pub async fn page_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticlePageParams>,
) -> Result<Json<ArticlePageResponse>> {
    let category = match params.category.as_deref() {
        Some(name) if !name.is_empty() => Some(
            Category::parse(name)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown category: {}", name)))?,
        ),
        _ => None,
    };
    let (page, limit) = clamp_pagination(params.page, params.limit, CATEGORY_PAGE_SIZE);

    let db = state.db.clone();
    let (rows, total) = tokio::task::spawn_blocking(move || {
        store::articles::page_by_category(&db, category, page, limit)
    })
    .await??;

    Ok(Json(ArticlePageResponse {
        articles: rows
            .iter()
            .map(|(id, record)| ArticleView::from_record(*id, record))
            .collect(),
        total,
        page,
        limit,
    }))
}

/// The most recently published articles
pub async fn latest_articles(State(state): State<AppState>) -> Result<Json<Vec<ArticleView>>> {
    let db = state.db.clone();
    let rows =
        tokio::task::spawn_blocking(move || store::articles::latest(&db, LATEST_ARTICLE_COUNT))
            .await??;

    Ok(Json(to_views(&rows)))
}

/// The most read articles, by the denormalized aggregate
pub async fn hottest_articles(State(state): State<AppState>) -> Result<Json<Vec<ArticleView>>> {
    let db = state.db.clone();
    let rows =
        tokio::task::spawn_blocking(move || store::articles::hottest(&db, HOTTEST_ARTICLE_COUNT))
            .await??;

    Ok(Json(to_views(&rows)))
}

/// Case-insensitive title search
pub async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ArticleView>>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::InvalidInput(ERR_QUERY_REQUIRED.to_string()))?
        .to_string();

    let db = state.db.clone();
    let rows =
        tokio::task::spawn_blocking(move || store::articles::search(&db, &query)).await??;

    Ok(Json(to_views(&rows)))
}

/// Full listing for the admin dashboard, long titles truncated
pub async fn admin_articles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ArticleView>>> {
    require_admin(state.auth.get_session(&headers).await?)?;

    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || store::articles::list_all(&db)).await??;

    let views = rows
        .iter()
        .map(|(id, record)| {
            let mut view = ArticleView::from_record(*id, record);
            view.title = truncate_title(&view.title, ADMIN_TITLE_MAX_CHARS);
            view
        })
        .collect();

    Ok(Json(views))
}

fn to_views(rows: &[(u64, crate::models::ArticleRecord)]) -> Vec<ArticleView> {
    rows.iter()
        .map(|(id, record)| ArticleView::from_record(*id, record))
        .collect()
}

/// Truncate a title to at most `max_chars` characters, appending an ellipsis
fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut truncated: String = title.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short", 80), "short");

        let long = "x".repeat(100);
        let truncated = truncate_title(&long, 80);
        assert_eq!(truncated.chars().count(), 81);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_truncate_title_counts_chars_not_bytes() {
        let title = "日".repeat(90);
        let truncated = truncate_title(&title, 80);
        assert_eq!(truncated.chars().count(), 81);
    }
}
