use axum::Json;

use crate::models::{Category, CategoryView};

/// Enumerate the closed category set
///
/// The set is fixed at compile time; no store access is needed.
pub async fn list_categories() -> Json<Vec<CategoryView>> {
    Json(Category::ALL.iter().copied().map(CategoryView::from).collect())
}
