use serde::{Deserialize, Serialize};

use crate::constants::{
    ERR_CATEGORY_REQUIRED, ERR_CONTENT_REQUIRED, ERR_DESCRIPTION_REQUIRED, ERR_IMAGE_URL_REQUIRED,
    ERR_TITLE_REQUIRED, MAX_CONTENT_BYTES, MAX_TITLE_CHARS,
};
use crate::error::{AppError, Result};
use crate::models::{timestamp_to_rfc3339, Category, CategoryView};

/// Article record stored in redb
/// Uses Unix timestamps for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub content: String,
    pub category: Category,
    /// Denormalized total of read events across all users; bumped inside the
    /// same transaction as the per-user read count
    pub read_times: u64,
    /// When the article was created (Unix timestamp)
    pub created_at: i64,
    /// When the article was last updated (Unix timestamp)
    pub updated_at: i64,
}

/// Article shape returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub id: u64,
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub description: String,
    pub content: String,
    #[serde(rename = "readTimes")]
    pub read_times: u64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub category: CategoryView,
}

impl ArticleView {
    /// Build the API shape from a stored record
    pub fn from_record(id: u64, record: &ArticleRecord) -> Self {
        ArticleView {
            id,
            title: record.title.clone(),
            image_url: record.image_url.clone(),
            description: record.description.clone(),
            content: record.content.clone(),
            read_times: record.read_times,
            created_at: timestamp_to_rfc3339(record.created_at),
            updated_at: timestamp_to_rfc3339(record.updated_at),
            category: record.category.into(),
        }
    }
}

/// Mutable article fields accepted by create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "categoryName")]
    pub category_name: String,
}

impl ArticleInput {
    /// Check all required fields and resolve the category
    ///
    /// Runs before any store write; the returned category is the parsed
    /// member of the closed set.
    pub fn validate(&self) -> Result<Category> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_TITLE_REQUIRED.to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::InvalidInput(format!(
                "Title must be at most {} characters",
                MAX_TITLE_CHARS
            )));
        }
        if self.image_url.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_IMAGE_URL_REQUIRED.to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_DESCRIPTION_REQUIRED.to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_CONTENT_REQUIRED.to_string()));
        }
        if self.content.len() > MAX_CONTENT_BYTES {
            return Err(AppError::InvalidInput(
                "Content exceeds maximum allowed size".to_string(),
            ));
        }
        if self.category_name.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_CATEGORY_REQUIRED.to_string()));
        }
        Category::parse(self.category_name.trim()).ok_or_else(|| {
            AppError::InvalidInput(format!("Unknown category: {}", self.category_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ArticleInput {
        ArticleInput {
            title: "The Silent Forests".to_string(),
            image_url: "https://img.example/forest.png".to_string(),
            description: "Where the old growth still stands".to_string(),
            content: "Full article body".to_string(),
            category_name: "nature_geography".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert_eq!(
            valid_input().validate().unwrap(),
            Category::NatureGeography
        );
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        for field in ["title", "image_url", "description", "content", "category"] {
            let mut input = valid_input();
            match field {
                "title" => input.title = "  ".to_string(),
                "image_url" => input.image_url = String::new(),
                "description" => input.description = String::new(),
                "content" => input.content = String::new(),
                _ => input.category_name = String::new(),
            }
            assert!(
                matches!(input.validate(), Err(AppError::InvalidInput(_))),
                "empty {} should be rejected",
                field
            );
        }
    }

    #[test]
    fn test_validate_rejects_unknown_category() {
        let mut input = valid_input();
        input.category_name = "not-a-real-category".to_string();
        assert!(matches!(input.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_title() {
        let mut input = valid_input();
        input.title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(matches!(input.validate(), Err(AppError::InvalidInput(_))));
    }
}
