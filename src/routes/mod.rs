pub mod articles;
pub mod auth;
pub mod category;
pub mod collection;
pub mod health;
pub mod interactions;
pub mod profile;
pub mod validation;

pub use articles::{
    admin_articles, create_article, delete_article, delete_articles, get_article,
    hottest_articles, latest_articles, page_articles, search_articles, update_article,
};
pub use auth::{request_otp, request_password_reset, verify_otp};
pub use category::list_categories;
pub use collection::{marked_collection, read_history};
pub use health::health_check;
pub use interactions::{article_stats, increment_read, toggle_mark};
pub use profile::{get_profile, update_profile};
pub use validation::{clamp_pagination, normalize_email};
