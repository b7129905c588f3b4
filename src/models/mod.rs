pub mod article;
pub mod category;
pub mod cooldown;
pub mod interaction;
pub mod user;

pub use article::{ArticleInput, ArticleRecord, ArticleView};
pub use category::{Category, CategoryView};
pub use cooldown::{CooldownRecord, CooldownStatus};
pub use interaction::{MarkRecord, ReadCountRecord};
pub use user::{Role, UserRecord, UserView};

use chrono::{DateTime, Utc};

/// Convert Unix timestamp to RFC3339 string, defaulting to now if invalid
///
/// Records store Unix seconds; the API edge speaks RFC3339.
pub fn timestamp_to_rfc3339(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        assert_eq!(timestamp_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
        assert!(timestamp_to_rfc3339(1733788800).starts_with("2024-12-10"));
    }
}
