/// Minimum interval between outbound emails to the same address (seconds)
/// Applies to both password reset links and one-time sign-in codes
pub const DEFAULT_EMAIL_COOLDOWN_SECS: i64 = 60;

/// Lifetime of a staged one-time sign-in code (5 minutes)
pub const OTP_TTL_SECS: i64 = 300;

/// Lifetime of a bearer session (30 days)
pub const SESSION_TTL_SECS: i64 = 30 * 24 * 3600;

/// Default page size for category article listings
pub const CATEGORY_PAGE_SIZE: u64 = 16;

/// Default page size for a user's marked/history collections
pub const COLLECTION_PAGE_SIZE: u64 = 8;

/// Hard cap on client-supplied page sizes
pub const MAX_PAGE_SIZE: u64 = 100;

/// Number of articles returned by the latest-articles strip
pub const LATEST_ARTICLE_COUNT: usize = 9;

/// Number of articles returned by the hottest-articles strip
pub const HOTTEST_ARTICLE_COUNT: usize = 7;

/// Admin listings truncate titles beyond this many characters
pub const ADMIN_TITLE_MAX_CHARS: usize = 80;

/// Maximum article title length in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum profile name length in characters
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum article content size in bytes (256KB)
pub const MAX_CONTENT_BYTES: usize = 262_144;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for a missing article title
pub const ERR_TITLE_REQUIRED: &str = "Title is required";

/// Error message for a missing article image URL
pub const ERR_IMAGE_URL_REQUIRED: &str = "Image URL is required";

/// Error message for a missing article description
pub const ERR_DESCRIPTION_REQUIRED: &str = "Description is required";

/// Error message for missing article content
pub const ERR_CONTENT_REQUIRED: &str = "Content is required";

/// Error message for a missing category name
pub const ERR_CATEGORY_REQUIRED: &str = "Category is required";

/// Error message for a malformed email address
pub const ERR_INVALID_EMAIL: &str = "A valid email address is required";

/// Error message for a missing one-time code
pub const ERR_OTP_REQUIRED: &str = "One-time code is required";

/// Error message for an empty profile name
pub const ERR_NAME_REQUIRED: &str = "Name must not be empty";

/// Error message for a bulk delete with no ids
pub const ERR_IDS_REQUIRED: &str = "At least one article id is required";

/// Error message for a missing search query
pub const ERR_QUERY_REQUIRED: &str = "Search query is required";
