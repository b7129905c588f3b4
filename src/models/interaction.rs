use serde::{Deserialize, Serialize};

/// Mark record stored in redb under a (user id, article id) key
///
/// Row presence is the mark; the record only remembers when it was set.
/// Rows are inserted and removed by the toggle operation, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkRecord {
    /// When the mark was set (Unix timestamp)
    pub created_at: i64,
}

/// Read count record stored in redb under a (user id, article id) key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadCountRecord {
    /// How many read events this user has registered on this article;
    /// always >= 1, only ever increased by the increment operation
    pub times: u64,
}
