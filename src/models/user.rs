use serde::{Deserialize, Serialize};

use crate::models::timestamp_to_rfc3339;

/// User role; ADMIN unlocks the article management endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// User record stored in redb
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// User shape returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl UserView {
    /// Build the API shape from a stored record
    pub fn from_record(id: &str, record: &UserRecord) -> Self {
        UserView {
            id: id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role,
            created_at: timestamp_to_rfc3339(record.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{decode, encode};

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_user_record_round_trip() {
        let record = UserRecord {
            name: "reader".to_string(),
            email: "reader@example.com".to_string(),
            role: Role::User,
            created_at: 1733788800,
        };

        let bytes = encode(&record).unwrap();
        let decoded: UserRecord = decode(&bytes).unwrap();

        assert_eq!(decoded.email, record.email);
        assert_eq!(decoded.role, Role::User);
        assert_eq!(decoded.created_at, record.created_at);
    }
}
