use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use rand::Rng;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::{AuthProvider, Session, SignIn};
use crate::constants::{OTP_TTL_SECS, SESSION_TTL_SECS};
use crate::db::{decode, encode, tables, Db};
use crate::error::{AppError, Result};
use crate::models::{Role, UserRecord};

/// Session record stored in redb, keyed by bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    /// When the session stops resolving (Unix timestamp)
    pub expires_at: i64,
}

/// Staged one-time code, keyed by email
/// Only the SHA-256 of the code is kept at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code_hash: String,
    pub expires_at: i64,
}

/// Store-backed auth provider: bearer sessions and email one-time codes
///
/// Users are provisioned on first sign-in; addresses listed in the
/// configured admin set receive the ADMIN role.
pub struct StoreAuth {
    db: Db,
    admin_emails: Vec<String>,
}

impl StoreAuth {
    pub fn new(db: Db, admin_emails: Vec<String>) -> Self {
        Self {
            db,
            admin_emails: admin_emails
                .into_iter()
                .map(|e| e.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.iter().any(|e| e == email) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// SHA-256 hex digest of a one-time code
fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random hex string of `bytes * 2` characters
fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(&mut buf[..]);
    hex::encode(buf)
}

/// Random 6-digit one-time code, zero-padded
fn random_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[async_trait]
impl AuthProvider for StoreAuth {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>> {
        let token = match bearer_token(headers) {
            Some(token) => token.to_string(),
            None => return Ok(None),
        };

        let db = self.db.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<Session>> {
            let now = Utc::now().timestamp();
            let read_txn = db.begin_read()?;

            let sessions = read_txn.open_table(tables::SESSIONS)?;
            let record: SessionRecord = match sessions.get(token.as_str())? {
                Some(bytes) => decode(bytes.value())?,
                None => return Ok(None),
            };
            if record.expires_at <= now {
                return Ok(None);
            }

            // A session can outlive its user if the account was removed on
            // the provider side; treat that as signed out, not an error
            let users = read_txn.open_table(tables::USERS)?;
            let user: UserRecord = match users.get(record.user_id.as_str())? {
                Some(bytes) => decode(bytes.value())?,
                None => return Ok(None),
            };

            Ok(Some(Session {
                user_id: record.user_id,
                role: user.role,
            }))
        })
        .await?
    }

    async fn issue_otp(&self, email: &str) -> Result<String> {
        let code = random_otp();
        let record = OtpRecord {
            code_hash: hash_code(&code),
            expires_at: Utc::now().timestamp() + OTP_TTL_SECS,
        };

        let db = self.db.clone();
        let email = email.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write()?;
            {
                let mut codes = write_txn.open_table(tables::OTP_CODES)?;
                // Re-requesting replaces any previously staged code
                let bytes = encode(&record)?;
                codes.insert(email.as_str(), bytes.as_slice())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await??;

        Ok(code)
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<SignIn> {
        let db = self.db.clone();
        let email = email.to_string();
        let code_hash = hash_code(code.trim());
        let first_sign_in_role = self.role_for(&email);

        tokio::task::spawn_blocking(move || -> Result<SignIn> {
            let now = Utc::now().timestamp();
            let write_txn = db.begin_write()?;
            let signin;
            {
                // 1. Redeem the staged code (single use)
                let mut codes = write_txn.open_table(tables::OTP_CODES)?;
                let staged: OtpRecord = match codes.get(email.as_str())? {
                    Some(bytes) => decode(bytes.value())?,
                    None => return Err(AppError::InvalidOtp),
                };
                if staged.expires_at <= now || staged.code_hash != code_hash {
                    tracing::warn!("Rejected one-time code for {}", email);
                    return Err(AppError::InvalidOtp);
                }
                codes.remove(email.as_str())?;
                drop(codes);

                // 2. Look up the user by email, provisioning on first sign-in
                let mut emails = write_txn.open_table(tables::USER_EMAILS)?;
                let existing = emails.get(email.as_str())?.map(|v| v.value().to_string());
                let mut users = write_txn.open_table(tables::USERS)?;
                let (user_id, user) = match existing {
                    Some(id) => {
                        let record: UserRecord = users
                            .get(id.as_str())?
                            .map(|bytes| decode(bytes.value()))
                            .transpose()?
                            .ok_or(AppError::UserNotFound)?;
                        (id, record)
                    }
                    None => {
                        let id = random_hex(16);
                        let name = email.split('@').next().unwrap_or_default().to_string();
                        let record = UserRecord {
                            name,
                            email: email.clone(),
                            role: first_sign_in_role,
                            created_at: now,
                        };
                        let bytes = encode(&record)?;
                        users.insert(id.as_str(), bytes.as_slice())?;
                        emails.insert(email.as_str(), id.as_str())?;
                        tracing::info!("Provisioned user {} on first sign-in", id);
                        (id, record)
                    }
                };
                drop(users);
                drop(emails);

                // 3. Issue the bearer session
                let token = random_hex(32);
                let session_record = SessionRecord {
                    user_id: user_id.clone(),
                    expires_at: now + SESSION_TTL_SECS,
                };
                let mut sessions = write_txn.open_table(tables::SESSIONS)?;
                let bytes = encode(&session_record)?;
                sessions.insert(token.as_str(), bytes.as_slice())?;

                signin = SignIn {
                    token,
                    user_id,
                    user,
                };
            }
            write_txn.commit()?;
            Ok(signin)
        })
        .await?
    }

    async fn issue_reset_token(&self, _email: &str) -> Result<String> {
        // Redemption happens in the provider-hosted flow; the token is only
        // embedded in the emailed link and never persisted here
        Ok(random_hex(32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_code_is_stable_hex() {
        let hash = hash_code("123456");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_code("123456"));
        assert_ne!(hash, hash_code("654321"));
    }

    #[test]
    fn test_random_otp_shape() {
        for _ in 0..50 {
            let code = random_otp();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
