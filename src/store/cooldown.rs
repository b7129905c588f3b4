use chrono::Utc;
use redb::{Database, ReadableTable};

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::CooldownRecord;

/// Gate an outbound email behind the per-address cooldown
///
/// Blocked addresses fail with `RateLimited` carrying the remaining wait;
/// expired rows are cleared so the ledger only holds live cooldowns. The
/// caller contacts the mail provider only after this returns Ok, and calls
/// `record_send` only after the provider confirms delivery — a failed send
/// leaves no cooldown behind.
pub fn begin_send(db: &Database, email: &str, window_secs: i64) -> Result<()> {
    let now = Utc::now().timestamp();
    let write_txn = db.begin_write()?;
    {
        let mut cooldowns = write_txn.open_table(tables::EMAIL_COOLDOWNS)?;
        let record: Option<CooldownRecord> = cooldowns
            .get(email)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?;

        if let Some(record) = record {
            let status = record.check(now, window_secs);
            if status.blocked {
                tracing::warn!(
                    "Email to {} blocked for another {}s",
                    email,
                    status.remaining_seconds
                );
                return Err(AppError::RateLimited {
                    remaining_seconds: status.remaining_seconds,
                });
            }
            // Stale row: clear it so the ledger reads as "no record"
            cooldowns.remove(email)?;
        }
    }
    write_txn.commit()?;

    Ok(())
}

/// Record a confirmed successful send for the address
pub fn record_send(db: &Database, email: &str) -> Result<()> {
    let now = Utc::now().timestamp();
    let write_txn = db.begin_write()?;
    {
        let mut cooldowns = write_txn.open_table(tables::EMAIL_COOLDOWNS)?;
        let record = CooldownRecord {
            last_email_sent_at: now,
        };
        let bytes = encode(&record)?;
        cooldowns.insert(email, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WINDOW: i64 = 60;

    fn test_db() -> (TempDir, crate::db::Db) {
        let tmp = TempDir::new().unwrap();
        let db = crate::db::open_database(tmp.path().join("test.db")).unwrap();
        (tmp, db)
    }

    #[test]
    fn test_first_send_is_unconditional() {
        let (_tmp, db) = test_db();
        assert!(begin_send(&db, "a@example.com", WINDOW).is_ok());
    }

    #[test]
    fn test_recorded_send_blocks_with_remaining() {
        let (_tmp, db) = test_db();

        record_send(&db, "a@example.com").unwrap();
        match begin_send(&db, "a@example.com", WINDOW) {
            Err(AppError::RateLimited { remaining_seconds }) => {
                assert!(remaining_seconds > 0 && remaining_seconds <= WINDOW);
            }
            other => panic!("expected RateLimited, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_unrecorded_check_leaves_gate_open() {
        let (_tmp, db) = test_db();

        // begin_send alone never starts a cooldown
        begin_send(&db, "a@example.com", WINDOW).unwrap();
        assert!(begin_send(&db, "a@example.com", WINDOW).is_ok());
    }

    #[test]
    fn test_addresses_are_independent() {
        let (_tmp, db) = test_db();

        record_send(&db, "a@example.com").unwrap();
        assert!(begin_send(&db, "b@example.com", WINDOW).is_ok());
    }

    #[test]
    fn test_zero_window_disables_gating() {
        let (_tmp, db) = test_db();

        record_send(&db, "a@example.com").unwrap();
        assert!(begin_send(&db, "a@example.com", 0).is_ok());
    }
}
