use redb::{Database, ReadableTable};

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::UserRecord;

/// Fetch a user record
pub fn get(db: &Database, user_id: &str) -> Result<UserRecord> {
    let read_txn = db.begin_read()?;
    let users = read_txn.open_table(tables::USERS)?;
    users
        .get(user_id)?
        .map(|bytes| decode(bytes.value()))
        .transpose()?
        .ok_or(AppError::UserNotFound)
}

/// Update a user's profile name
///
/// The only user field this service owns; everything else belongs to the
/// auth collaborator.
pub fn update_name(db: &Database, user_id: &str, name: &str) -> Result<UserRecord> {
    let write_txn = db.begin_write()?;
    let record;
    {
        let mut users = write_txn.open_table(tables::USERS)?;
        let existing: UserRecord = match users.get(user_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::UserNotFound),
        };

        record = UserRecord {
            name: name.to_string(),
            ..existing
        };
        let bytes = encode(&record)?;
        users.insert(user_id, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, crate::db::Db) {
        let tmp = TempDir::new().unwrap();
        let db = crate::db::open_database(tmp.path().join("test.db")).unwrap();
        (tmp, db)
    }

    fn seed_user(db: &Database, id: &str) {
        let record = UserRecord {
            name: "reader".to_string(),
            email: "reader@example.com".to_string(),
            role: Role::User,
            created_at: 1733788800,
        };
        let write_txn = db.begin_write().unwrap();
        {
            let mut users = write_txn.open_table(tables::USERS).unwrap();
            let bytes = encode(&record).unwrap();
            users.insert(id, bytes.as_slice()).unwrap();
        }
        write_txn.commit().unwrap();
    }

    #[test]
    fn test_get_missing_user() {
        let (_tmp, db) = test_db();
        assert!(matches!(get(&db, "nobody"), Err(AppError::UserNotFound)));
    }

    #[test]
    fn test_update_name_keeps_other_fields() {
        let (_tmp, db) = test_db();
        seed_user(&db, "u1");

        let updated = update_name(&db, "u1", "bookworm").unwrap();
        assert_eq!(updated.name, "bookworm");
        assert_eq!(updated.email, "reader@example.com");
        assert_eq!(updated.role, Role::User);

        assert_eq!(get(&db, "u1").unwrap().name, "bookworm");
    }

    #[test]
    fn test_update_name_missing_user() {
        let (_tmp, db) = test_db();
        assert!(matches!(
            update_name(&db, "nobody", "x"),
            Err(AppError::UserNotFound)
        ));
    }
}
