use chrono::Utc;
use redb::{Database, ReadableTable};

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{ArticleRecord, MarkRecord, ReadCountRecord};

/// Per-user interaction totals for the profile endpoint
#[derive(Debug, Clone, Copy)]
pub struct InteractionCounts {
    /// Number of marked articles
    pub marked: u64,
    /// Number of distinct articles with at least one read event
    pub read_articles: u64,
    /// Sum of read events across all articles
    pub total_times: u64,
}

/// Flip the mark for a (user, article) pair
///
/// The article must exist; marks on missing articles are rejected rather
/// than left dangling. Returns the resulting state: true when the mark was
/// set, false when it was removed. The whole toggle is one write
/// transaction, so concurrent duplicate requests serialize instead of
/// racing the existence check.
pub fn toggle_mark(db: &Database, user_id: &str, article_id: u64) -> Result<bool> {
    let write_txn = db.begin_write()?;
    let marked;
    {
        let articles = write_txn.open_table(tables::ARTICLES)?;
        if articles.get(article_id)?.is_none() {
            return Err(AppError::ArticleNotFound);
        }
        drop(articles);

        let mut marks = write_txn.open_table(tables::MARKS)?;
        if marks.remove((user_id, article_id))?.is_some() {
            marked = false;
        } else {
            let record = MarkRecord {
                created_at: Utc::now().timestamp(),
            };
            let bytes = encode(&record)?;
            marks.insert((user_id, article_id), bytes.as_slice())?;
            marked = true;
        }
    }
    write_txn.commit()?;

    Ok(marked)
}

/// Register a read event for a (user, article) pair
///
/// Inserts the row at 1 or increments it, and bumps the article's
/// denormalized aggregate, all in one write transaction; two concurrent
/// increments cannot lose an update. Returns the user's resulting count.
/// Deliberately not idempotent; callers invoke it once per read event.
pub fn increment_read(db: &Database, user_id: &str, article_id: u64) -> Result<u64> {
    let write_txn = db.begin_write()?;
    let times;
    {
        let mut articles = write_txn.open_table(tables::ARTICLES)?;
        let mut article: ArticleRecord = match articles.get(article_id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::ArticleNotFound),
        };

        let mut read_counts = write_txn.open_table(tables::READ_COUNTS)?;
        let current = match read_counts.get((user_id, article_id))? {
            Some(bytes) => decode::<ReadCountRecord>(bytes.value())?.times,
            None => 0,
        };
        times = current + 1;
        let bytes = encode(&ReadCountRecord { times })?;
        read_counts.insert((user_id, article_id), bytes.as_slice())?;
        drop(read_counts);

        article.read_times += 1;
        let bytes = encode(&article)?;
        articles.insert(article_id, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(times)
}

/// Point lookups for the stats endpoint: (marked, read times)
///
/// Two independent lookups in one read transaction. Missing rows read as
/// unmarked / zero, so a deleted article yields zero-valued stats instead
/// of an error.
pub fn stats(db: &Database, user_id: &str, article_id: u64) -> Result<(bool, u64)> {
    let read_txn = db.begin_read()?;

    let marks = read_txn.open_table(tables::MARKS)?;
    let marked = marks.get((user_id, article_id))?.is_some();

    let read_counts = read_txn.open_table(tables::READ_COUNTS)?;
    let times = read_counts
        .get((user_id, article_id))?
        .map(|bytes| decode::<ReadCountRecord>(bytes.value()))
        .transpose()?
        .map(|record| record.times)
        .unwrap_or(0);

    Ok((marked, times))
}

/// Page of a user's marked articles, newest article first
pub fn marked_page(
    db: &Database,
    user_id: &str,
    page: u64,
    limit: u64,
) -> Result<(Vec<(u64, ArticleRecord)>, u64)> {
    let read_txn = db.begin_read()?;

    let marks = read_txn.open_table(tables::MARKS)?;
    let mut article_ids = Vec::new();
    for entry in marks.range((user_id, 0u64)..=(user_id, u64::MAX))? {
        let (key, _) = entry?;
        article_ids.push(key.value().1);
    }

    let articles = read_txn.open_table(tables::ARTICLES)?;
    let mut rows = Vec::new();
    for id in article_ids {
        // Rows referencing an article deleted mid-scan are skipped, not fatal
        if let Some(bytes) = articles.get(id)? {
            rows.push((id, decode::<ArticleRecord>(bytes.value())?));
        }
    }
    rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));

    let total = rows.len() as u64;
    let skip = (page.saturating_sub(1)) * limit;
    let page_rows = rows
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    Ok((page_rows, total))
}

/// Page of a user's read history, most-read first
pub fn history_page(
    db: &Database,
    user_id: &str,
    page: u64,
    limit: u64,
) -> Result<(Vec<(u64, ArticleRecord, u64)>, u64)> {
    let read_txn = db.begin_read()?;

    let read_counts = read_txn.open_table(tables::READ_COUNTS)?;
    let mut counted = Vec::new();
    for entry in read_counts.range((user_id, 0u64)..=(user_id, u64::MAX))? {
        let (key, value) = entry?;
        let record: ReadCountRecord = decode(value.value())?;
        counted.push((key.value().1, record.times));
    }

    let articles = read_txn.open_table(tables::ARTICLES)?;
    let mut rows = Vec::new();
    for (id, times) in counted {
        if let Some(bytes) = articles.get(id)? {
            rows.push((id, decode::<ArticleRecord>(bytes.value())?, times));
        }
    }
    rows.sort_by(|a, b| (b.2, b.1.created_at, b.0).cmp(&(a.2, a.1.created_at, a.0)));

    let total = rows.len() as u64;
    let skip = (page.saturating_sub(1)) * limit;
    let page_rows = rows
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    Ok((page_rows, total))
}

/// Interaction totals across all of a user's rows
pub fn counts(db: &Database, user_id: &str) -> Result<InteractionCounts> {
    let read_txn = db.begin_read()?;

    let marks = read_txn.open_table(tables::MARKS)?;
    let mut marked = 0u64;
    for entry in marks.range((user_id, 0u64)..=(user_id, u64::MAX))? {
        entry?;
        marked += 1;
    }

    let read_counts = read_txn.open_table(tables::READ_COUNTS)?;
    let mut read_articles = 0u64;
    let mut total_times = 0u64;
    for entry in read_counts.range((user_id, 0u64)..=(user_id, u64::MAX))? {
        let (_, value) = entry?;
        let record: ReadCountRecord = decode(value.value())?;
        read_articles += 1;
        total_times += record.times;
    }

    Ok(InteractionCounts {
        marked,
        read_articles,
        total_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleInput, Category};
    use crate::store::articles;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, crate::db::Db) {
        let tmp = TempDir::new().unwrap();
        let db = crate::db::open_database(tmp.path().join("test.db")).unwrap();
        (tmp, db)
    }

    fn seed_article(db: &Database, title: &str) -> u64 {
        let input = ArticleInput {
            title: title.to_string(),
            image_url: "https://img.example/a.png".to_string(),
            description: "desc".to_string(),
            content: "content".to_string(),
            category_name: "time_date".to_string(),
        };
        articles::create(db, &input, Category::TimeDate).unwrap().0
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let (_tmp, db) = test_db();
        let id = seed_article(&db, "a");

        assert!(toggle_mark(&db, "u1", id).unwrap());
        assert!(!toggle_mark(&db, "u1", id).unwrap());
        assert!(toggle_mark(&db, "u1", id).unwrap());

        // Exactly one mark row regardless of how often we toggled
        assert_eq!(counts(&db, "u1").unwrap().marked, 1);
    }

    #[test]
    fn test_toggle_rejects_missing_article() {
        let (_tmp, db) = test_db();
        assert!(matches!(
            toggle_mark(&db, "u1", 42),
            Err(AppError::ArticleNotFound)
        ));
    }

    #[test]
    fn test_marks_are_per_user() {
        let (_tmp, db) = test_db();
        let id = seed_article(&db, "a");

        assert!(toggle_mark(&db, "u1", id).unwrap());
        assert_eq!(stats(&db, "u2", id).unwrap(), (false, 0));
        assert_eq!(stats(&db, "u1", id).unwrap(), (true, 0));
    }

    #[test]
    fn test_increment_counts_sequentially() {
        let (_tmp, db) = test_db();
        let id = seed_article(&db, "a");

        for expected in 1..=5u64 {
            assert_eq!(increment_read(&db, "u1", id).unwrap(), expected);
        }

        // The denormalized aggregate tracks the total
        assert_eq!(articles::get(&db, id).unwrap().read_times, 5);
    }

    #[test]
    fn test_concurrent_increments_do_not_lose_updates() {
        let (_tmp, db) = test_db();
        let id = seed_article(&db, "a");

        for _ in 0..5 {
            increment_read(&db, "u1", id).unwrap();
        }

        // Two racing increments must land at 7, never 6
        let db2 = db.clone();
        let handle = std::thread::spawn(move || increment_read(&db2, "u1", id).unwrap());
        increment_read(&db, "u1", id).unwrap();
        handle.join().unwrap();

        assert_eq!(stats(&db, "u1", id).unwrap().1, 7);
        assert_eq!(articles::get(&db, id).unwrap().read_times, 7);
    }

    #[test]
    fn test_delete_cascades_interaction_rows() {
        let (_tmp, db) = test_db();
        let id = seed_article(&db, "a");

        toggle_mark(&db, "u1", id).unwrap();
        increment_read(&db, "u1", id).unwrap();

        articles::delete(&db, id).unwrap();

        // Stats must not error for the deleted article; rows are gone
        assert_eq!(stats(&db, "u1", id).unwrap(), (false, 0));
        let totals = counts(&db, "u1").unwrap();
        assert_eq!(totals.marked, 0);
        assert_eq!(totals.read_articles, 0);
    }

    #[test]
    fn test_marked_page_orders_and_paginates() {
        let (_tmp, db) = test_db();
        let a = seed_article(&db, "first");
        let b = seed_article(&db, "second");
        let c = seed_article(&db, "third");

        for id in [a, b, c] {
            toggle_mark(&db, "u1", id).unwrap();
        }

        let (rows, total) = marked_page(&db, "u1", 1, 2).unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, c);

        let (rows, _) = marked_page(&db, "u1", 2, 2).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, a);
    }

    #[test]
    fn test_history_orders_by_times() {
        let (_tmp, db) = test_db();
        let a = seed_article(&db, "a");
        let b = seed_article(&db, "b");

        increment_read(&db, "u1", a).unwrap();
        for _ in 0..3 {
            increment_read(&db, "u1", b).unwrap();
        }

        let (rows, total) = history_page(&db, "u1", 1, 10).unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].0, b);
        assert_eq!(rows[0].2, 3);
        assert_eq!(rows[1].2, 1);
    }
}
