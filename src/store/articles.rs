use chrono::Utc;
use redb::{Database, ReadableTable, WriteTransaction};

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{ArticleInput, ArticleRecord, Category};

/// Counter key for the article id allocator
const NEXT_ARTICLE_ID: &str = "next_article_id";

/// Create an article from validated input
///
/// The caller has already run `ArticleInput::validate`; `category` is the
/// parsed result. Ids come from a monotonic counter and are never reused.
pub fn create(db: &Database, input: &ArticleInput, category: Category) -> Result<(u64, ArticleRecord)> {
    let now = Utc::now().timestamp();
    let record = ArticleRecord {
        title: input.title.trim().to_string(),
        image_url: input.image_url.trim().to_string(),
        description: input.description.trim().to_string(),
        content: input.content.clone(),
        category,
        read_times: 0,
        created_at: now,
        updated_at: now,
    };

    let write_txn = db.begin_write()?;
    let id;
    {
        let mut counters = write_txn.open_table(tables::COUNTERS)?;
        id = counters
            .get(NEXT_ARTICLE_ID)?
            .map(|v| v.value())
            .unwrap_or(1);
        counters.insert(NEXT_ARTICLE_ID, id + 1)?;
        drop(counters);

        let mut articles = write_txn.open_table(tables::ARTICLES)?;
        let bytes = encode(&record)?;
        articles.insert(id, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok((id, record))
}

/// Fetch a single article
pub fn get(db: &Database, id: u64) -> Result<ArticleRecord> {
    let read_txn = db.begin_read()?;
    let articles = read_txn.open_table(tables::ARTICLES)?;
    articles
        .get(id)?
        .map(|bytes| decode(bytes.value()))
        .transpose()?
        .ok_or(AppError::ArticleNotFound)
}

/// Replace the mutable fields of an article
///
/// Creation time and the read aggregate are preserved; `updated_at` is
/// bumped.
pub fn update(
    db: &Database,
    id: u64,
    input: &ArticleInput,
    category: Category,
) -> Result<ArticleRecord> {
    let write_txn = db.begin_write()?;
    let record;
    {
        let mut articles = write_txn.open_table(tables::ARTICLES)?;
        let existing: ArticleRecord = match articles.get(id)? {
            Some(bytes) => decode(bytes.value())?,
            None => return Err(AppError::ArticleNotFound),
        };

        record = ArticleRecord {
            title: input.title.trim().to_string(),
            image_url: input.image_url.trim().to_string(),
            description: input.description.trim().to_string(),
            content: input.content.clone(),
            category,
            read_times: existing.read_times,
            created_at: existing.created_at,
            updated_at: Utc::now().timestamp(),
        };
        let bytes = encode(&record)?;
        articles.insert(id, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(record)
}

/// Delete an article and cascade its mark and read-count rows
pub fn delete(db: &Database, id: u64) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut articles = write_txn.open_table(tables::ARTICLES)?;
        if articles.remove(id)?.is_none() {
            return Err(AppError::ArticleNotFound);
        }
        drop(articles);

        remove_interactions(&write_txn, &[id])?;
    }
    write_txn.commit()?;

    Ok(())
}

/// Best-effort bulk delete; absent ids are skipped
///
/// Returns the number of articles actually removed.
pub fn delete_many(db: &Database, ids: &[u64]) -> Result<u64> {
    let write_txn = db.begin_write()?;
    let mut removed = Vec::new();
    {
        let mut articles = write_txn.open_table(tables::ARTICLES)?;
        for &id in ids {
            if articles.remove(id)?.is_some() {
                removed.push(id);
            }
        }
        drop(articles);

        remove_interactions(&write_txn, &removed)?;
    }
    write_txn.commit()?;

    Ok(removed.len() as u64)
}

/// Remove all mark and read-count rows referencing the given articles
///
/// Interaction keys lead with the user id, so a cascade is a scan; the
/// collect-then-remove split keeps the iteration borrow away from the
/// mutations.
fn remove_interactions(write_txn: &WriteTransaction, ids: &[u64]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut marks = write_txn.open_table(tables::MARKS)?;
    let mut stale = Vec::new();
    for entry in marks.iter()? {
        let (key, _) = entry?;
        let (user_id, article_id) = key.value();
        if ids.contains(&article_id) {
            stale.push((user_id.to_string(), article_id));
        }
    }
    for (user_id, article_id) in &stale {
        marks.remove((user_id.as_str(), *article_id))?;
    }
    drop(marks);

    let mut read_counts = write_txn.open_table(tables::READ_COUNTS)?;
    let mut stale = Vec::new();
    for entry in read_counts.iter()? {
        let (key, _) = entry?;
        let (user_id, article_id) = key.value();
        if ids.contains(&article_id) {
            stale.push((user_id.to_string(), article_id));
        }
    }
    for (user_id, article_id) in &stale {
        read_counts.remove((user_id.as_str(), *article_id))?;
    }

    Ok(())
}

/// Load every article, unordered
fn scan(db: &Database) -> Result<Vec<(u64, ArticleRecord)>> {
    let read_txn = db.begin_read()?;
    let articles = read_txn.open_table(tables::ARTICLES)?;
    let mut rows = Vec::new();
    for entry in articles.iter()? {
        let (key, value) = entry?;
        rows.push((key.value(), decode(value.value())?));
    }
    Ok(rows)
}

/// Sort newest-first; ids break creation-time ties
fn sort_newest_first(rows: &mut [(u64, ArticleRecord)]) {
    rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
}

/// Page of articles in one category (or all), newest first
///
/// `page` is 1-indexed; the total count covers the whole filtered set.
pub fn page_by_category(
    db: &Database,
    category: Option<Category>,
    page: u64,
    limit: u64,
) -> Result<(Vec<(u64, ArticleRecord)>, u64)> {
    let mut rows = scan(db)?;
    if let Some(category) = category {
        rows.retain(|(_, record)| record.category == category);
    }
    sort_newest_first(&mut rows);

    let total = rows.len() as u64;
    let skip = (page.saturating_sub(1)) * limit;
    let page_rows = rows
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    Ok((page_rows, total))
}

/// Full listing for the admin dashboard, newest first
pub fn list_all(db: &Database) -> Result<Vec<(u64, ArticleRecord)>> {
    let mut rows = scan(db)?;
    sort_newest_first(&mut rows);
    Ok(rows)
}

/// The `count` most recently created articles
pub fn latest(db: &Database, count: usize) -> Result<Vec<(u64, ArticleRecord)>> {
    let mut rows = scan(db)?;
    sort_newest_first(&mut rows);
    rows.truncate(count);
    Ok(rows)
}

/// The `count` most read articles, by the denormalized aggregate
pub fn hottest(db: &Database, count: usize) -> Result<Vec<(u64, ArticleRecord)>> {
    let mut rows = scan(db)?;
    rows.sort_by(|a, b| {
        (b.1.read_times, b.1.created_at, b.0).cmp(&(a.1.read_times, a.1.created_at, a.0))
    });
    rows.truncate(count);
    Ok(rows)
}

/// Case-insensitive title substring search, newest first
pub fn search(db: &Database, query: &str) -> Result<Vec<(u64, ArticleRecord)>> {
    let needle = query.to_lowercase();
    let mut rows = scan(db)?;
    rows.retain(|(_, record)| record.title.to_lowercase().contains(&needle));
    sort_newest_first(&mut rows);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, crate::db::Db) {
        let tmp = TempDir::new().unwrap();
        let db = crate::db::open_database(tmp.path().join("test.db")).unwrap();
        (tmp, db)
    }

    fn input(title: &str, category: &str) -> ArticleInput {
        ArticleInput {
            title: title.to_string(),
            image_url: "https://img.example/a.png".to_string(),
            description: "desc".to_string(),
            content: "content".to_string(),
            category_name: category.to_string(),
        }
    }

    #[test]
    fn test_create_allocates_sequential_ids() {
        let (_tmp, db) = test_db();

        let (id1, _) = create(&db, &input("one", "time_date"), Category::TimeDate).unwrap();
        let (id2, _) = create(&db, &input("two", "time_date"), Category::TimeDate).unwrap();

        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(get(&db, id1).unwrap().title, "one");
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let (_tmp, db) = test_db();

        let (id1, _) = create(&db, &input("one", "time_date"), Category::TimeDate).unwrap();
        delete(&db, id1).unwrap();
        let (id2, _) = create(&db, &input("two", "time_date"), Category::TimeDate).unwrap();

        assert!(id2 > id1);
    }

    #[test]
    fn test_update_preserves_created_at_and_read_times() {
        let (_tmp, db) = test_db();

        let (id, created) = create(&db, &input("one", "time_date"), Category::TimeDate).unwrap();
        let updated = update(&db, id, &input("renamed", "diet_health"), Category::DietHealth)
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.category, Category::DietHealth);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.read_times, 0);
    }

    #[test]
    fn test_update_missing_article() {
        let (_tmp, db) = test_db();
        assert!(matches!(
            update(&db, 42, &input("x", "time_date"), Category::TimeDate),
            Err(AppError::ArticleNotFound)
        ));
    }

    #[test]
    fn test_delete_many_skips_absent_ids() {
        let (_tmp, db) = test_db();

        let (id1, _) = create(&db, &input("one", "time_date"), Category::TimeDate).unwrap();
        let (id2, _) = create(&db, &input("two", "time_date"), Category::TimeDate).unwrap();

        let removed = delete_many(&db, &[id1, id2, 9999]).unwrap();
        assert_eq!(removed, 2);
        assert!(matches!(get(&db, id1), Err(AppError::ArticleNotFound)));
    }

    #[test]
    fn test_page_by_category_filters_and_counts() {
        let (_tmp, db) = test_db();

        create(&db, &input("a", "time_date"), Category::TimeDate).unwrap();
        create(&db, &input("b", "time_date"), Category::TimeDate).unwrap();
        create(&db, &input("c", "diet_health"), Category::DietHealth).unwrap();

        let (rows, total) = page_by_category(&db, Some(Category::TimeDate), 1, 1).unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 1);
        // Newest first; equal timestamps fall back to id order
        assert_eq!(rows[0].1.title, "b");

        let (rows, total) = page_by_category(&db, None, 1, 10).unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_tmp, db) = test_db();

        create(&db, &input("Deep Oceans", "nature_geography"), Category::NatureGeography)
            .unwrap();
        create(&db, &input("High Peaks", "nature_geography"), Category::NatureGeography)
            .unwrap();

        let rows = search(&db, "ocean").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.title, "Deep Oceans");

        assert!(search(&db, "desert").unwrap().is_empty());
    }
}
