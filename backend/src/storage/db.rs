use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

use shared::{Gift, Kid, Occasion, UpdateGiftRequest, UpdateKidRequest};

/// DbConnection manages all kid and gift storage operations.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if necessary) the database at the given URL and set up
    /// the schema.
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize an in-memory database with a unique name, one per test.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, sqlx::Error> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kids (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                birthday TEXT NOT NULL,
                photo TEXT,
                interests TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gifts (
                id TEXT PRIMARY KEY,
                kid_id TEXT NOT NULL,
                gift_name TEXT NOT NULL,
                occasion TEXT NOT NULL,
                year INTEGER NOT NULL,
                date_given TEXT,
                photo TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_gifts_kid_id
            ON gifts(kid_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store a new kid.
    pub async fn store_kid(&self, kid: &Kid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO kids (id, name, birthday, photo, interests, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&kid.id)
        .bind(&kid.name)
        .bind(&kid.birthday)
        .bind(&kid.photo)
        .bind(&kid.interests)
        .bind(&kid.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Get a kid by ID.
    pub async fn get_kid(&self, kid_id: &str) -> Result<Option<Kid>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, name, birthday, photo, interests, created_at
            FROM kids
            WHERE id = ?
            "#,
        )
        .bind(kid_id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(|r| kid_from_row(&r)).transpose()
    }

    /// List all kids in insertion order.
    pub async fn list_kids(&self) -> Result<Vec<Kid>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, birthday, photo, interests, created_at
            FROM kids
            ORDER BY ROWID ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(kid_from_row).collect()
    }

    /// Merge the provided fields into a kid row. A single UPDATE statement,
    /// so concurrent merges touching different fields cannot overwrite each
    /// other; SQLite serializes the writers. `NULL` parameters keep the
    /// stored value, empty strings clear the optional columns. The ID and
    /// `created_at` never change.
    ///
    /// Returns the merged record, or `None` when no kid with that ID exists.
    pub async fn merge_kid(
        &self,
        kid_id: &str,
        request: &UpdateKidRequest,
    ) -> Result<Option<Kid>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE kids
            SET name      = COALESCE(?1, name),
                birthday  = COALESCE(?2, birthday),
                photo     = CASE WHEN ?3 IS NULL THEN photo
                                 WHEN ?3 = '' THEN NULL
                                 ELSE ?3 END,
                interests = CASE WHEN ?4 IS NULL THEN interests
                                 WHEN ?4 = '' THEN NULL
                                 ELSE ?4 END
            WHERE id = ?5
            RETURNING id, name, birthday, photo, interests, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.birthday)
        .bind(&request.photo)
        .bind(&request.interests)
        .bind(kid_id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(|r| kid_from_row(&r)).transpose()
    }

    /// Delete a kid and every gift referencing it, as one transaction.
    /// Returns false when no kid with that ID existed.
    pub async fn delete_kid(&self, kid_id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM kids WHERE id = ?")
            .bind(kid_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM gifts WHERE kid_id = ?")
            .bind(kid_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a new gift.
    pub async fn store_gift(&self, gift: &Gift) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO gifts (id, kid_id, gift_name, occasion, year, date_given, photo, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&gift.id)
        .bind(&gift.kid_id)
        .bind(&gift.gift_name)
        .bind(gift.occasion.as_str())
        .bind(gift.year)
        .bind(&gift.date_given)
        .bind(&gift.photo)
        .bind(&gift.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Get a gift by ID.
    pub async fn get_gift(&self, gift_id: &str) -> Result<Option<Gift>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, kid_id, gift_name, occasion, year, date_given, photo, created_at
            FROM gifts
            WHERE id = ?
            "#,
        )
        .bind(gift_id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(|r| gift_from_row(&r)).transpose()
    }

    /// List all gifts in insertion order.
    pub async fn list_gifts(&self) -> Result<Vec<Gift>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, kid_id, gift_name, occasion, year, date_given, photo, created_at
            FROM gifts
            ORDER BY ROWID ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(gift_from_row).collect()
    }

    /// List a kid's gifts, newest year first. Gifts from the same year keep
    /// their insertion order.
    pub async fn list_gifts_for_kid(&self, kid_id: &str) -> Result<Vec<Gift>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, kid_id, gift_name, occasion, year, date_given, photo, created_at
            FROM gifts
            WHERE kid_id = ?
            ORDER BY year DESC, ROWID ASC
            "#,
        )
        .bind(kid_id)
        .fetch_all(&*self.pool)
        .await?;

        rows.iter().map(gift_from_row).collect()
    }

    /// Merge the provided fields into a gift row; same single-statement
    /// contract as [`DbConnection::merge_kid`]. The ID, `kid_id`, and
    /// `created_at` never change.
    ///
    /// Returns the merged record, or `None` when no gift with that ID
    /// exists.
    pub async fn merge_gift(
        &self,
        gift_id: &str,
        request: &UpdateGiftRequest,
    ) -> Result<Option<Gift>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE gifts
            SET gift_name  = COALESCE(?1, gift_name),
                occasion   = COALESCE(?2, occasion),
                year       = COALESCE(?3, year),
                date_given = CASE WHEN ?4 IS NULL THEN date_given
                                  WHEN ?4 = '' THEN NULL
                                  ELSE ?4 END,
                photo      = CASE WHEN ?5 IS NULL THEN photo
                                  WHEN ?5 = '' THEN NULL
                                  ELSE ?5 END
            WHERE id = ?6
            RETURNING id, kid_id, gift_name, occasion, year, date_given, photo, created_at
            "#,
        )
        .bind(&request.gift_name)
        .bind(request.occasion.map(|o| o.as_str()))
        .bind(request.year)
        .bind(&request.date_given)
        .bind(&request.photo)
        .bind(gift_id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(|r| gift_from_row(&r)).transpose()
    }

    /// Delete a gift. Returns false when no gift with that ID existed.
    pub async fn delete_gift(&self, gift_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gifts WHERE id = ?")
            .bind(gift_id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find "the" Christmas gift for a kid and year: the first match in
    /// insertion order. Storage does not prevent duplicates; later rows are
    /// simply never returned here.
    pub async fn find_christmas_gift(
        &self,
        kid_id: &str,
        year: i32,
    ) -> Result<Option<Gift>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, kid_id, gift_name, occasion, year, date_given, photo, created_at
            FROM gifts
            WHERE kid_id = ? AND occasion = 'christmas' AND year = ?
            ORDER BY ROWID ASC
            LIMIT 1
            "#,
        )
        .bind(kid_id)
        .bind(year)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(|r| gift_from_row(&r)).transpose()
    }

    /// Toggle the Christmas gift for a `(kid, year)` pair: delete the first
    /// matching gift if one exists, otherwise insert the given placeholder.
    /// Runs as a single transaction so concurrent toggles cannot interleave
    /// the read and the write.
    ///
    /// Returns the created gift, or `None` when the toggle deleted one.
    pub async fn toggle_christmas_gift(
        &self,
        kid_id: &str,
        year: i32,
        placeholder: &Gift,
    ) -> Result<Option<Gift>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<String> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM gifts
            WHERE kid_id = ? AND occasion = 'christmas' AND year = ?
            ORDER BY ROWID ASC
            LIMIT 1
            "#,
        )
        .bind(kid_id)
        .bind(year)
        .fetch_optional(&mut *tx)
        .await?;

        let created = match existing {
            Some(gift_id) => {
                sqlx::query("DELETE FROM gifts WHERE id = ?")
                    .bind(gift_id)
                    .execute(&mut *tx)
                    .await?;
                None
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO gifts (id, kid_id, gift_name, occasion, year, date_given, photo, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&placeholder.id)
                .bind(&placeholder.kid_id)
                .bind(&placeholder.gift_name)
                .bind(placeholder.occasion.as_str())
                .bind(placeholder.year)
                .bind(&placeholder.date_given)
                .bind(&placeholder.photo)
                .bind(&placeholder.created_at)
                .execute(&mut *tx)
                .await?;
                Some(placeholder.clone())
            }
        };

        tx.commit().await?;

        Ok(created)
    }
}

fn kid_from_row(row: &SqliteRow) -> Result<Kid, sqlx::Error> {
    Ok(Kid {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        birthday: row.try_get("birthday")?,
        photo: row.try_get("photo")?,
        interests: row.try_get("interests")?,
        created_at: row.try_get("created_at")?,
    })
}

fn gift_from_row(row: &SqliteRow) -> Result<Gift, sqlx::Error> {
    let occasion: String = row.try_get("occasion")?;
    let occasion = occasion
        .parse::<Occasion>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(Gift {
        id: row.try_get("id")?,
        kid_id: row.try_get("kid_id")?,
        gift_name: row.try_get("gift_name")?,
        occasion,
        year: row.try_get("year")?,
        date_given: row.try_get("date_given")?,
        photo: row.try_get("photo")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn test_kid(id: &str, name: &str) -> Kid {
        Kid {
            id: id.to_string(),
            name: name.to_string(),
            birthday: "2015-06-15".to_string(),
            photo: None,
            interests: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn test_gift(id: &str, kid_id: &str, occasion: Occasion, year: i32) -> Gift {
        Gift {
            id: id.to_string(),
            kid_id: kid_id.to_string(),
            gift_name: "Test gift".to_string(),
            occasion,
            year,
            date_given: None,
            photo: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_kid() {
        let db = setup_test().await;

        let kid = Kid {
            photo: Some("data:image/png;base64,abc".to_string()),
            interests: Some("dinosaurs".to_string()),
            ..test_kid("kid-1", "Ava")
        };
        db.store_kid(&kid).await.expect("Failed to store kid");

        let retrieved = db.get_kid("kid-1").await.expect("Failed to get kid");
        assert_eq!(retrieved, Some(kid));

        let missing = db.get_kid("kid-none").await.expect("Failed to query kid");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_kids_insertion_order() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Zoe")).await.expect("Failed to store kid");
        db.store_kid(&test_kid("kid-2", "Ava")).await.expect("Failed to store kid");
        db.store_kid(&test_kid("kid-3", "Max")).await.expect("Failed to store kid");

        let kids = db.list_kids().await.expect("Failed to list kids");
        let names: Vec<&str> = kids.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Ava", "Max"]);
    }

    #[tokio::test]
    async fn test_delete_kid_cascades_to_gifts() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");
        db.store_kid(&test_kid("kid-2", "Max")).await.expect("Failed to store kid");
        db.store_gift(&test_gift("gift-1", "kid-1", Occasion::Birthday, 2023))
            .await
            .expect("Failed to store gift");
        db.store_gift(&test_gift("gift-2", "kid-1", Occasion::Christmas, 2024))
            .await
            .expect("Failed to store gift");
        db.store_gift(&test_gift("gift-3", "kid-2", Occasion::Birthday, 2024))
            .await
            .expect("Failed to store gift");

        let deleted = db.delete_kid("kid-1").await.expect("Failed to delete kid");
        assert!(deleted);

        assert!(db.get_kid("kid-1").await.expect("Failed to query kid").is_none());
        let remaining = db.list_gifts().await.expect("Failed to list gifts");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kid_id, "kid-2");
    }

    #[tokio::test]
    async fn test_delete_missing_kid_returns_false() {
        let db = setup_test().await;

        let deleted = db.delete_kid("kid-none").await.expect("Failed to delete kid");
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_list_gifts_for_kid_year_descending_stable() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");
        db.store_gift(&test_gift("gift-a", "kid-1", Occasion::Birthday, 2022))
            .await
            .expect("Failed to store gift");
        db.store_gift(&test_gift("gift-b", "kid-1", Occasion::Christmas, 2024))
            .await
            .expect("Failed to store gift");
        db.store_gift(&test_gift("gift-c", "kid-1", Occasion::Birthday, 2024))
            .await
            .expect("Failed to store gift");

        let gifts = db.list_gifts_for_kid("kid-1").await.expect("Failed to list gifts");
        let ids: Vec<&str> = gifts.iter().map(|g| g.id.as_str()).collect();
        // 2024 gifts first in insertion order, then 2022
        assert_eq!(ids, vec!["gift-b", "gift-c", "gift-a"]);
    }

    #[tokio::test]
    async fn test_find_christmas_gift_first_match() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");
        db.store_gift(&test_gift("gift-1", "kid-1", Occasion::Birthday, 2024))
            .await
            .expect("Failed to store gift");
        db.store_gift(&test_gift("gift-2", "kid-1", Occasion::Christmas, 2024))
            .await
            .expect("Failed to store gift");
        // duplicate christmas gift for the same year; only the first is "the" gift
        db.store_gift(&test_gift("gift-3", "kid-1", Occasion::Christmas, 2024))
            .await
            .expect("Failed to store gift");

        let found = db
            .find_christmas_gift("kid-1", 2024)
            .await
            .expect("Failed to find gift")
            .expect("Should find a christmas gift");
        assert_eq!(found.id, "gift-2");

        let other_year = db.find_christmas_gift("kid-1", 2023).await.expect("Failed to query");
        assert!(other_year.is_none());
    }

    #[tokio::test]
    async fn test_toggle_christmas_gift_creates_then_deletes() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");

        let placeholder = Gift {
            gift_name: "To be decided".to_string(),
            date_given: Some(String::new()),
            ..test_gift("gift-1", "kid-1", Occasion::Christmas, 2024)
        };

        let created = db
            .toggle_christmas_gift("kid-1", 2024, &placeholder)
            .await
            .expect("Failed to toggle");
        assert!(created.is_some());
        assert!(db
            .find_christmas_gift("kid-1", 2024)
            .await
            .expect("Failed to query")
            .is_some());

        let second = Gift { id: "gift-2".to_string(), ..placeholder.clone() };
        let deleted = db
            .toggle_christmas_gift("kid-1", 2024, &second)
            .await
            .expect("Failed to toggle");
        assert!(deleted.is_none());
        assert!(db
            .find_christmas_gift("kid-1", 2024)
            .await
            .expect("Failed to query")
            .is_none());
    }

    #[tokio::test]
    async fn test_merge_gift_preserves_identity() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");
        let gift = test_gift("gift-1", "kid-1", Occasion::Birthday, 2023);
        db.store_gift(&gift).await.expect("Failed to store gift");

        let merged = db
            .merge_gift(
                "gift-1",
                &UpdateGiftRequest {
                    gift_name: Some("Bicycle".to_string()),
                    year: Some(2024),
                    ..UpdateGiftRequest::default()
                },
            )
            .await
            .expect("Failed to merge gift")
            .expect("Gift should exist");
        assert_eq!(merged.gift_name, "Bicycle");
        assert_eq!(merged.year, 2024);
        assert_eq!(merged.occasion, gift.occasion);
        assert_eq!(merged.kid_id, "kid-1");
        assert_eq!(merged.created_at, gift.created_at);
    }

    #[tokio::test]
    async fn test_merge_missing_record_returns_none() {
        let db = setup_test().await;

        let kid = db
            .merge_kid(
                "kid-none",
                &UpdateKidRequest {
                    name: Some("Ava".to_string()),
                    ..UpdateKidRequest::default()
                },
            )
            .await
            .expect("Failed to merge kid");
        assert!(kid.is_none());

        let gift = db
            .merge_gift(
                "gift-none",
                &UpdateGiftRequest {
                    year: Some(2024),
                    ..UpdateGiftRequest::default()
                },
            )
            .await
            .expect("Failed to merge gift");
        assert!(gift.is_none());
    }

    #[tokio::test]
    async fn test_interleaved_merges_keep_both_fields() {
        let db = setup_test().await;

        db.store_kid(&test_kid("kid-1", "Ava")).await.expect("Failed to store kid");

        // two writers merging disjoint fields; each UPDATE only touches its
        // own columns, so neither overwrites the other
        let interests_update = UpdateKidRequest {
            interests: Some("legos".to_string()),
            ..UpdateKidRequest::default()
        };
        let name_update = UpdateKidRequest {
            name: Some("Ava Smith".to_string()),
            ..UpdateKidRequest::default()
        };
        let (a, b) = tokio::join!(
            db.merge_kid("kid-1", &interests_update),
            db.merge_kid("kid-1", &name_update),
        );
        a.expect("Failed to merge interests");
        b.expect("Failed to merge name");

        let kid = db
            .get_kid("kid-1")
            .await
            .expect("Failed to get kid")
            .expect("Kid should exist");
        assert_eq!(kid.name, "Ava Smith");
        assert_eq!(kid.interests.as_deref(), Some("legos"));
    }
}
