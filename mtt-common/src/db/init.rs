//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently. Track rows are written by an offline ingestion
//! collaborator; this service only ever inserts ratings.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // foreign_keys is a per-connection pragma, so it has to be part of
    // the connect options rather than a one-off query on the pool.
    // WAL gives concurrent readers while ingestion appends rows, and a
    // single consistent snapshot per SELECT for the aggregator.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Schema creation (idempotent - safe to call multiple times)
    create_music_table(&pool).await?;
    create_ratings_table(&pool).await?;

    Ok(pool)
}

/// Create the music table (Feature Store)
///
/// Scalar and array features are nullable: ingestion creates the row
/// first and a later analysis pass fills the features in. Array-valued
/// features are stored as JSON text and validated on read.
async fn create_music_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS music (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            label TEXT NOT NULL,
            file TEXT,
            key TEXT,
            npvi REAL,
            note_density REAL,
            pitch_range INTEGER,
            pitch_count INTEGER,
            pitch_class_count INTEGER,
            pitch_entropy REAL,
            pitch_class_entropy REAL,
            pitch_in_scale_rate REAL,
            scale_consistency REAL,
            polyphony REAL,
            polyphony_rate REAL,
            complexity REAL,
            originality REAL,
            gradus REAL,
            duration REAL,
            pc_dist1 TEXT,
            pc_dist2 TEXT,
            iv_dist1 TEXT,
            ivsize_dist1 TEXT,
            ivdir_dist1 TEXT,
            iv_dist2 TEXT,
            UNIQUE (title, label)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_music_label ON music(label)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the ratings table
///
/// Rows are append-only and immutable; deleting a track cascades to its
/// ratings.
async fn create_ratings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_id INTEGER NOT NULL REFERENCES music(id) ON DELETE CASCADE,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ratings_song_id ON ratings(song_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = init_database(&dir.path().join("mtt.db"))
            .await
            .expect("init database");
        (dir, pool)
    }

    #[tokio::test]
    async fn test_init_creates_tables() {
        let (_dir, pool) = setup_pool().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert!(names.contains(&"music"));
        assert!(names.contains(&"ratings"));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("mtt.db");
        let pool = init_database(&db_path).await.unwrap();
        pool.close().await;
        // Second open against the same file must not fail
        init_database(&db_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_title_label_unique() {
        let (_dir, pool) = setup_pool().await;

        sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'pop')")
            .execute(&pool)
            .await
            .unwrap();

        // Same title under the same genre is rejected
        let duplicate = sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'pop')")
            .execute(&pool)
            .await;
        assert!(duplicate.is_err());

        // Same title under a different genre is fine
        sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'classical')")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rating_range_check() {
        let (_dir, pool) = setup_pool().await;

        sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'pop')")
            .execute(&pool)
            .await
            .unwrap();

        for value in [0, 6] {
            let result = sqlx::query("INSERT INTO ratings (song_id, rating) VALUES (1, ?)")
                .bind(value)
                .execute(&pool)
                .await;
            assert!(result.is_err(), "rating {} should violate the CHECK", value);
        }

        sqlx::query("INSERT INTO ratings (song_id, rating) VALUES (1, 5)")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deleting_track_cascades_ratings() {
        let (_dir, pool) = setup_pool().await;

        sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'pop')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO ratings (song_id, rating) VALUES (1, 4)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM music WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
