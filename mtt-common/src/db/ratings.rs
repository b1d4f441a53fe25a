//! Typed queries over the ratings table

use crate::db::models::Rating;
use crate::Result;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

type RatingRow = (i64, i64, i64, NaiveDateTime);

fn rating_from_row((id, song, rating, created_at): RatingRow) -> Rating {
    Rating {
        id,
        song,
        rating,
        created_at,
    }
}

/// Persist one rating as a single atomic insert and return the created
/// row. Repeated judgments of the same track are valid data, so there
/// is deliberately no uniqueness constraint to hit here.
pub async fn insert_rating(pool: &SqlitePool, song_id: i64, rating: i64) -> Result<Rating> {
    let row = sqlx::query_as::<_, RatingRow>(
        "INSERT INTO ratings (song_id, rating) VALUES (?, ?) \
         RETURNING id, song_id, rating, created_at",
    )
    .bind(song_id)
    .bind(rating)
    .fetch_one(pool)
    .await?;

    Ok(rating_from_row(row))
}

/// Fetch one rating by id
pub async fn get_rating(pool: &SqlitePool, id: i64) -> Result<Option<Rating>> {
    let row = sqlx::query_as::<_, RatingRow>(
        "SELECT id, song_id, rating, created_at FROM ratings WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(rating_from_row))
}

/// All ratings referencing a song, most recent first. The id tiebreak
/// keeps the order deterministic when two ratings share a timestamp.
pub async fn ratings_for_song(pool: &SqlitePool, song_id: i64) -> Result<Vec<Rating>> {
    let rows = sqlx::query_as::<_, RatingRow>(
        "SELECT id, song_id, rating, created_at FROM ratings \
         WHERE song_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(song_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(rating_from_row).collect())
}

/// All ratings in the store, most recent first
pub async fn list_ratings(pool: &SqlitePool) -> Result<Vec<Rating>> {
    let rows = sqlx::query_as::<_, RatingRow>(
        "SELECT id, song_id, rating, created_at FROM ratings \
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(rating_from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;

    async fn setup_pool_with_track() -> (tempfile::TempDir, SqlitePool, i64) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = init_database(&dir.path().join("mtt.db"))
            .await
            .expect("init database");
        let song_id = sqlx::query("INSERT INTO music (title, label) VALUES ('Test Song', 'pop')")
            .execute(&pool)
            .await
            .unwrap()
            .last_insert_rowid();
        (dir, pool, song_id)
    }

    #[tokio::test]
    async fn test_insert_returns_created_row() {
        let (_dir, pool, song_id) = setup_pool_with_track().await;

        let rating = insert_rating(&pool, song_id, 3).await.unwrap();
        assert_eq!(rating.song, song_id);
        assert_eq!(rating.rating, 3);

        let fetched = get_rating(&pool, rating.id).await.unwrap().unwrap();
        assert_eq!(fetched.rating, 3);
        assert_eq!(fetched.created_at, rating.created_at);
    }

    #[tokio::test]
    async fn test_identical_submissions_create_distinct_rows() {
        let (_dir, pool, song_id) = setup_pool_with_track().await;

        let first = insert_rating(&pool, song_id, 4).await.unwrap();
        let second = insert_rating(&pool, song_id, 4).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = ratings_for_song(&pool, song_id).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_ratings_for_song_most_recent_first() {
        let (_dir, pool, song_id) = setup_pool_with_track().await;

        let first = insert_rating(&pool, song_id, 1).await.unwrap();
        let second = insert_rating(&pool, song_id, 5).await.unwrap();

        let all = ratings_for_song(&pool, song_id).await.unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn test_unknown_song_yields_empty_list() {
        let (_dir, pool, song_id) = setup_pool_with_track().await;
        insert_rating(&pool, song_id, 2).await.unwrap();

        let none = ratings_for_song(&pool, song_id + 999).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_song() {
        let (_dir, pool, song_id) = setup_pool_with_track().await;
        // Foreign key enforcement, not application logic, is the last line here
        assert!(insert_rating(&pool, song_id + 999, 3).await.is_err());
    }
}
