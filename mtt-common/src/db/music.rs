//! Typed queries over the music table (Feature Store)

use crate::db::models::{
    decode_matrix, decode_vector, Track, INTERVAL_BINS, INTERVAL_DIR_BINS, INTERVAL_SIZE_BINS,
    PITCH_CLASS_BINS,
};
use crate::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const TRACK_COLUMNS: &str = "id, title, label, file, key, npvi, note_density, pitch_range, \
     pitch_count, pitch_class_count, pitch_entropy, pitch_class_entropy, pitch_in_scale_rate, \
     scale_consistency, polyphony, polyphony_rate, complexity, originality, gradus, duration, \
     pc_dist1, pc_dist2, iv_dist1, ivsize_dist1, ivdir_dist1, iv_dist2";

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        label: row.try_get("label")?,
        file: row.try_get("file")?,
        key: row.try_get("key")?,
        npvi: row.try_get("npvi")?,
        note_density: row.try_get("note_density")?,
        pitch_range: row.try_get("pitch_range")?,
        pitch_count: row.try_get("pitch_count")?,
        pitch_class_count: row.try_get("pitch_class_count")?,
        pitch_entropy: row.try_get("pitch_entropy")?,
        pitch_class_entropy: row.try_get("pitch_class_entropy")?,
        pitch_in_scale_rate: row.try_get("pitch_in_scale_rate")?,
        scale_consistency: row.try_get("scale_consistency")?,
        polyphony: row.try_get("polyphony")?,
        polyphony_rate: row.try_get("polyphony_rate")?,
        complexity: row.try_get("complexity")?,
        originality: row.try_get("originality")?,
        gradus: row.try_get("gradus")?,
        duration: row.try_get("duration")?,
        pc_dist1: decode_vector(row.try_get("pc_dist1")?, PITCH_CLASS_BINS, "pc_dist1")?,
        pc_dist2: decode_matrix(row.try_get("pc_dist2")?, PITCH_CLASS_BINS, "pc_dist2")?,
        iv_dist1: decode_vector(row.try_get("iv_dist1")?, INTERVAL_BINS, "iv_dist1")?,
        ivsize_dist1: decode_vector(
            row.try_get("ivsize_dist1")?,
            INTERVAL_SIZE_BINS,
            "ivsize_dist1",
        )?,
        ivdir_dist1: decode_vector(row.try_get("ivdir_dist1")?, INTERVAL_DIR_BINS, "ivdir_dist1")?,
        iv_dist2: decode_matrix(row.try_get("iv_dist2")?, INTERVAL_BINS, "iv_dist2")?,
    })
}

/// Fetch the rows that participate in genre aggregation (pop and
/// classical only). One SELECT, so the aggregate is computed over a
/// single consistent snapshot of the store.
pub async fn analysis_tracks(pool: &SqlitePool) -> Result<Vec<Track>> {
    let sql = format!(
        "SELECT {} FROM music WHERE label IN ('pop', 'classical') ORDER BY id",
        TRACK_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(track_from_row).collect()
}

/// Fetch all tracks, every label included
pub async fn list_tracks(pool: &SqlitePool) -> Result<Vec<Track>> {
    let sql = format!("SELECT {} FROM music ORDER BY id", TRACK_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(track_from_row).collect()
}

/// Fetch one track by id
pub async fn get_track(pool: &SqlitePool, id: i64) -> Result<Option<Track>> {
    let sql = format!("SELECT {} FROM music WHERE id = ?", TRACK_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(track_from_row).transpose()
}

/// Distinct genre labels present in the store, in stable order
pub async fn distinct_labels(pool: &SqlitePool) -> Result<Vec<String>> {
    let labels = sqlx::query_as::<_, (String,)>("SELECT DISTINCT label FROM music ORDER BY label")
        .fetch_all(pool)
        .await?;
    Ok(labels.into_iter().map(|(label,)| label).collect())
}

/// Ids of tracks carrying a given label. With `analyzed_only`, only
/// tracks whose complexity, originality and gradus have all been
/// computed qualify for the Turing test.
pub async fn track_ids_with_label(
    pool: &SqlitePool,
    label: &str,
    analyzed_only: bool,
) -> Result<Vec<i64>> {
    let sql = if analyzed_only {
        "SELECT id FROM music WHERE label = ? \
         AND complexity IS NOT NULL AND originality IS NOT NULL AND gradus IS NOT NULL \
         ORDER BY id"
    } else {
        "SELECT id FROM music WHERE label = ? ORDER BY id"
    };
    let ids = sqlx::query_as::<_, (i64,)>(sql)
        .bind(label)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Check whether a track exists
pub async fn track_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM music WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}
