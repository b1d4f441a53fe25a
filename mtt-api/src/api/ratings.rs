//! Rating endpoints: submission and retrieval of human judgments

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mtt_common::db::{music, ratings, Rating};
use serde::Deserialize;
use serde_json::Value;

use crate::api::ApiError;
use crate::AppState;

/// Query parameters for GET /api/ratings/song-ratings
///
/// `song` is kept as raw text so a missing parameter and a non-numeric
/// one produce distinct errors.
#[derive(Debug, Deserialize)]
pub struct SongRatingsQuery {
    pub song: Option<String>,
}

/// POST /api/ratings/rate-song
///
/// Body `{song, rating}`. Validation order: song present, rating
/// present, song exists, rating is an integer in 1..=5. Every accepted
/// call appends a new row; repeated judgments are valid data.
pub async fn rate_song(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    let song_field = match body.get("song") {
        None | Some(Value::Null) => {
            return Err(ApiError::MissingField("Song ID is required".to_string()))
        }
        Some(value) => value,
    };
    let song_id = song_field
        .as_i64()
        .ok_or_else(|| ApiError::InvalidValue("Song ID must be an integer".to_string()))?;

    let rating_field = match body.get("rating") {
        None | Some(Value::Null) => {
            return Err(ApiError::MissingField("Rating is required".to_string()))
        }
        Some(value) => value,
    };

    if !music::track_exists(&state.db, song_id)
        .await
        .map_err(|e| state.internal(e))?
    {
        return Err(ApiError::NotFound("Song not found".to_string()));
    }

    let rating_value = rating_field
        .as_i64()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| ApiError::InvalidValue("Rating must be between 1 and 5".to_string()))?;

    let rating = ratings::insert_rating(&state.db, song_id, rating_value)
        .await
        .map_err(|e| state.internal(e))?;

    Ok((StatusCode::CREATED, Json(rating)))
}

/// GET /api/ratings/song-ratings?song=ID
///
/// All ratings for one song, most recent first. A song nobody has
/// rated (or an unknown id) yields an empty list.
pub async fn song_ratings(
    State(state): State<AppState>,
    Query(query): Query<SongRatingsQuery>,
) -> Result<Json<Vec<Rating>>, ApiError> {
    let song = query
        .song
        .ok_or_else(|| ApiError::MissingField("Song ID is required".to_string()))?;

    let song_id: i64 = song
        .parse()
        .map_err(|_| ApiError::InvalidValue("Song ID must be an integer".to_string()))?;

    let all = ratings::ratings_for_song(&state.db, song_id)
        .await
        .map_err(|e| state.internal(e))?;

    Ok(Json(all))
}

/// GET /api/ratings
///
/// All ratings in the store, most recent first.
pub async fn list_ratings(State(state): State<AppState>) -> Result<Json<Vec<Rating>>, ApiError> {
    let all = ratings::list_ratings(&state.db)
        .await
        .map_err(|e| state.internal(e))?;

    Ok(Json(all))
}

/// GET /api/ratings/:id
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rating>, ApiError> {
    let rating = ratings::get_rating(&state.db, id)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound("Rating not found".to_string()))?;

    Ok(Json(rating))
}
