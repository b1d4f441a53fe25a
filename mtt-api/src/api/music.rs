//! Track endpoints: listing, detail, and the random pick that drives
//! the Turing test

use axum::{
    extract::{Path, State},
    Json,
};
use mtt_common::db::{music, Track};
use serde::Serialize;

use crate::api::ApiError;
use crate::sampler::pick_random_track;
use crate::AppState;

/// Listing view of a track: identity and playback fields only
#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub id: i64,
    pub title: String,
    pub label: String,
    pub file: Option<String>,
}

impl TrackSummary {
    fn from_track(track: Track, media_base_url: &str) -> Self {
        Self {
            id: track.id,
            title: track.title,
            label: track.label,
            file: track.file.map(|path| join_media_url(media_base_url, &path)),
        }
    }
}

/// Rewrite the stored storage-relative path into a playable URL
fn into_playable(mut track: Track, media_base_url: &str) -> Track {
    track.file = track
        .file
        .map(|path| join_media_url(media_base_url, &path));
    track
}

fn join_media_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// GET /api/music
///
/// List all tracks, every label included.
pub async fn list_music(State(state): State<AppState>) -> Result<Json<Vec<TrackSummary>>, ApiError> {
    let tracks = music::list_tracks(&state.db)
        .await
        .map_err(|e| state.internal(e))?;

    let summaries = tracks
        .into_iter()
        .map(|t| TrackSummary::from_track(t, &state.config.media_base_url))
        .collect();

    Ok(Json(summaries))
}

/// GET /api/music/:id
///
/// Full track record, features included.
pub async fn get_music(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Track>, ApiError> {
    let track = music::get_track(&state.db, id)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound("Song not found".to_string()))?;

    Ok(Json(into_playable(track, &state.config.media_base_url)))
}

/// GET /api/music/random
///
/// A uniformly random genre, then a uniformly random track within it.
/// 404 when no tracks qualify.
pub async fn random_music(State(state): State<AppState>) -> Result<Json<Track>, ApiError> {
    let picked = pick_random_track(&state.db, &state.sampler, state.config.sample_analyzed_only)
        .await
        .map_err(|e| state.internal(e))?;

    match picked {
        Some(track) => Ok(Json(into_playable(track, &state.config.media_base_url))),
        None => Err(ApiError::NotFound("No music tracks available".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_media_url_normalizes_slashes() {
        assert_eq!(join_media_url("/media/", "pop/a.wav"), "/media/pop/a.wav");
        assert_eq!(join_media_url("/media", "/pop/a.wav"), "/media/pop/a.wav");
        assert_eq!(
            join_media_url("https://cdn.example.com/media", "classical/b.wav"),
            "https://cdn.example.com/media/classical/b.wav"
        );
    }
}
