//! Feature analysis endpoint

use axum::{extract::State, Json};
use mtt_common::db::music;

use crate::analysis::{build_analysis_bundle, AnalysisBundle};
use crate::api::ApiError;
use crate::AppState;

/// GET /api/feature-analysis
///
/// Returns the seven-section genre-comparison bundle: the filtered raw
/// rows plus the mean pitch-class, interval and transition
/// distributions for pop and classical. Failures surface as 500 with a
/// generic message unless debug mode is on.
pub async fn feature_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisBundle>, ApiError> {
    let tracks = music::analysis_tracks(&state.db)
        .await
        .map_err(|e| state.internal(e))?;

    let bundle = build_analysis_bundle(&tracks).map_err(|e| state.internal(e))?;

    Ok(Json(bundle))
}
