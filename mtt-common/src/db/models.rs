//! Row models for the music and ratings tables

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of pitch-class bins (C through B)
pub const PITCH_CLASS_BINS: usize = 12;
/// Number of signed interval bins (-P8 through +P8)
pub const INTERVAL_BINS: usize = 25;
/// Number of unsigned interval-size bins (P1 through P8)
pub const INTERVAL_SIZE_BINS: usize = 13;
/// Number of interval-direction bins (sizes without unison)
pub const INTERVAL_DIR_BINS: usize = 12;

/// Genre labels that participate in aggregation. The exp1..exp3 labels
/// are experimental variants: eligible for the Turing test, excluded
/// from analysis.
pub const ANALYSIS_LABELS: [&str; 2] = ["pop", "classical"];

/// One musical piece with its extracted features.
///
/// Scalar and array features are absent for tracks not yet analyzed
/// (two-stage ingestion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub label: String,
    pub file: Option<String>,
    pub key: Option<String>,
    pub npvi: Option<f64>,
    pub note_density: Option<f64>,
    pub pitch_range: Option<i64>,
    pub pitch_count: Option<i64>,
    pub pitch_class_count: Option<i64>,
    pub pitch_entropy: Option<f64>,
    pub pitch_class_entropy: Option<f64>,
    pub pitch_in_scale_rate: Option<f64>,
    pub scale_consistency: Option<f64>,
    pub polyphony: Option<f64>,
    pub polyphony_rate: Option<f64>,
    pub complexity: Option<f64>,
    pub originality: Option<f64>,
    pub gradus: Option<f64>,
    pub duration: Option<f64>,
    /// Pitch-class probability distribution (12 values)
    pub pc_dist1: Option<Vec<f64>>,
    /// Pitch-class transition matrix (12x12, rows sum to ~1)
    pub pc_dist2: Option<Vec<Vec<f64>>>,
    /// Signed interval distribution (25 values)
    pub iv_dist1: Option<Vec<f64>>,
    /// Unsigned interval-size distribution (13 values)
    pub ivsize_dist1: Option<Vec<f64>>,
    /// Interval-direction distribution (12 values, no unison)
    pub ivdir_dist1: Option<Vec<f64>>,
    /// Interval transition matrix (25x25)
    pub iv_dist2: Option<Vec<Vec<f64>>>,
}

/// One human judgment of a track (1 = definitely one class, 5 =
/// definitely the other; the mapping is UI-defined).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub song: i64,
    pub rating: i64,
    pub created_at: NaiveDateTime,
}

/// Decode a JSON-encoded feature vector, enforcing its width.
///
/// A wrong length or non-numeric content means the stored row is
/// corrupt and surfaces as an internal error, never as a silently
/// reshaped value.
pub fn decode_vector(raw: Option<String>, width: usize, column: &str) -> Result<Option<Vec<f64>>> {
    let Some(text) = raw else {
        return Ok(None);
    };

    let values: Vec<f64> = serde_json::from_str(&text)
        .map_err(|e| Error::Internal(format!("malformed {} value: {}", column, e)))?;

    if values.len() != width {
        return Err(Error::Internal(format!(
            "malformed {} value: expected {} entries, found {}",
            column,
            width,
            values.len()
        )));
    }

    Ok(Some(values))
}

/// Decode a JSON-encoded square transition matrix, enforcing its
/// dimension on both axes.
pub fn decode_matrix(
    raw: Option<String>,
    dim: usize,
    column: &str,
) -> Result<Option<Vec<Vec<f64>>>> {
    let Some(text) = raw else {
        return Ok(None);
    };

    let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
        .map_err(|e| Error::Internal(format!("malformed {} value: {}", column, e)))?;

    if rows.len() != dim {
        return Err(Error::Internal(format!(
            "malformed {} value: expected {} rows, found {}",
            column,
            dim,
            rows.len()
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != dim {
            return Err(Error::Internal(format!(
                "malformed {} value: row {} has {} entries, expected {}",
                column,
                i,
                row.len(),
                dim
            )));
        }
    }

    Ok(Some(rows))
}
