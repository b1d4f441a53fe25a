//! Mean distributions and transition matrices per genre
//!
//! Explicit typed aggregation over the loaded track collection. Each
//! section pairs the two genre means with the fixed vocabulary the
//! values are indexed by, so the output is self-describing for any
//! presentation adapter.
//!
//! Averaging policy: a track with a missing feature contributes
//! nothing to that feature's mean (it is skipped, never zero-filled).
//! A genre with no contributing tracks yields an empty data vector;
//! label axes are always emitted in full.

use mtt_common::db::models::{Track, INTERVAL_BINS, PITCH_CLASS_BINS};
use mtt_common::{Error, Result};
use serde::Serialize;
use serde_json::Value;

use super::vocab::{interval_directions, INTERVALS, INTERVAL_SIZES, PITCH_CLASSES};

/// A labeled matrix in split orientation: row labels, column labels,
/// and the data grid itself
#[derive(Debug, Clone, Serialize)]
pub struct SplitMatrix {
    pub index: Vec<&'static str>,
    pub columns: Vec<&'static str>,
    pub data: Vec<Vec<f64>>,
}

/// Per-genre mean pitch-class distribution
#[derive(Debug, Serialize)]
pub struct PitchClassDistribution {
    pub pop: Vec<f64>,
    pub classical: Vec<f64>,
    pub pitch_classes: Vec<&'static str>,
}

/// Per-genre mean distribution over an interval vocabulary
#[derive(Debug, Serialize)]
pub struct IntervalDistribution {
    pub pop: Vec<f64>,
    pub classical: Vec<f64>,
    pub intervals: Vec<&'static str>,
}

/// Per-genre mean transition matrix
#[derive(Debug, Serialize)]
pub struct TransitionDistribution {
    pub pop: SplitMatrix,
    pub classical: SplitMatrix,
    pub labels: Vec<&'static str>,
}

/// The full genre-comparison bundle served to the presentation layer
#[derive(Debug, Serialize)]
pub struct AnalysisBundle {
    pub origin_df: Vec<Value>,
    pub pitch_class_dist: PitchClassDistribution,
    pub pitch_transition_dist: TransitionDistribution,
    pub interval_dist: IntervalDistribution,
    pub interval_size_dist: IntervalDistribution,
    pub interval_dir_dist: IntervalDistribution,
    pub interval_transition_dist: TransitionDistribution,
}

/// Build the seven-section analysis bundle from the tracks that
/// participate in aggregation (already filtered to pop/classical).
pub fn build_analysis_bundle(tracks: &[Track]) -> Result<AnalysisBundle> {
    Ok(AnalysisBundle {
        origin_df: origin_rows(tracks)?,
        pitch_class_dist: PitchClassDistribution {
            pop: mean_vector(tracks, "pop", |t| t.pc_dist1.as_deref()),
            classical: mean_vector(tracks, "classical", |t| t.pc_dist1.as_deref()),
            pitch_classes: PITCH_CLASSES.to_vec(),
        },
        pitch_transition_dist: TransitionDistribution {
            pop: mean_matrix(tracks, "pop", PITCH_CLASS_BINS, &PITCH_CLASSES, |t| {
                t.pc_dist2.as_deref()
            }),
            classical: mean_matrix(tracks, "classical", PITCH_CLASS_BINS, &PITCH_CLASSES, |t| {
                t.pc_dist2.as_deref()
            }),
            labels: PITCH_CLASSES.to_vec(),
        },
        interval_dist: IntervalDistribution {
            pop: mean_vector(tracks, "pop", |t| t.iv_dist1.as_deref()),
            classical: mean_vector(tracks, "classical", |t| t.iv_dist1.as_deref()),
            intervals: INTERVALS.to_vec(),
        },
        interval_size_dist: IntervalDistribution {
            pop: mean_vector(tracks, "pop", |t| t.ivsize_dist1.as_deref()),
            classical: mean_vector(tracks, "classical", |t| t.ivsize_dist1.as_deref()),
            intervals: INTERVAL_SIZES.to_vec(),
        },
        interval_dir_dist: IntervalDistribution {
            pop: mean_vector(tracks, "pop", |t| t.ivdir_dist1.as_deref()),
            classical: mean_vector(tracks, "classical", |t| t.ivdir_dist1.as_deref()),
            intervals: interval_directions().to_vec(),
        },
        interval_transition_dist: TransitionDistribution {
            pop: mean_matrix(tracks, "pop", INTERVAL_BINS, &INTERVALS, |t| {
                t.iv_dist2.as_deref()
            }),
            classical: mean_matrix(tracks, "classical", INTERVAL_BINS, &INTERVALS, |t| {
                t.iv_dist2.as_deref()
            }),
            labels: INTERVALS.to_vec(),
        },
    })
}

/// Element-wise mean of a feature vector over one genre, skipping
/// tracks where the feature is missing. Empty when nothing contributes.
fn mean_vector<'t, F>(tracks: &'t [Track], genre: &str, select: F) -> Vec<f64>
where
    F: Fn(&'t Track) -> Option<&'t [f64]>,
{
    let mut sums: Option<Vec<f64>> = None;
    let mut count = 0usize;

    for values in tracks.iter().filter(|t| t.label == genre).filter_map(&select) {
        let sums = sums.get_or_insert_with(|| vec![0.0; values.len()]);
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
        count += 1;
    }

    match sums {
        Some(sums) => sums.into_iter().map(|s| s / count as f64).collect(),
        None => Vec::new(),
    }
}

/// Element-wise mean of a transition matrix over one genre, packaged
/// with its axis labels
fn mean_matrix<'t, F>(
    tracks: &'t [Track],
    genre: &str,
    dim: usize,
    labels: &[&'static str],
    select: F,
) -> SplitMatrix
where
    F: Fn(&'t Track) -> Option<&'t [Vec<f64>]>,
{
    let mut sums = vec![vec![0.0; dim]; dim];
    let mut count = 0usize;

    for matrix in tracks.iter().filter(|t| t.label == genre).filter_map(&select) {
        for (sum_row, row) in sums.iter_mut().zip(matrix) {
            for (sum, value) in sum_row.iter_mut().zip(row) {
                *sum += value;
            }
        }
        count += 1;
    }

    let data = if count == 0 {
        Vec::new()
    } else {
        sums.into_iter()
            .map(|row| row.into_iter().map(|s| s / count as f64).collect())
            .collect()
    };

    SplitMatrix {
        index: labels.to_vec(),
        columns: labels.to_vec(),
        data,
    }
}

/// The filtered raw rows, with a `genre` field mirroring `label` the
/// way the exported dataset always carried it
fn origin_rows(tracks: &[Track]) -> Result<Vec<Value>> {
    tracks
        .iter()
        .map(|track| {
            let mut value = serde_json::to_value(track)
                .map_err(|e| Error::Internal(format!("failed to serialize track row: {}", e)))?;
            if let Value::Object(fields) = &mut value {
                fields.insert("genre".to_string(), Value::String(track.label.clone()));
            }
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_track(id: i64, label: &str) -> Track {
        Track {
            id,
            title: format!("track-{}", id),
            label: label.to_string(),
            file: None,
            key: None,
            npvi: None,
            note_density: None,
            pitch_range: None,
            pitch_count: None,
            pitch_class_count: None,
            pitch_entropy: None,
            pitch_class_entropy: None,
            pitch_in_scale_rate: None,
            scale_consistency: None,
            polyphony: None,
            polyphony_rate: None,
            complexity: None,
            originality: None,
            gradus: None,
            duration: None,
            pc_dist1: None,
            pc_dist2: None,
            iv_dist1: None,
            ivsize_dist1: None,
            ivdir_dist1: None,
            iv_dist2: None,
        }
    }

    #[test]
    fn test_mean_excludes_missing_values() {
        let mut with_feature = blank_track(1, "pop");
        with_feature.pc_dist1 = Some(vec![0.1; 12]);
        let without_feature = blank_track(2, "pop");
        let mut classical = blank_track(3, "classical");
        classical.pc_dist1 = Some(vec![0.2; 12]);

        let tracks = vec![with_feature, without_feature, classical];
        let bundle = build_analysis_bundle(&tracks).unwrap();

        // The null track is skipped, not averaged in as zeros
        assert_eq!(bundle.pitch_class_dist.pop, vec![0.1; 12]);
        assert_eq!(bundle.pitch_class_dist.classical, vec![0.2; 12]);
    }

    #[test]
    fn test_mean_averages_across_tracks() {
        let mut a = blank_track(1, "pop");
        a.iv_dist1 = Some(vec![0.0; 25]);
        let mut b = blank_track(2, "pop");
        b.iv_dist1 = Some(vec![1.0; 25]);

        let bundle = build_analysis_bundle(&[a, b]).unwrap();
        assert_eq!(bundle.interval_dist.pop, vec![0.5; 25]);
        assert!(bundle.interval_dist.classical.is_empty());
    }

    #[test]
    fn test_empty_genre_yields_empty_data_with_full_labels() {
        let bundle = build_analysis_bundle(&[]).unwrap();

        assert!(bundle.pitch_class_dist.pop.is_empty());
        assert_eq!(bundle.pitch_class_dist.pitch_classes.len(), 12);
        assert!(bundle.pitch_transition_dist.pop.data.is_empty());
        assert_eq!(bundle.pitch_transition_dist.pop.index.len(), 12);
        assert_eq!(bundle.pitch_transition_dist.pop.columns.len(), 12);
    }

    #[test]
    fn test_transition_mean_is_element_wise() {
        let mut a = blank_track(1, "classical");
        let mut matrix_a = vec![vec![0.0; 12]; 12];
        matrix_a[0][1] = 1.0;
        a.pc_dist2 = Some(matrix_a);

        let mut b = blank_track(2, "classical");
        let mut matrix_b = vec![vec![0.0; 12]; 12];
        matrix_b[0][1] = 0.5;
        matrix_b[11][0] = 1.0;
        b.pc_dist2 = Some(matrix_b);

        let bundle = build_analysis_bundle(&[a, b]).unwrap();
        let mean = &bundle.pitch_transition_dist.classical.data;
        assert_eq!(mean[0][1], 0.75);
        assert_eq!(mean[11][0], 0.5);
        assert_eq!(mean[5][5], 0.0);
    }

    #[test]
    fn test_direction_section_drops_unison() {
        let bundle = build_analysis_bundle(&[]).unwrap();
        assert_eq!(bundle.interval_dir_dist.intervals.len(), 12);
        assert!(!bundle.interval_dir_dist.intervals.contains(&"P1"));
        assert_eq!(bundle.interval_size_dist.intervals.len(), 13);
    }

    #[test]
    fn test_origin_rows_mirror_label_as_genre() {
        let mut track = blank_track(7, "pop");
        track.npvi = Some(33.25);
        let bundle = build_analysis_bundle(&[track]).unwrap();

        let row = &bundle.origin_df[0];
        assert_eq!(row["label"], "pop");
        assert_eq!(row["genre"], "pop");
        assert_eq!(row["npvi"], 33.25);
        assert_eq!(row["pc_dist1"], Value::Null);
    }

    #[test]
    fn test_bundle_serializes_with_all_seven_sections() {
        let bundle = build_analysis_bundle(&[]).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        for key in [
            "origin_df",
            "pitch_class_dist",
            "pitch_transition_dist",
            "interval_dist",
            "interval_size_dist",
            "interval_dir_dist",
            "interval_transition_dist",
        ] {
            assert!(json.get(key).is_some(), "bundle is missing {}", key);
        }

        let transition = &json["interval_transition_dist"]["pop"];
        assert!(transition.get("index").is_some());
        assert!(transition.get("columns").is_some());
        assert!(transition.get("data").is_some());
    }
}
