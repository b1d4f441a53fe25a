//! Genre-comparison statistics (the feature aggregation core)
//!
//! Turns the per-track feature vectors and transition matrices of the
//! Feature Store into genre-level mean distributions, packaged with
//! their fixed label vocabularies for the presentation layer.

pub mod aggregate;
pub mod vocab;

pub use aggregate::{build_analysis_bundle, AnalysisBundle, SplitMatrix};
