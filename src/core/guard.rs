use serde_json::{Map, Value};
use crate::core::features::NormalizedFeatures;
use crate::models::ScoreResponse;

/// Score returned when normalized names differ
pub const NAME_MISMATCH_SCORE: f64 = 0.05;

pub const NAME_MISMATCH_RATIONALE: &str = "Name mismatch after normalization.";

/// Deterministic pre-check run before the oracle.
///
/// Two non-empty normalized names that are not exactly equal end the pipeline
/// with [`NAME_MISMATCH_SCORE`]. An empty name on either side never
/// short-circuits.
pub fn try_short_circuit(features: &NormalizedFeatures) -> Option<ScoreResponse> {
    let (a, b) = (&features.a_name, &features.b_name);

    if a.is_empty() || b.is_empty() || a == b {
        return None;
    }

    let mut signals = Map::new();
    signals.insert("a_name".to_string(), Value::String(a.clone()));
    signals.insert("b_name".to_string(), Value::String(b.clone()));

    Some(ScoreResponse {
        score: NAME_MISMATCH_SCORE,
        rationale: NAME_MISMATCH_RATIONALE.to_string(),
        signals,
    })
}
