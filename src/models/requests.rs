use serde::{Deserialize, Serialize};
use crate::models::domain::CandidateRecord;

/// Request to score two candidate records. `a`/`b` order is preserved end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub a: CandidateRecord,
    pub b: CandidateRecord,
}

impl ScoreRequest {
    pub fn new(a: CandidateRecord, b: CandidateRecord) -> Self {
        Self { a, b }
    }
}
