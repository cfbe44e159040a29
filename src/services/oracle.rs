use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use crate::core::features::NormalizedFeatures;
use crate::models::CandidateRecord;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-5.2";

/// Instruction sent with the system role on every oracle call
pub const SYSTEM_INSTRUCTION: &str = "You are an identity resolution scorer for e-commerce customers. \
Return a score in [0,1] where 1 means same real-world person. \
Names are already required to be an exact match after normalization. \
Use address similarity signals (city, district, postal code, address line) and be robust to minor typos, missing postal codes, and abbreviations. \
If both addresses are empty/unknown, return a conservative score around 0.3 to 0.5, not 1.";

pub const TASK_INSTRUCTION: &str =
    "Score whether these two customer records represent the same person.";

/// Name of the structured output schema
pub const VERDICT_SCHEMA_NAME: &str = "identity_score";

/// Errors that can occur when calling the reasoning oracle
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Oracle request timed out")]
    Timeout,

    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,

    #[error("Rate limited or quota exceeded: {0}")]
    RateLimited(String),

    #[error("API returned error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Non-conforming structured response: {0}")]
    NonConforming(String),

    #[error("Oracle not configured: {0}")]
    NotConfigured(String),
}

/// Role tag of an oracle message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One entry of the role-tagged message list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleMessage {
    pub role: Role,
    pub content: String,
}

/// Structured output every oracle must produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleVerdict {
    pub score: f64,
    pub rationale: String,
    #[serde(default)]
    pub signals: Map<String, Value>,
}

impl OracleVerdict {
    /// Parse the oracle's output text against the verdict contract
    pub fn from_text(text: &str) -> Result<Self, OracleError> {
        let verdict: OracleVerdict = serde_json::from_str(text.trim())
            .map_err(|e| OracleError::NonConforming(format!("Failed to parse verdict: {}", e)))?;

        if !verdict.score.is_finite() {
            return Err(OracleError::NonConforming(format!(
                "Score is not a finite number: {}",
                verdict.score
            )));
        }

        Ok(verdict)
    }

    /// Same verdict with its score pulled into [0, 1]
    pub fn clamped(mut self) -> Self {
        self.score = clamp_score(self.score);
        self
    }
}

/// `max(0, min(1, score))`
#[inline]
pub fn clamp_score(score: f64) -> f64 {
    score.min(1.0).max(0.0)
}

/// JSON schema for [`OracleVerdict`], handed to schema-constrained backends.
/// `signals` is an open mapping.
pub fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "rationale": { "type": "string" },
            "signals": { "type": "object", "additionalProperties": true }
        },
        "required": ["score", "rationale", "signals"],
        "additionalProperties": false
    })
}

/// User payload: task, extracted features and both raw records
pub fn build_user_payload(
    features: &NormalizedFeatures,
    raw_a: &CandidateRecord,
    raw_b: &CandidateRecord,
) -> Value {
    json!({
        "instruction": TASK_INSTRUCTION,
        "features": features,
        "raw": {
            "a": raw_a,
            "b": raw_b,
        },
    })
}

/// System instruction followed by the serialized user payload
pub fn build_messages(
    features: &NormalizedFeatures,
    raw_a: &CandidateRecord,
    raw_b: &CandidateRecord,
) -> Vec<OracleMessage> {
    vec![
        OracleMessage {
            role: Role::System,
            content: SYSTEM_INSTRUCTION.to_string(),
        },
        OracleMessage {
            role: Role::User,
            content: build_user_payload(features, raw_a, raw_b).to_string(),
        },
    ]
}

/// External structured-completion capability that judges address similarity.
///
/// Implementations return a verdict that satisfies [`OracleVerdict`] or fail.
/// Scores are not required to be in range; callers clamp.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Identifier of the underlying model
    fn model(&self) -> &str;

    async fn evaluate(
        &self,
        features: &NormalizedFeatures,
        raw_a: &CandidateRecord,
        raw_b: &CandidateRecord,
    ) -> Result<OracleVerdict, OracleError>;
}
