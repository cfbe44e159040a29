use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use crate::core::{features::extract_features, guard::try_short_circuit};
use crate::models::{ScoreRequest, ScoreResponse};
use crate::services::oracle::{OracleError, ReasoningOracle};

/// Errors that can occur while scoring a pair
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Oracle call exceeded {0:?}")]
    Timeout(Duration),
}

/// Main scoring orchestrator
///
/// # Pipeline Stages
/// 1. Feature extraction (normalized names and effective addresses)
/// 2. Name guard, which may end the pipeline without an oracle call
/// 3. Oracle judgement, clamped into [0, 1]
///
/// Holds no per-request state; one instance serves all requests.
#[derive(Clone)]
pub struct IdentityScorer {
    oracle: Arc<dyn ReasoningOracle>,
    timeout: Option<Duration>,
}

impl IdentityScorer {
    pub fn new(oracle: Arc<dyn ReasoningOracle>) -> Self {
        Self {
            oracle,
            timeout: None,
        }
    }

    /// Abort the oracle call and fail when it takes longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Identifier of the model behind the oracle
    pub fn model(&self) -> &str {
        self.oracle.model()
    }

    /// Score a pair of candidate records.
    ///
    /// Oracle failures are returned as-is; no score is ever substituted.
    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        let span = tracing::info_span!(
            "score",
            request_id = %uuid::Uuid::new_v4(),
            a = %request.a.customer_id,
            b = %request.b.customer_id,
        );

        self.score_inner(request).instrument(span).await
    }

    async fn score_inner(&self, request: &ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        // Stage 1: Features
        let features = extract_features(&request.a, &request.b);

        // Stage 2: Guard
        if let Some(response) = try_short_circuit(&features) {
            tracing::info!("Name mismatch after normalization, oracle skipped");
            return Ok(response);
        }

        // Stage 3: Oracle
        let call = self.oracle.evaluate(&features, &request.a, &request.b);

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ScoringError::Timeout(limit))?,
            None => call.await,
        };

        let verdict = match result {
            Ok(verdict) => verdict.clamped(),
            Err(e) => {
                tracing::error!("Oracle call failed: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!("Scored pair with oracle: {:.3}", verdict.score);

        Ok(ScoreResponse {
            score: verdict.score,
            rationale: verdict.rationale,
            signals: verdict.signals,
        })
    }
}

impl std::fmt::Debug for IdentityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityScorer")
            .field("model", &self.oracle.model())
            .field("timeout", &self.timeout)
            .finish()
    }
}
