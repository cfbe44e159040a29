//! Identity scoring service
//!
//! Decides whether two customer records denote the same real-world person.
//! Names are normalized and compared exactly; pairs that survive the name
//! guard are judged by an external reasoning oracle on address similarity.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{IdentityScorer, ScoringError, normalize::normalize_token};
pub use models::{CandidateRecord, ScoreRequest, ScoreResponse};
pub use services::{OpenAiOracle, OracleError, ReasoningOracle};
