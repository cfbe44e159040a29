// Core pipeline exports
pub mod features;
pub mod guard;
pub mod normalize;
pub mod scorer;

pub use features::{extract_features, NormalizedFeatures};
pub use guard::{try_short_circuit, NAME_MISMATCH_SCORE};
pub use normalize::{normalize_address, normalize_name, normalize_token};
pub use scorer::{IdentityScorer, ScoringError};
