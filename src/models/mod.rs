// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AddressSnapshot, ChannelSummary, CandidateRecord};
pub use requests::ScoreRequest;
pub use responses::{ScoreResponse, HealthResponse, ErrorResponse};
