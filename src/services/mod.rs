// Service exports
pub mod openai;
pub mod oracle;

pub use openai::OpenAiOracle;
pub use oracle::{OracleError, OracleMessage, OracleVerdict, ReasoningOracle, Role};
