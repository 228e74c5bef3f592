//! Outgoing model request and response types.

pub mod errors;
pub mod types;

pub use errors::ModelError;
pub use types::{LlmRequest, LlmResponse};
