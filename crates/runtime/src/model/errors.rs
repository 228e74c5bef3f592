use thiserror::Error;

/// Failure of a model call, as handed to `on_model_error` callbacks.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The backend rejected the request.
    #[error("backend error {code}: {message}")]
    Backend { code: String, message: String },

    /// The call did not complete in time.
    #[error("model call timed out after {0}ms")]
    Timeout(u64),
}
