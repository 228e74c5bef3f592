use thiserror::Error;

/// Errors raised while decoding a confirmation response payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was wrapped under `"response"` but the value is not a string.
    #[error("'response' key found but value is not a string")]
    NotAString,

    /// The wrapped string could not be parsed as a confirmation.
    #[error("'response' key found but failed to parse confirmation: {0}")]
    WrappedParse(#[source] serde_json::Error),

    /// The flat payload could not be parsed as a confirmation.
    #[error("failed to parse confirmation: {0}")]
    Parse(#[source] serde_json::Error),
}

impl DecodeError {
    /// Whether the payload itself was malformed, as opposed to mis-shaped.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::WrappedParse(_) | Self::Parse(_))
    }
}
