//! Decoding of confirmation response payloads.
//!
//! Two payload shapes are accepted:
//!
//! - wrapped: `{"response": "<serialized confirmation>"}`, the only key being
//!   `response` and its value a JSON string (web clients always send this);
//! - flat: the confirmation fields directly, `{"hint": .., "confirmed": ..}`.

use super::{DecodeError, ToolConfirmation};
use serde_json::{Map, Value};

const WRAPPED_RESPONSE_KEY: &str = "response";

/// Decode one function response payload into a [`ToolConfirmation`].
///
/// An absent payload decodes to the default (unconfirmed) confirmation.
pub fn decode_confirmation(
    response: Option<&Map<String, Value>>,
) -> Result<ToolConfirmation, DecodeError> {
    let Some(response) = response else {
        return Ok(ToolConfirmation::default());
    };

    match wrapped_value(response) {
        Some(Value::String(json)) => parse(serde_json::from_str(json), DecodeError::WrappedParse),
        Some(_) => Err(DecodeError::NotAString),
        None => parse(
            serde_json::from_value(Value::Object(response.clone())),
            DecodeError::Parse,
        ),
    }
}

fn wrapped_value(response: &Map<String, Value>) -> Option<&Value> {
    if response.len() != 1 {
        return None;
    }
    response.get(WRAPPED_RESPONSE_KEY)
}

// `null` carries no decision and maps to the default.
fn parse(
    parsed: serde_json::Result<Option<ToolConfirmation>>,
    wrap: fn(serde_json::Error) -> DecodeError,
) -> Result<ToolConfirmation, DecodeError> {
    parsed.map(Option::unwrap_or_default).map_err(wrap)
}
