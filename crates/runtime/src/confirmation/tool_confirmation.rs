//! The decoded human decision for a tool call.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of the function call used to ask the user to confirm a tool call.
///
/// Tools issuing confirmation requests and clients answering them must
/// agree on this identifier.
pub const REQUEST_CONFIRMATION_FUNCTION_CALL_NAME: &str = "adk_request_confirmation";

/// A user's answer to a tool confirmation request.
///
/// A missing answer is represented by the absence of a `ToolConfirmation`,
/// not by a variant of this struct.
///
/// Deserialization only accepts a JSON object. Field names match without
/// regard to case and a later key overrides an earlier one. A `null` field
/// keeps its default, and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolConfirmation {
    /// Message shown to the user explaining what is being confirmed.
    pub hint: String,

    /// `true` if the user approved the action.
    pub confirmed: bool,

    /// Application-defined context attached to the request.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl ToolConfirmation {
    pub fn new(hint: impl Into<String>, confirmed: bool) -> Self {
        Self {
            hint: hint.into(),
            confirmed,
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

impl<'de> Deserialize<'de> for ToolConfirmation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ConfirmationVisitor)
    }
}

struct ConfirmationVisitor;

impl<'de> Visitor<'de> for ConfirmationVisitor {
    type Value = ToolConfirmation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tool confirmation object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<ToolConfirmation, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut confirmation = ToolConfirmation::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_lowercase().as_str() {
                "hint" => {
                    if let Some(hint) = map.next_value::<Option<String>>()? {
                        confirmation.hint = hint;
                    }
                }
                "confirmed" => {
                    if let Some(confirmed) = map.next_value::<Option<bool>>()? {
                        confirmation.confirmed = confirmed;
                    }
                }
                "payload" => confirmation.payload = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(confirmation)
    }
}
