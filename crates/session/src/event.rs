//! Event types for the conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Author marker reserved for turns written by the human operator.
pub const USER_AUTHOR: &str = "user";

/// A unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role attached to a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A function call issued by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Identifier used to correlate the eventual response.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// A reply to a previously issued function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Identifier of the call being answered.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Open-ended payload; absent when the caller sent nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Map<String, Value>>,
}

impl FunctionResponse {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        response: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            response,
        }
    }
}

/// A part of an event's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text content.
    Text { text: String },
    /// Function call from the model.
    FunctionCall(FunctionCall),
    /// Function response, usually from the user.
    FunctionResponse(FunctionResponse),
}

impl Part {
    /// Create a text part.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }
}

/// Ordered content of a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Create user content with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Get combined text content.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all function responses, in order.
    pub fn function_responses(&self) -> Vec<&FunctionResponse> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionResponse(fr) => Some(fr),
                _ => None,
            })
            .collect()
    }

    /// Extract all function calls, in order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionCall(fc) => Some(fc),
                _ => None,
            })
            .collect()
    }
}

/// One recorded turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub invocation_id: String,
    pub author: String,
    #[serde(default)]
    pub content: Option<Content>,
}

impl Event {
    pub fn new(author: impl Into<String>, content: Option<Content>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            invocation_id: String::new(),
            author: author.into(),
            content,
        }
    }

    /// A user turn with plain text.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(USER_AUTHOR, Some(Content::user_text(text)))
    }

    /// A user turn answering one or more function calls.
    pub fn user_responses(responses: Vec<FunctionResponse>) -> Self {
        let parts = responses.into_iter().map(Part::FunctionResponse).collect();
        Self::new(USER_AUTHOR, Some(Content::new(Role::User, parts)))
    }

    pub fn with_invocation_id(mut self, invocation_id: impl Into<String>) -> Self {
        self.invocation_id = invocation_id.into();
        self
    }

    pub fn is_user(&self) -> bool {
        self.author == USER_AUTHOR
    }

    /// Function responses carried by this event, empty when there is no content.
    pub fn function_responses(&self) -> Vec<&FunctionResponse> {
        self.content
            .as_ref()
            .map(Content::function_responses)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_responses_extraction() {
        let content = Content::new(
            Role::User,
            vec![
                Part::text("see below"),
                Part::FunctionResponse(FunctionResponse::new("a", "lookup", None)),
                Part::FunctionCall(FunctionCall {
                    id: "c".into(),
                    name: "search".into(),
                    args: Map::new(),
                }),
                Part::FunctionResponse(FunctionResponse::new("b", "fetch", None)),
            ],
        );
        let responses = content.function_responses();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, "a");
        assert_eq!(responses[1].name, "fetch");
        assert_eq!(content.function_calls().len(), 1);
        assert_eq!(content.text(), "see below");
    }

    #[test]
    fn event_without_content_has_no_responses() {
        let event = Event::new("planner", None);
        assert!(event.function_responses().is_empty());
        assert!(!event.is_user());
    }

    #[test]
    fn event_deserializes_with_defaults() {
        let event: Event = serde_json::from_value(json!({
            "author": "user",
            "content": {
                "role": "user",
                "parts": [
                    {"type": "function_response", "id": "r1", "name": "confirm", "response": {"confirmed": true}},
                    {"type": "text", "text": "ok"}
                ]
            }
        }))
        .unwrap();

        assert!(event.is_user());
        assert!(event.invocation_id.is_empty());
        let responses = event.function_responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].response.as_ref().unwrap()["confirmed"], json!(true));
    }

    #[test]
    fn missing_response_payload_is_none() {
        let part: Part = serde_json::from_value(json!({
            "type": "function_response",
            "id": "r1",
            "name": "confirm"
        }))
        .unwrap();
        assert_eq!(part, Part::FunctionResponse(FunctionResponse::new("r1", "confirm", None)));
    }
}
