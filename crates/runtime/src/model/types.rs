use crate::confirmation::ToolConfirmation;
use session::Content;
use std::collections::HashMap;

/// Everything the pipeline sends to the model for one call.
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    pub model: Option<String>,
    pub contents: Vec<Content>,
    /// Confirmations resolved for this turn, keyed by function call id.
    pub tool_confirmations: HashMap<String, ToolConfirmation>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Default::default()
        }
    }

    /// Merge resolved confirmations, replacing entries with the same call id.
    pub fn merge_confirmations(
        &mut self,
        confirmations: impl IntoIterator<Item = (String, ToolConfirmation)>,
    ) {
        self.tool_confirmations.extend(confirmations);
    }

    /// Look up the confirmation for a function call id.
    pub fn confirmation(&self, call_id: &str) -> Option<&ToolConfirmation> {
        self.tool_confirmations.get(call_id)
    }
}

/// A model response, as seen by callbacks.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl LlmResponse {
    pub fn from_content(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_same_id() {
        let mut req = LlmRequest::new("gemini-2.0-flash");
        req.merge_confirmations([("r1".to_string(), ToolConfirmation::new("a", false))]);
        req.merge_confirmations([
            ("r1".to_string(), ToolConfirmation::new("a", true)),
            ("r2".to_string(), ToolConfirmation::new("b", false)),
        ]);
        assert_eq!(req.tool_confirmations.len(), 2);
        assert!(req.confirmation("r1").unwrap().confirmed);
        assert!(req.confirmation("r3").is_none());
    }
}
