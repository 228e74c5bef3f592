//! Request processors, including tool confirmation resolution.

use crate::confirmation::{ToolConfirmation, decode_confirmation, latest_user_turn};
use crate::config::ResolverConfig;
use crate::model::LlmRequest;
use crate::{Error, InvocationContext, Result};
use session::{Event, Events};
use std::collections::HashMap;

/// A pipeline stage that prepares the outgoing model request.
pub trait RequestProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, ctx: &InvocationContext, request: &mut LlmRequest) -> Result<()>;
}

/// Outcome of resolving confirmations for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The current agent has no model hooks.
    NotApplicable,
    /// No user turn, or no confirmation answers in it.
    Empty,
    /// Decoded answers from the user event at `event_index`, keyed by call id.
    Resolved {
        event_index: usize,
        confirmations: HashMap<String, ToolConfirmation>,
    },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn confirmations(&self) -> Option<&HashMap<String, ToolConfirmation>> {
        match self {
            Self::Resolved { confirmations, .. } => Some(confirmations),
            _ => None,
        }
    }

    /// The resolved map, empty unless resolved.
    pub fn into_confirmations(self) -> HashMap<String, ToolConfirmation> {
        match self {
            Self::Resolved { confirmations, .. } => confirmations,
            _ => HashMap::new(),
        }
    }
}

/// Resolves the user's answers to tool confirmation requests and attaches
/// them to the outgoing request.
#[derive(Debug, Clone, Default)]
pub struct RequestConfirmationProcessor {
    config: ResolverConfig,
}

impl RequestConfirmationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve confirmations from the latest user turn of the session.
    ///
    /// Any decode failure fails the whole resolution; no partial map is
    /// returned.
    pub fn resolve(&self, ctx: &InvocationContext) -> Result<Resolution> {
        if ctx.agent().model_callbacks().is_none() {
            tracing::debug!(agent = ctx.agent().name(), "agent has no model hooks, skipping");
            return Ok(Resolution::NotApplicable);
        }

        let no_events: Vec<Event> = Vec::new();
        let events = ctx
            .session()
            .map_or(&no_events as &dyn Events, |session| session.events());

        let Some(turn) = latest_user_turn(events, &self.config.function_name) else {
            return Ok(Resolution::Empty);
        };

        let confirmations = turn
            .responses
            .iter()
            .map(|fr| {
                decode_confirmation(fr.response.as_ref())
                    .map(|tc| (fr.id.clone(), tc))
                    .map_err(|source| Error::Confirmation {
                        id: fr.id.clone(),
                        source,
                    })
            })
            .collect::<Result<HashMap<_, _>>>()?;

        if confirmations.is_empty() {
            return Ok(Resolution::Empty);
        }

        tracing::info!(
            count = confirmations.len(),
            event_index = turn.index,
            "resolved tool confirmations"
        );
        Ok(Resolution::Resolved {
            event_index: turn.index,
            confirmations,
        })
    }
}

impl RequestProcessor for RequestConfirmationProcessor {
    fn name(&self) -> &str {
        "request_confirmation"
    }

    fn process(&self, ctx: &InvocationContext, request: &mut LlmRequest) -> Result<()> {
        let resolution = self.resolve(ctx)?;
        request.merge_confirmations(resolution.into_confirmations());
        Ok(())
    }
}
