//! Ratify runtime: tool confirmation resolution for agent pipelines.
//!
//! Before a request goes to the model, the pipeline checks whether the
//! user has answered a pending "please confirm this tool call" prompt and,
//! if so, attaches the decoded answers to the outgoing request.
//!
//! # Overview
//!
//! - **Confirmation**: [`ToolConfirmation`] values, decoded from function
//!   responses named [`REQUEST_CONFIRMATION_FUNCTION_CALL_NAME`] found in the
//!   most recent user-authored event.
//! - **RequestConfirmationProcessor**: the [`RequestProcessor`] stage that
//!   scans the session, decodes each answer and merges the result into
//!   [`LlmRequest::tool_confirmations`].
//! - **Agent**: only agents exposing [`ModelCallbacks`] take part.
//! - **Plugins**: a [`PluginSet`] of lifecycle callbacks, configured once and
//!   carried read-only by every [`InvocationContext`].
//!
//! # Example
//!
//! ```
//! use runtime::{InvocationContext, LlmAgent, LlmRequest, RequestConfirmationProcessor, RequestProcessor};
//! use session::{Event, FunctionResponse, MemorySession};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let answer = json!({"response": r#"{"hint":"Delete /tmp/cache?","confirmed":true}"#});
//! let session = MemorySession::with_events(vec![Event::user_responses(vec![
//!     FunctionResponse::new(
//!         "call-1",
//!         runtime::REQUEST_CONFIRMATION_FUNCTION_CALL_NAME,
//!         answer.as_object().cloned(),
//!     ),
//! ])]);
//!
//! let agent = LlmAgent::builder("assistant", "gemini-2.0-flash").build();
//! let ctx = InvocationContext::new(Arc::new(agent)).with_session(Arc::new(session));
//!
//! let mut request = LlmRequest::new("gemini-2.0-flash");
//! RequestConfirmationProcessor::new().process(&ctx, &mut request)?;
//! assert!(request.confirmation("call-1").unwrap().confirmed);
//! # Ok::<(), runtime::Error>(())
//! ```

pub mod agent;
mod config;
pub mod confirmation;
mod context;
mod error;
pub mod model;
pub mod plugin;
mod processor;
pub mod tools;

pub use agent::{Agent, CustomAgent, LlmAgent, LlmAgentBuilder, ModelCallbacks};
pub use config::ResolverConfig;
pub use confirmation::{
    DecodeError, REQUEST_CONFIRMATION_FUNCTION_CALL_NAME, ToolConfirmation, decode_confirmation,
};
pub use context::InvocationContext;
pub use error::{Error, Result};
pub use model::{LlmRequest, LlmResponse, ModelError};
pub use plugin::{Plugin, PluginConfig, PluginSet};
pub use processor::{RequestConfirmationProcessor, RequestProcessor, Resolution};
pub use tools::ToolError;
