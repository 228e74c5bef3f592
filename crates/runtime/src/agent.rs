//! Agents and the model/tool callbacks they expose.

use crate::model::{LlmRequest, LlmResponse, ModelError};
use crate::tools::ToolError;
use crate::{InvocationContext, Result};
use serde_json::{Map, Value};
use session::Content;
use std::sync::Arc;

/// Tool arguments or results as a JSON object.
pub type ToolPayload = Map<String, Value>;

pub type BeforeAgentCallback =
    Arc<dyn Fn(&InvocationContext) -> Result<Option<Content>> + Send + Sync>;
pub type AfterAgentCallback =
    Arc<dyn Fn(&InvocationContext) -> Result<Option<Content>> + Send + Sync>;

/// Runs before the model is called. Returning a response skips the call.
pub type BeforeModelCallback =
    Arc<dyn Fn(&InvocationContext, &mut LlmRequest) -> Result<Option<LlmResponse>> + Send + Sync>;
/// Runs after the model answered. Returning a response replaces it.
pub type AfterModelCallback =
    Arc<dyn Fn(&InvocationContext, &LlmResponse) -> Result<Option<LlmResponse>> + Send + Sync>;
pub type OnModelErrorCallback = Arc<
    dyn Fn(&InvocationContext, &LlmRequest, &ModelError) -> Result<Option<LlmResponse>>
        + Send
        + Sync,
>;

/// Runs before a tool; receives the tool name and arguments.
pub type BeforeToolCallback =
    Arc<dyn Fn(&InvocationContext, &str, &ToolPayload) -> Result<Option<ToolPayload>> + Send + Sync>;
/// Runs after a tool; receives the tool name, arguments and result.
pub type AfterToolCallback = Arc<
    dyn Fn(&InvocationContext, &str, &ToolPayload, &ToolPayload) -> Result<Option<ToolPayload>>
        + Send
        + Sync,
>;
pub type OnToolErrorCallback = Arc<
    dyn Fn(&InvocationContext, &str, &ToolPayload, &ToolError) -> Result<Option<ToolPayload>>
        + Send
        + Sync,
>;

/// Hooks around model and tool calls of a model-backed agent.
#[derive(Clone, Default)]
pub struct ModelCallbacks {
    pub before_model: Vec<BeforeModelCallback>,
    pub after_model: Vec<AfterModelCallback>,
    pub on_model_error: Vec<OnModelErrorCallback>,
    pub before_tool: Vec<BeforeToolCallback>,
    pub after_tool: Vec<AfterToolCallback>,
    pub on_tool_error: Vec<OnToolErrorCallback>,
}

impl ModelCallbacks {
    /// Run before-model callbacks in order; the first response wins.
    pub fn run_before_model(
        &self,
        ctx: &InvocationContext,
        request: &mut LlmRequest,
    ) -> Result<Option<LlmResponse>> {
        first_some(&self.before_model, |cb| cb(ctx, request))
    }

    /// Run after-model callbacks in order; the first replacement wins.
    pub fn run_after_model(
        &self,
        ctx: &InvocationContext,
        response: &LlmResponse,
    ) -> Result<Option<LlmResponse>> {
        first_some(&self.after_model, |cb| cb(ctx, response))
    }

    /// Run model-error callbacks in order; the first recovery response wins.
    pub fn run_on_model_error(
        &self,
        ctx: &InvocationContext,
        request: &LlmRequest,
        error: &ModelError,
    ) -> Result<Option<LlmResponse>> {
        first_some(&self.on_model_error, |cb| cb(ctx, request, error))
    }

    /// Run before-tool callbacks in order; the first replacement result wins.
    pub fn run_before_tool(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
    ) -> Result<Option<ToolPayload>> {
        first_some(&self.before_tool, |cb| cb(ctx, tool, args))
    }

    pub fn run_after_tool(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
        result: &ToolPayload,
    ) -> Result<Option<ToolPayload>> {
        first_some(&self.after_tool, |cb| cb(ctx, tool, args, result))
    }

    /// Run tool-error callbacks in order; the first recovery result wins.
    pub fn run_on_tool_error(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
        error: &ToolError,
    ) -> Result<Option<ToolPayload>> {
        first_some(&self.on_tool_error, |cb| cb(ctx, tool, args, error))
    }
}

fn first_some<C, T>(
    callbacks: &[C],
    mut call: impl FnMut(&C) -> Result<Option<T>>,
) -> Result<Option<T>> {
    for callback in callbacks {
        if let Some(value) = call(callback)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

impl std::fmt::Debug for ModelCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCallbacks")
            .field("before_model", &self.before_model.len())
            .field("after_model", &self.after_model.len())
            .field("on_model_error", &self.on_model_error.len())
            .field("before_tool", &self.before_tool.len())
            .field("after_tool", &self.after_tool.len())
            .field("on_tool_error", &self.on_tool_error.len())
            .finish()
    }
}

/// An agent taking part in an invocation.
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Model and tool hooks, for agents backed by a model.
    ///
    /// Agents returning `None` do not take part in tool confirmation.
    fn model_callbacks(&self) -> Option<&ModelCallbacks> {
        None
    }
}

/// Builder for creating an [`LlmAgent`].
#[derive(Debug, Clone)]
pub struct LlmAgentBuilder {
    name: String,
    model: String,
    instruction: Option<String>,
    callbacks: ModelCallbacks,
}

impl LlmAgentBuilder {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instruction: None,
            callbacks: ModelCallbacks::default(),
        }
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn before_model(mut self, callback: BeforeModelCallback) -> Self {
        self.callbacks.before_model.push(callback);
        self
    }

    pub fn after_model(mut self, callback: AfterModelCallback) -> Self {
        self.callbacks.after_model.push(callback);
        self
    }

    pub fn on_model_error(mut self, callback: OnModelErrorCallback) -> Self {
        self.callbacks.on_model_error.push(callback);
        self
    }

    pub fn before_tool(mut self, callback: BeforeToolCallback) -> Self {
        self.callbacks.before_tool.push(callback);
        self
    }

    pub fn after_tool(mut self, callback: AfterToolCallback) -> Self {
        self.callbacks.after_tool.push(callback);
        self
    }

    pub fn on_tool_error(mut self, callback: OnToolErrorCallback) -> Self {
        self.callbacks.on_tool_error.push(callback);
        self
    }

    pub fn build(self) -> LlmAgent {
        LlmAgent {
            name: self.name,
            model: self.model,
            instruction: self.instruction,
            callbacks: self.callbacks,
        }
    }
}

/// An agent backed by a language model.
#[derive(Debug, Clone)]
pub struct LlmAgent {
    name: String,
    model: String,
    instruction: Option<String>,
    callbacks: ModelCallbacks,
}

impl LlmAgent {
    pub fn builder(name: impl Into<String>, model: impl Into<String>) -> LlmAgentBuilder {
        LlmAgentBuilder::new(name, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }
}

impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_callbacks(&self) -> Option<&ModelCallbacks> {
        Some(&self.callbacks)
    }
}

/// An agent with custom logic and no model hooks.
#[derive(Debug, Clone)]
pub struct CustomAgent {
    name: String,
}

impl CustomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Agent for CustomAgent {
    fn name(&self) -> &str {
        &self.name
    }
}
