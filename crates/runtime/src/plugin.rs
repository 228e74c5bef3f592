//! Plugins: named sets of optional lifecycle callbacks.
//!
//! A [`PluginSet`] is assembled once at setup and handed to every
//! [`InvocationContext`]; the pipeline only ever reads it. Each runner
//! invokes the matching callback of every plugin in registration order.
//! For hooks that can replace a value, the first plugin returning one
//! short-circuits the rest.

use crate::agent::{
    AfterAgentCallback, AfterModelCallback, AfterToolCallback, BeforeAgentCallback,
    BeforeModelCallback, BeforeToolCallback, OnModelErrorCallback, OnToolErrorCallback,
    ToolPayload,
};
use crate::model::{LlmRequest, LlmResponse, ModelError};
use crate::tools::ToolError;
use crate::{Error, InvocationContext, Result};
use session::{Content, Event};
use std::collections::HashSet;
use std::sync::Arc;

/// Runs when a user message enters the pipeline. Returning content replaces it.
pub type OnUserMessageCallback =
    Arc<dyn Fn(&InvocationContext, &Content) -> Result<Option<Content>> + Send + Sync>;
/// Runs before the run starts. Returning content ends the run early with it.
pub type BeforeRunCallback =
    Arc<dyn Fn(&InvocationContext) -> Result<Option<Content>> + Send + Sync>;
pub type AfterRunCallback = Arc<dyn Fn(&InvocationContext) + Send + Sync>;
/// Runs for every emitted event. Returning an event replaces it.
pub type OnEventCallback =
    Arc<dyn Fn(&InvocationContext, &Event) -> Result<Option<Event>> + Send + Sync>;
/// Releases whatever the plugin acquired.
pub type CloseFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Configuration for a [`Plugin`]. Every callback is optional.
#[derive(Clone, Default)]
pub struct PluginConfig {
    pub name: String,

    pub on_user_message: Option<OnUserMessageCallback>,
    pub on_event: Option<OnEventCallback>,

    pub before_run: Option<BeforeRunCallback>,
    pub after_run: Option<AfterRunCallback>,

    pub before_agent: Option<BeforeAgentCallback>,
    pub after_agent: Option<AfterAgentCallback>,

    pub before_model: Option<BeforeModelCallback>,
    pub after_model: Option<AfterModelCallback>,
    pub on_model_error: Option<OnModelErrorCallback>,

    pub before_tool: Option<BeforeToolCallback>,
    pub after_tool: Option<AfterToolCallback>,
    pub on_tool_error: Option<OnToolErrorCallback>,

    pub close: Option<CloseFn>,
}

impl PluginConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginConfig")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A registered plugin.
#[derive(Debug, Clone)]
pub struct Plugin {
    config: PluginConfig,
}

impl Plugin {
    /// Create a plugin from its configuration.
    pub fn new(config: PluginConfig) -> Result<Self> {
        if config.name.trim().is_empty() {
            return Err(Error::Config("plugin name must not be empty".into()));
        }
        Ok(Self { config })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Release the plugin's resources. A plugin without a close function
    /// closes successfully.
    pub fn close(&self) -> Result<()> {
        match &self.config.close {
            Some(close) => close(),
            None => Ok(()),
        }
    }

    fn wrap(&self, source: Error) -> Error {
        Error::Plugin {
            name: self.config.name.clone(),
            source: Box::new(source),
        }
    }
}

/// The ordered plugins of a runner.
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Plugin>,
}

impl PluginSet {
    /// Build a set, rejecting duplicate plugin names.
    pub fn new(plugins: Vec<Plugin>) -> Result<Self> {
        let mut seen = HashSet::new();
        for plugin in &plugins {
            if !seen.insert(plugin.name()) {
                return Err(Error::Config(format!(
                    "plugin {} registered twice",
                    plugin.name()
                )));
            }
        }
        Ok(Self { plugins })
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    pub fn run_on_user_message(
        &self,
        ctx: &InvocationContext,
        content: &Content,
    ) -> Result<Option<Content>> {
        self.run_until("on_user_message", |p| {
            p.config.on_user_message.as_ref().map(|cb| cb(ctx, content))
        })
    }

    pub fn run_before_run(&self, ctx: &InvocationContext) -> Result<Option<Content>> {
        self.run_until("before_run", |p| {
            p.config.before_run.as_ref().map(|cb| cb(ctx))
        })
    }

    pub fn run_after_run(&self, ctx: &InvocationContext) {
        for plugin in &self.plugins {
            if let Some(cb) = &plugin.config.after_run {
                cb(ctx);
            }
        }
    }

    pub fn run_on_event(&self, ctx: &InvocationContext, event: &Event) -> Result<Option<Event>> {
        self.run_until("on_event", |p| {
            p.config.on_event.as_ref().map(|cb| cb(ctx, event))
        })
    }

    pub fn run_before_agent(&self, ctx: &InvocationContext) -> Result<Option<Content>> {
        self.run_until("before_agent", |p| {
            p.config.before_agent.as_ref().map(|cb| cb(ctx))
        })
    }

    pub fn run_after_agent(&self, ctx: &InvocationContext) -> Result<Option<Content>> {
        self.run_until("after_agent", |p| {
            p.config.after_agent.as_ref().map(|cb| cb(ctx))
        })
    }

    pub fn run_before_model(
        &self,
        ctx: &InvocationContext,
        request: &mut LlmRequest,
    ) -> Result<Option<LlmResponse>> {
        self.run_until("before_model", |p| {
            p.config.before_model.as_ref().map(|cb| cb(ctx, request))
        })
    }

    pub fn run_after_model(
        &self,
        ctx: &InvocationContext,
        response: &LlmResponse,
    ) -> Result<Option<LlmResponse>> {
        self.run_until("after_model", |p| {
            p.config.after_model.as_ref().map(|cb| cb(ctx, response))
        })
    }

    pub fn run_on_model_error(
        &self,
        ctx: &InvocationContext,
        request: &LlmRequest,
        error: &ModelError,
    ) -> Result<Option<LlmResponse>> {
        self.run_until("on_model_error", |p| {
            p.config
                .on_model_error
                .as_ref()
                .map(|cb| cb(ctx, request, error))
        })
    }

    pub fn run_before_tool(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
    ) -> Result<Option<ToolPayload>> {
        self.run_until("before_tool", |p| {
            p.config.before_tool.as_ref().map(|cb| cb(ctx, tool, args))
        })
    }

    pub fn run_after_tool(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
        result: &ToolPayload,
    ) -> Result<Option<ToolPayload>> {
        self.run_until("after_tool", |p| {
            p.config
                .after_tool
                .as_ref()
                .map(|cb| cb(ctx, tool, args, result))
        })
    }

    pub fn run_on_tool_error(
        &self,
        ctx: &InvocationContext,
        tool: &str,
        args: &ToolPayload,
        error: &ToolError,
    ) -> Result<Option<ToolPayload>> {
        self.run_until("on_tool_error", |p| {
            p.config
                .on_tool_error
                .as_ref()
                .map(|cb| cb(ctx, tool, args, error))
        })
    }

    /// Close every plugin, returning the first failure.
    pub fn close(&self) -> Result<()> {
        let mut first_err = None;
        for plugin in &self.plugins {
            if let Err(e) = plugin.close() {
                tracing::warn!(plugin = plugin.name(), error = %e, "failed to close plugin");
                first_err.get_or_insert_with(|| plugin.wrap(e));
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn run_until<T>(
        &self,
        hook: &str,
        mut call: impl FnMut(&Plugin) -> Option<Result<Option<T>>>,
    ) -> Result<Option<T>> {
        for plugin in &self.plugins {
            match call(plugin) {
                Some(Ok(Some(value))) => {
                    tracing::debug!(plugin = plugin.name(), hook, "plugin replaced value");
                    return Ok(Some(value));
                }
                Some(Ok(None)) | None => {}
                Some(Err(e)) => return Err(plugin.wrap(e)),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::CustomAgent;
    use std::sync::Mutex;

    fn ctx() -> InvocationContext {
        InvocationContext::new(Arc::new(CustomAgent::new("router")))
    }

    fn plugin(config: PluginConfig) -> Plugin {
        Plugin::new(config).unwrap()
    }

    #[test]
    fn empty_name_rejected() {
        let err = Plugin::new(PluginConfig::new("  ")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = PluginSet::new(vec![
            plugin(PluginConfig::new("audit")),
            plugin(PluginConfig::new("audit")),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "config error: plugin audit registered twice");
    }

    #[test]
    fn close_without_function_succeeds() {
        assert!(plugin(PluginConfig::new("audit")).close().is_ok());
    }

    #[test]
    fn close_runs_all_and_reports_first_error() {
        let closed = Arc::new(Mutex::new(Vec::new()));
        let make = |name: &'static str, fail: bool| {
            let closed = Arc::clone(&closed);
            plugin(PluginConfig {
                close: Some(Arc::new(move || -> Result<()> {
                    closed.lock().unwrap().push(name);
                    if fail {
                        Err(Error::Config(format!("{name} failed")))
                    } else {
                        Ok(())
                    }
                })),
                ..PluginConfig::new(name)
            })
        };
        let set = PluginSet::new(vec![make("a", false), make("b", true), make("c", true)]).unwrap();

        let err = set.close().unwrap_err();
        assert_eq!(*closed.lock().unwrap(), vec!["a", "b", "c"]);
        assert!(matches!(err, Error::Plugin { ref name, .. } if name == "b"));
    }

    #[test]
    fn on_user_message_first_replacement_wins() {
        let set = PluginSet::new(vec![
            plugin(PluginConfig::new("observer")),
            plugin(PluginConfig {
                on_user_message: Some(Arc::new(
                    |_: &InvocationContext, c: &Content| -> Result<Option<Content>> {
                        Ok(Some(Content::user_text(c.text().to_uppercase())))
                    },
                )),
                ..PluginConfig::new("shout")
            }),
            plugin(PluginConfig {
                on_user_message: Some(Arc::new(
                    |_: &InvocationContext, _: &Content| -> Result<Option<Content>> {
                        panic!("must not run")
                    },
                )),
                ..PluginConfig::new("late")
            }),
        ])
        .unwrap();

        let replaced = set
            .run_on_user_message(&ctx(), &Content::user_text("hello"))
            .unwrap();
        assert_eq!(replaced.unwrap().text(), "HELLO");
    }

    #[test]
    fn hook_error_is_wrapped_with_plugin_name() {
        let set = PluginSet::new(vec![plugin(PluginConfig {
            on_event: Some(Arc::new(
                |_: &InvocationContext, _: &Event| -> Result<Option<Event>> {
                    Err(Error::Config("bad event".into()))
                },
            )),
            ..PluginConfig::new("guard")
        })])
        .unwrap();

        let err = set.run_on_event(&ctx(), &Event::user_text("hi")).unwrap_err();
        assert_eq!(err.to_string(), "plugin guard: config error: bad event");
    }

    #[test]
    fn plugins_without_hooks_pass_through() {
        let set = PluginSet::new(vec![plugin(PluginConfig::new("idle"))]).unwrap();
        let ctx = ctx();
        let mut request = LlmRequest::new("gemini-2.0-flash");
        let args = ToolPayload::new();

        assert!(set.run_before_run(&ctx).unwrap().is_none());
        assert!(set.run_before_agent(&ctx).unwrap().is_none());
        assert!(set.run_before_model(&ctx, &mut request).unwrap().is_none());
        assert!(set.run_after_model(&ctx, &LlmResponse::default()).unwrap().is_none());
        assert!(set.run_before_tool(&ctx, "delete", &args).unwrap().is_none());
        assert!(set.run_after_agent(&ctx).unwrap().is_none());
        assert!(
            set.run_on_model_error(&ctx, &request, &ModelError::Timeout(5_000))
                .unwrap()
                .is_none()
        );
        assert!(set.run_after_tool(&ctx, "delete", &args, &args).unwrap().is_none());
        let declined = ToolError::Declined {
            call_id: "delete-1".into(),
        };
        assert!(
            set.run_on_tool_error(&ctx, "delete", &args, &declined)
                .unwrap()
                .is_none()
        );
        assert!(set.get("idle").is_some());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn before_tool_can_replace_result() {
        let set = PluginSet::new(vec![plugin(PluginConfig {
            before_tool: Some(Arc::new(
                |_: &InvocationContext,
                 tool: &str,
                 _: &ToolPayload|
                 -> Result<Option<ToolPayload>> {
                    let mut result = ToolPayload::new();
                    result.insert("skipped".into(), tool.into());
                    Ok(Some(result))
                },
            )),
            ..PluginConfig::new("dry_run")
        })])
        .unwrap();

        let result = set
            .run_before_tool(&ctx(), "delete", &ToolPayload::new())
            .unwrap()
            .unwrap();
        assert_eq!(result["skipped"], "delete");
    }

    #[test]
    fn after_agent_can_append_content() {
        let set = PluginSet::new(vec![plugin(PluginConfig {
            after_agent: Some(Arc::new(
                |ctx: &InvocationContext| -> Result<Option<Content>> {
                    Ok(Some(Content::user_text(format!("{} done", ctx.agent().name()))))
                },
            )),
            ..PluginConfig::new("summary")
        })])
        .unwrap();

        let content = set.run_after_agent(&ctx()).unwrap().unwrap();
        assert_eq!(content.text(), "router done");
    }

    #[test]
    fn model_error_recovery_skips_silent_plugins() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let set = PluginSet::new(vec![
            plugin(PluginConfig {
                on_model_error: Some(Arc::new(
                    move |_: &InvocationContext,
                          _: &LlmRequest,
                          err: &ModelError|
                          -> Result<Option<LlmResponse>> {
                        record.lock().unwrap().push(err.to_string());
                        Ok(None)
                    },
                )),
                ..PluginConfig::new("log")
            }),
            plugin(PluginConfig {
                on_model_error: Some(Arc::new(
                    |_: &InvocationContext,
                     _: &LlmRequest,
                     _: &ModelError|
                     -> Result<Option<LlmResponse>> {
                        Ok(Some(LlmResponse::from_content(Content::user_text("fallback"))))
                    },
                )),
                ..PluginConfig::new("fallback")
            }),
        ])
        .unwrap();

        let request = LlmRequest::new("gemini-2.0-flash");
        let error = ModelError::Backend {
            code: "503".into(),
            message: "unavailable".into(),
        };
        let response = set
            .run_on_model_error(&ctx(), &request, &error)
            .unwrap()
            .unwrap();
        assert_eq!(response.content.unwrap().text(), "fallback");
        assert_eq!(*seen.lock().unwrap(), vec!["backend error 503: unavailable"]);
    }

    #[test]
    fn after_tool_can_replace_result() {
        let set = PluginSet::new(vec![plugin(PluginConfig {
            after_tool: Some(Arc::new(
                |_: &InvocationContext,
                 _: &str,
                 _: &ToolPayload,
                 result: &ToolPayload|
                 -> Result<Option<ToolPayload>> {
                    let mut redacted = result.clone();
                    redacted.remove("token");
                    Ok(Some(redacted))
                },
            )),
            ..PluginConfig::new("redact")
        })])
        .unwrap();

        let mut result = ToolPayload::new();
        result.insert("token".into(), "s3cret".into());
        result.insert("status".into(), "ok".into());
        let redacted = set
            .run_after_tool(&ctx(), "login", &ToolPayload::new(), &result)
            .unwrap()
            .unwrap();
        assert!(!redacted.contains_key("token"));
        assert_eq!(redacted["status"], "ok");
    }

    #[test]
    fn tool_error_hook_failure_is_wrapped() {
        let set = PluginSet::new(vec![plugin(PluginConfig {
            on_tool_error: Some(Arc::new(
                |_: &InvocationContext,
                 _: &str,
                 _: &ToolPayload,
                 err: &ToolError|
                 -> Result<Option<ToolPayload>> { Err(err.clone().into()) },
            )),
            ..PluginConfig::new("strict")
        })])
        .unwrap();

        let error = ToolError::Execution("disk full".into());
        let err = set
            .run_on_tool_error(&ctx(), "delete", &ToolPayload::new(), &error)
            .unwrap_err();
        assert_eq!(err.to_string(), "plugin strict: execution failed: disk full");
    }

    #[test]
    fn after_run_reaches_every_plugin() {
        let count = Arc::new(Mutex::new(0));
        let make = |name: &str| {
            let count = Arc::clone(&count);
            plugin(PluginConfig {
                after_run: Some(Arc::new(move |_: &InvocationContext| {
                    *count.lock().unwrap() += 1;
                })),
                ..PluginConfig::new(name)
            })
        };
        let set = PluginSet::new(vec![make("a"), make("b")]).unwrap();
        set.run_after_run(&ctx());
        assert_eq!(*count.lock().unwrap(), 2);
    }
}
