//! Per-invocation context handed to processors and callbacks.

use crate::agent::Agent;
use crate::plugin::PluginSet;
use session::Session;
use std::sync::Arc;

/// State shared by everything running within one invocation.
#[derive(Clone)]
pub struct InvocationContext {
    invocation_id: String,
    agent: Arc<dyn Agent>,
    session: Option<Arc<dyn Session>>,
    plugins: Arc<PluginSet>,
}

impl InvocationContext {
    /// Create a context with no session and no plugins.
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            invocation_id: String::new(),
            agent,
            session: None,
            plugins: Arc::new(PluginSet::default()),
        }
    }

    pub fn with_invocation_id(mut self, invocation_id: impl Into<String>) -> Self {
        self.invocation_id = invocation_id.into();
        self
    }

    pub fn with_session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_plugins(mut self, plugins: Arc<PluginSet>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn session(&self) -> Option<&dyn Session> {
        self.session.as_deref()
    }

    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }
}

impl std::fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("invocation_id", &self.invocation_id)
            .field("agent", &self.agent.name())
            .field("session", &self.session.as_ref().map(|s| s.id()))
            .field("plugins", &self.plugins.len())
            .finish()
    }
}
