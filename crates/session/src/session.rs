//! Session traits and the in-memory session.

use crate::{Event, Result, SessionId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered, read-only view over a session's events (oldest first).
pub trait Events {
    fn len(&self) -> usize;

    fn at(&self, index: usize) -> Option<&Event>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Events for Vec<Event> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn at(&self, index: usize) -> Option<&Event> {
        self.get(index)
    }
}

/// A conversation whose history can be read during an invocation.
pub trait Session: Send + Sync {
    fn id(&self) -> SessionId;

    fn events(&self) -> &dyn Events;
}

/// Session held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySession {
    #[serde(default)]
    pub id: SessionId,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            id: SessionId::new(),
            events,
        }
    }

    /// Load a session from a JSON history file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a session from a JSON document.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append an event to the history.
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl Session for MemorySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn events(&self) -> &dyn Events {
        &self.events
    }
}
