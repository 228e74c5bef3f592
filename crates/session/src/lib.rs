//! Conversation history for Ratify.
//!
//! This crate holds the data model the confirmation resolver reads: the
//! ordered events of a conversation, the parts inside each event, and the
//! session abstraction that exposes them.
//!
//! # Core Concepts
//!
//! ## Event
//!
//! An [`Event`] is one recorded turn. It has an `author` (either
//! [`USER_AUTHOR`] or the name of an agent or tool) and optional
//! [`Content`] made of ordered [`Part`]s. A part is plain text, a
//! [`FunctionCall`] issued by the model, or a [`FunctionResponse`] answering
//! one.
//!
//! ## Session
//!
//! The [`Session`] trait exposes a conversation's history through the
//! read-only [`Events`] view. [`MemorySession`] keeps everything in a
//! `Vec` and can be loaded from a JSON document.
//!
//! # Example
//!
//! ```
//! use session::{Event, FunctionResponse, MemorySession, Session};
//!
//! let mut session = MemorySession::new();
//! session.append(Event::user_text("Delete the temp files"));
//! session.append(Event::user_responses(vec![FunctionResponse::new(
//!     "call-1",
//!     "adk_request_confirmation",
//!     None,
//! )]));
//!
//! let events = session.events();
//! assert_eq!(events.len(), 2);
//! assert_eq!(events.at(1).unwrap().function_responses().len(), 1);
//! ```

mod error;
mod event;
mod session;

pub use error::{Error, Result};
pub use event::{
    Content, Event, FunctionCall, FunctionResponse, Part, Role, SessionId, USER_AUTHOR,
};
pub use session::{Events, MemorySession, Session};
