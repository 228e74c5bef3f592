//! Tool-side error type shared with the tool callbacks.

pub mod errors;

pub use errors::ToolError;
