//! Tool confirmation types and the pieces used to resolve them from history.

mod decode;
pub mod errors;
mod scan;
mod tool_confirmation;

pub use decode::decode_confirmation;
pub use errors::DecodeError;
pub use scan::{UserTurn, latest_user_turn};
pub use tool_confirmation::{REQUEST_CONFIRMATION_FUNCTION_CALL_NAME, ToolConfirmation};
