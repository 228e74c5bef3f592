//! Backward scan of the history for the latest user turn.

use session::{Events, FunctionResponse};

/// Confirmation responses found in the most recent user-authored event.
#[derive(Debug, Clone)]
pub struct UserTurn<'a> {
    /// Index of the selected event in the history.
    pub index: usize,
    /// Responses whose name matched the confirmation function, in order.
    pub responses: Vec<&'a FunctionResponse>,
}

/// Find the most recent user-authored event and collect its responses
/// named `function_name`.
///
/// Returns `None` when the history has no user-authored event or when that
/// event carries no function responses at all. Events older than the latest
/// user turn are never inspected.
pub fn latest_user_turn<'a>(events: &'a dyn Events, function_name: &str) -> Option<UserTurn<'a>> {
    let (index, event) = (0..events.len())
        .rev()
        .filter_map(move |i| events.at(i).map(|event| (i, event)))
        .find(|(_, event)| event.is_user())?;

    let responses = event.function_responses();
    if responses.is_empty() {
        tracing::debug!(index, "latest user event has no function responses");
        return None;
    }

    let responses: Vec<_> = responses
        .into_iter()
        .filter(|fr| fr.name == function_name)
        .collect();
    tracing::debug!(index, matched = responses.len(), "scanned latest user event");

    Some(UserTurn { index, responses })
}
