//! Projection of the engine's message list into the backend's turn
//! history representation.

use confab_backend::{HistoryTurn, Part, TurnRole};
use confab_store::{Message, Role};

use crate::profiles::is_greeting_id;

/// Encodes confirmed messages as backend turns.
///
/// Mid-stream, errored, and synthetic greeting messages are dropped:
/// none of them represent turns the backend ever confirmed. For each
/// retained message the attachments become inline-data parts in
/// attachment order, followed by a text part iff the content is
/// non-empty. Deterministic: identical input yields identical output.
pub fn encode_history(messages: &[Message]) -> Vec<HistoryTurn> {
    messages
        .iter()
        .filter(|message| !message.is_streaming && !message.error && !is_greeting_id(&message.id))
        .map(|message| {
            let mut parts = Vec::with_capacity(message.attachments.len() + 1);
            for attachment in &message.attachments {
                parts.push(Part::inline_data(
                    attachment.data.clone(),
                    attachment.media_type.clone(),
                ));
            }
            if !message.content.is_empty() {
                parts.push(Part::text(message.content.clone()));
            }
            let role = match message.role {
                Role::User => TurnRole::User,
                Role::Model => TurnRole::Model,
            };
            HistoryTurn::new(role, parts)
        })
        .collect()
}
