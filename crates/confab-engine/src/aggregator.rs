//! Drives one outbound turn and republishes the growing response.

use confab_backend::Part;
use confab_store::{Attachment, ChatMode, Variant};
use futures::StreamExt;

use crate::errors::EngineError;
use crate::multiplexer::SessionMultiplexer;

/// Sends one turn through the multiplexer's session and streams the
/// response into `on_chunk`.
///
/// The sink always receives the full accumulated text so far, never a
/// delta, so a caller renders by replacement instead of concatenation.
/// Fragments arrive in strict receipt order; fragments without text
/// are skipped. Message state is never touched here: on failure the
/// error is returned and the caller decides how to mark the
/// in-progress message.
///
/// An empty turn (no text, no attachments) is a caller-side
/// precondition violation; the engine rejects it before this layer.
pub async fn send_turn(
    multiplexer: &mut SessionMultiplexer,
    text: &str,
    attachments: &[Attachment],
    variant: Variant,
    mode: ChatMode,
    mut on_chunk: impl FnMut(&str),
) -> Result<String, EngineError> {
    let mut parts = Vec::with_capacity(attachments.len() + 1);
    for attachment in attachments {
        parts.push(Part::inline_data(
            attachment.data.clone(),
            attachment.media_type.clone(),
        ));
    }
    if !text.is_empty() {
        parts.push(Part::text(text));
    }
    debug_assert!(!parts.is_empty(), "empty turn reached the aggregator");

    let session = multiplexer.session_for(variant, mode).await?;
    let mut stream = session.send_stream(parts).await?;

    let mut accumulated = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        match fragment.text {
            Some(text) if !text.is_empty() => {
                accumulated.push_str(&text);
                on_chunk(&accumulated);
            }
            _ => {}
        }
    }

    Ok(accumulated)
}
