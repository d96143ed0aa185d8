//! One-shot title derivation for new sessions.

use confab_backend::ModelBackend;
use tracing::debug;

use crate::profiles::FAST_MODEL;

const TITLE_FALLBACK: &str = "Untitled Session";

/// Derives a short label from a session's opening turn.
///
/// Best-effort by contract: any backend failure or empty reply yields
/// the fixed fallback label. Title generation is cosmetic and must
/// never fail or block the primary conversation flow.
pub async fn generate_title(backend: &dyn ModelBackend, opening: &str) -> String {
    let prompt = format!(
        "Generate a very short, punchy title (at most 4 words) for a coding chat \
         that starts with: \"{opening}\". Do not use quotes."
    );
    match backend.generate_once(FAST_MODEL, &prompt).await {
        Ok(reply) => {
            let title = reply.trim();
            if title.is_empty() {
                TITLE_FALLBACK.to_string()
            } else {
                title.to_string()
            }
        }
        Err(err) => {
            debug!(error = %err, "title generation failed, using fallback");
            TITLE_FALLBACK.to_string()
        }
    }
}
