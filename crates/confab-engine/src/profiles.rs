//! Configuration resolution: (variant, mode) to a concrete backend
//! invocation profile. Pure, total, no I/O.

use confab_backend::{HistoryTurn, SessionSpec, ToolSpec};
use confab_store::{ChatMode, Variant};

pub const FLAGSHIP_MODEL: &str = "gemini-3-pro-preview";
pub const FAST_MODEL: &str = "gemini-2.5-flash";

const EXTENDED_THINKING_BUDGET: u32 = 32_768;
const BALANCED_THINKING_BUDGET: u32 = 16_384;
const SAMPLING_TEMPERATURE: f32 = 0.2;

const PRIMARY_SYSTEM_INSTRUCTION: &str = "\
You are a senior polyglot software engineer. Your output must be \
production quality: strict typing, thorough error handling, and \
secure-by-default code. Prefer complete, runnable answers over \
sketches, and call out trade-offs when they matter.";

const UNIFIED_SYSTEM_INSTRUCTION: &str = "\
You are a unified assistant combining deep reasoning, real-time web \
search, and expert coding ability. Analyze each request, decide which \
capability it needs, and apply it without narrating the choice. Hold \
code output to senior-engineer production standards.";

const PRIMARY_GREETING_ID: &str = "greeting-primary";
const UNIFIED_GREETING_ID: &str = "greeting-unified";

const PRIMARY_GREETING: &str = "I write production-grade code in any language stack. \
Describe what you need and I will return a complete, defensively built answer.";

const UNIFIED_GREETING: &str = "Unified engine online: reasoning, live search, and \
coding converged. State your directive.";

/// Resolved backend call parameters for one configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationProfile {
    pub model: &'static str,
    pub tools: Vec<ToolSpec>,
    pub thinking_budget: Option<u32>,
    pub system_instruction: &'static str,
    pub temperature: f32,
}

impl InvocationProfile {
    /// Expands the profile into a session-creation request seeded with
    /// the given history.
    pub fn to_session_spec(&self, history: Vec<HistoryTurn>) -> SessionSpec {
        SessionSpec {
            model: self.model.to_string(),
            history,
            system_instruction: self.system_instruction.to_string(),
            tools: self.tools.clone(),
            thinking_budget: self.thinking_budget,
            temperature: Some(self.temperature),
        }
    }
}

/// Maps an assistant variant and requested mode to a concrete profile.
///
/// The unified variant pins its own configuration regardless of the
/// requested mode; mode forcing visible to the caller happens in
/// [`normalize_mode`], not here.
pub fn resolve(variant: Variant, mode: ChatMode) -> InvocationProfile {
    match variant {
        Variant::Unified => InvocationProfile {
            model: FLAGSHIP_MODEL,
            tools: vec![ToolSpec::WebSearch],
            thinking_budget: Some(BALANCED_THINKING_BUDGET),
            system_instruction: UNIFIED_SYSTEM_INSTRUCTION,
            temperature: SAMPLING_TEMPERATURE,
        },
        Variant::Primary => match mode {
            ChatMode::Standard => InvocationProfile {
                model: FLAGSHIP_MODEL,
                tools: Vec::new(),
                thinking_budget: None,
                system_instruction: PRIMARY_SYSTEM_INSTRUCTION,
                temperature: SAMPLING_TEMPERATURE,
            },
            ChatMode::Search => InvocationProfile {
                model: FAST_MODEL,
                tools: vec![ToolSpec::WebSearch],
                thinking_budget: None,
                system_instruction: PRIMARY_SYSTEM_INSTRUCTION,
                temperature: SAMPLING_TEMPERATURE,
            },
            ChatMode::Thinking => InvocationProfile {
                model: FLAGSHIP_MODEL,
                tools: Vec::new(),
                thinking_budget: Some(EXTENDED_THINKING_BUDGET),
                system_instruction: PRIMARY_SYSTEM_INSTRUCTION,
                temperature: SAMPLING_TEMPERATURE,
            },
        },
    }
}

/// Pre-resolution input normalization: the unified variant always runs
/// in the reasoning-heavy mode, and that forcing is visible to the
/// caller through the active session state.
pub fn normalize_mode(variant: Variant, mode: ChatMode) -> ChatMode {
    match variant {
        Variant::Unified => ChatMode::Thinking,
        Variant::Primary => mode,
    }
}

/// Mode a freshly created session starts in.
pub fn default_mode(variant: Variant) -> ChatMode {
    match variant {
        Variant::Unified => ChatMode::Thinking,
        Variant::Primary => ChatMode::Standard,
    }
}

/// Synthetic opening message shown when a session starts. Never
/// replayed to the backend.
pub fn greeting(variant: Variant) -> (&'static str, &'static str) {
    match variant {
        Variant::Primary => (PRIMARY_GREETING_ID, PRIMARY_GREETING),
        Variant::Unified => (UNIFIED_GREETING_ID, UNIFIED_GREETING),
    }
}

pub(crate) fn is_greeting_id(id: &str) -> bool {
    id == PRIMARY_GREETING_ID || id == UNIFIED_GREETING_ID
}
