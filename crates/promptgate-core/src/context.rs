//! Context signals derived once per prompt

use serde::{Deserialize, Serialize};

/// Booleans derived from the prompt text before any detection runs.
///
/// Created once per validation call and shared read-only with every
/// subsequent phase; never mutated after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSignals {
    /// Prompt matches interrogative lexical patterns
    pub is_question: bool,

    /// Prompt matches first-person or imperative disclosure templates.
    /// Disclosure takes precedence over question/configuration status.
    pub is_disclosure: bool,

    /// Prompt matches technical-configuration phrasing (build tools,
    /// linters, API versioning, compiler settings). Kept separate from
    /// `is_question` so callers can reason about why something was
    /// allowed.
    pub is_config_context: bool,
}

impl ContextSignals {
    /// Whether the context-override rule suppresses blocking for
    /// suppressible categories: educational or configuration context
    /// without an accompanying disclosure.
    pub fn suppresses_blocking(&self) -> bool {
        (self.is_question || self.is_config_context) && !self.is_disclosure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclosure_overrides_question() {
        let signals = ContextSignals {
            is_question: true,
            is_disclosure: true,
            is_config_context: false,
        };
        assert!(!signals.suppresses_blocking());
    }

    #[test]
    fn config_context_suppresses_without_disclosure() {
        let signals = ContextSignals {
            is_question: false,
            is_disclosure: false,
            is_config_context: true,
        };
        assert!(signals.suppresses_blocking());
    }

    #[test]
    fn plain_statement_does_not_suppress() {
        assert!(!ContextSignals::default().suppresses_blocking());
    }
}
