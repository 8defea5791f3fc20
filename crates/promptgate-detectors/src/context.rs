//! Context classifier
//!
//! Derives per-prompt context signals used to distinguish legitimate
//! security discussion from actual threats. Pure and deterministic:
//! no network or model calls, and `classify` can never fail.

use aho_corasick::AhoCorasick;
use promptgate_core::{ContextSignals, Error, Result};
use regex::Regex;

/// Pure lexical classifier producing [`ContextSignals`]
pub struct ContextClassifier {
    interrogative: Regex,
    disclosure: Regex,
    inline_secret: Regex,
    config_vocabulary: AhoCorasick,
}

impl ContextClassifier {
    /// Compile the context rule set. Rule compilation failure is fatal
    /// at startup, never at request time.
    pub fn new() -> Result<Self> {
        // Leading wh-/modal words, explicit question mark, or common
        // "how do I" phrasings anywhere in the prompt.
        let interrogative = Self::compile(
            r"(?i)(^\s*(what|how|why|when|where|which|who|can|could|should|would|is|are|does|do|did)\b|\?|\bhow\s+(do|can|would|should)\s+(i|you|we)\b|\bwhat(?:'s| is)\s+the\s+best\s+way\b)",
        )?;

        // First-person or imperative disclosure templates around a
        // secret-bearing noun.
        let disclosure = Self::compile(
            r"(?i)\b(?:(?:my|our)\s+(?:\w+\s+){0,2}(?:password|passwd|key|keys|token|secret|credential|credentials|ssn)s?\s*(?:(?:is|are|was)\b|[=:])|here\s+is\s+my\b|here's\s+my\b|use\s+this\s+(?:password|key|token|secret|credential))",
        )?;

        // Bare "<secret-noun>: <value>" assignments also count as
        // disclosure even without first-person phrasing.
        let inline_secret = Self::compile(
            r"(?i)\b(?:password|passwd|pwd|api[_\s-]?key|access[_\s-]?key|secret|token|credential)s?\s*[:=]\s*\S{6,}",
        )?;

        // Developer-tooling vocabulary: naive question detection
        // under-recognizes configuration discussions, so this is a
        // first-class signal rather than being folded into is_question.
        let config_vocabulary = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build([
                "eslint",
                "prettier",
                "tsconfig",
                "webpack",
                "babel",
                "vite config",
                "package.json",
                "cargo.toml",
                "pyproject",
                "makefile",
                "dockerfile",
                "docker-compose",
                "ci pipeline",
                "github actions",
                "linter",
                "lint rule",
                "compiler flag",
                "compiler setting",
                "build tool",
                "build config",
                "api version",
                "api versioning",
                "environment variable",
                "config file",
                "configuration option",
                "feature flag",
            ])
            .map_err(|e| Error::malformed_rule(format!("config vocabulary: {e}")))?;

        Ok(Self {
            interrogative,
            disclosure,
            inline_secret,
            config_vocabulary,
        })
    }

    fn compile(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).map_err(|e| Error::malformed_rule(format!("context rule: {e}")))
    }

    /// Derive context signals for one prompt. Sub-millisecond, infallible.
    pub fn classify(&self, prompt: &str) -> ContextSignals {
        ContextSignals {
            is_question: self.interrogative.is_match(prompt),
            is_disclosure: self.disclosure.is_match(prompt) || self.inline_secret.is_match(prompt),
            is_config_context: self.config_vocabulary.is_match(prompt),
        }
    }
}
