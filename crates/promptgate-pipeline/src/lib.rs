//! Promptgate Pipeline
//!
//! The multi-phase decision pipeline: accepts a prompt, gathers
//! findings from the deterministic detector and every registered
//! classifier adapter concurrently, applies the context-override rule
//! uniformly, resolves overlapping spans into one redaction pass, and
//! merges everything into a single auditable verdict under a named
//! security level.
//!
//! Phase outputs are append-only collections merged through one
//! accumulation path; nothing is ever overwritten between phases.

pub mod merger;
pub mod sanitizer;
pub mod validator;

pub use merger::decide;
pub use sanitizer::{resolve, CandidateSpan};
pub use validator::{PromptValidator, ValidationPhase};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::sanitizer::CandidateSpan;
    pub use crate::validator::{PromptValidator, ValidationPhase};
    pub use promptgate_classifiers::{Classifier, HttpClassifier};
    pub use promptgate_core::prelude::*;
}
