//! Promptgate Detectors
//!
//! Deterministic, in-process detection phases:
//! - Context classification (question / disclosure / configuration
//!   signals), derived once per prompt and shared with every phase
//! - Structural rule matching for known secret, PII, and attack formats
//! - Entropy scanning with keyword co-occurrence gating
//!
//! Everything here is pure and sub-millisecond; rule compilation happens
//! once at startup and is the only fallible step.

pub mod context;
pub mod detector;
pub mod entropy;
pub mod patterns;

pub use context::ContextClassifier;
pub use detector::PatternEntropyDetector;
pub use entropy::{shannon_entropy, EntropyScanner};
pub use patterns::StructuralRules;
