//! Promptgate Core
//!
//! Shared types, security levels, and error handling for the Promptgate
//! prompt validation pipeline.
//!
//! This crate provides:
//! - Detection evidence types (`Finding`, `Category`, `FindingSource`)
//! - Per-prompt context signals shared read-only across phases
//! - Named, immutable security level configs and their registry
//! - Sanitization span and validation result types
//! - The pipeline error taxonomy

pub mod context;
pub mod error;
pub mod finding;
pub mod result;
pub mod security_level;

pub use context::ContextSignals;
pub use error::{Error, Result};
pub use finding::{Category, Finding, FindingSource};
pub use result::{SanitizationSpan, ValidationResult};
pub use security_level::{SecurityLevelConfig, SecurityLevelRegistry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::context::ContextSignals;
    pub use crate::error::{Error, Result};
    pub use crate::finding::{Category, Finding, FindingSource};
    pub use crate::result::{SanitizationSpan, ValidationResult};
    pub use crate::security_level::{SecurityLevelConfig, SecurityLevelRegistry};
}
