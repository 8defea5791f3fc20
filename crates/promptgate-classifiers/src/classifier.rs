//! Classifier adapter trait

use async_trait::async_trait;
use promptgate_core::{Finding, Result};
use std::time::Duration;

/// Default per-adapter invocation deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(800);

/// Default minimum-confidence floor applied at the adapter boundary
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Uniform interface over external classifiers
///
/// Each adapter normalizes its service's output shape into findings and
/// applies its minimum-confidence floor before anything reaches the
/// merger. Adapters are an accuracy enhancement, not a correctness
/// dependency: a failing adapter returns an error that the pipeline
/// converts into a degraded-coverage warning, never an aborted call.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the prompt, returning zero or more findings at or above
    /// this adapter's confidence floor
    async fn classify(&self, text: &str) -> Result<Vec<Finding>>;

    /// Adapter name, used in finding provenance and warnings
    fn name(&self) -> &str;

    /// Deadline the pipeline enforces on this adapter's invocation
    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }
}
