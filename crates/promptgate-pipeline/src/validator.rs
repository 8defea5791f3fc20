//! Validation pipeline orchestration
//!
//! One `validate` call moves through the phases
//! `Received -> ContextResolved -> Detected -> Merged -> Sanitized ->
//! Decided`. Context classification runs once and its result is shared
//! read-only with every phase; the pattern/entropy detector and all
//! classifier adapters then fan out concurrently, each adapter bounded
//! by its own deadline. The merge is a bounded-wait join: the pipeline
//! proceeds with whatever subset succeeded.
//!
//! Calls are independent and stateless apart from the read-only level
//! registry, so one validator can serve many concurrent prompts. If a
//! caller drops the future mid-call, all in-flight adapter requests are
//! dropped with it.

use std::sync::Arc;

use futures::future::join_all;
use promptgate_classifiers::Classifier;
use promptgate_core::{
    Error, Finding, Result, SecurityLevelConfig, SecurityLevelRegistry, ValidationResult,
};
use promptgate_detectors::{ContextClassifier, PatternEntropyDetector};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::merger;

/// Pipeline phase, for instrumentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Received,
    ContextResolved,
    Detected,
    Merged,
    Sanitized,
    Decided,
}

impl std::fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::ContextResolved => "context_resolved",
            Self::Detected => "detected",
            Self::Merged => "merged",
            Self::Sanitized => "sanitized",
            Self::Decided => "decided",
        };
        f.write_str(name)
    }
}

/// The multi-phase prompt validator
pub struct PromptValidator {
    context: ContextClassifier,
    detector: PatternEntropyDetector,
    classifiers: Vec<Arc<dyn Classifier>>,
    registry: SecurityLevelRegistry,
}

impl PromptValidator {
    /// Build a validator with the built-in security levels and no
    /// external classifiers. Fails only on a malformed detector rule.
    pub fn new() -> Result<Self> {
        Self::with_registry(SecurityLevelRegistry::builtin())
    }

    /// Build a validator over a custom level registry
    pub fn with_registry(registry: SecurityLevelRegistry) -> Result<Self> {
        Ok(Self {
            context: ContextClassifier::new()?,
            detector: PatternEntropyDetector::new()?,
            classifiers: Vec::new(),
            registry,
        })
    }

    /// Register an external classifier adapter
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    /// The level registry this validator resolves names against
    pub fn registry(&self) -> &SecurityLevelRegistry {
        &self.registry
    }

    /// Validate a prompt under a named security level
    pub async fn validate(&self, prompt: &str, level: &str) -> Result<ValidationResult> {
        let config = self.registry.get(level)?.clone();
        self.validate_with(prompt, &config).await
    }

    /// Validate a prompt under an explicit config. The config reference
    /// is per-call; nothing shared is ever mutated to switch levels.
    pub async fn validate_with(
        &self,
        prompt: &str,
        config: &SecurityLevelConfig,
    ) -> Result<ValidationResult> {
        // Invalid config is the one fatal input; rejected before any
        // detection work begins.
        config.validate()?;
        debug!(phase = %ValidationPhase::Received, level = %config.name, "validation started");

        let signals = self.context.classify(prompt);
        debug!(
            phase = %ValidationPhase::ContextResolved,
            is_question = signals.is_question,
            is_disclosure = signals.is_disclosure,
            is_config_context = signals.is_config_context,
            "context classified"
        );

        let (findings, failed) = self.run_detection(prompt, config).await;
        debug!(
            phase = %ValidationPhase::Detected,
            findings = findings.len(),
            failed_classifiers = failed.len(),
            "detection fan-out complete"
        );

        let result = merger::decide(prompt, signals, findings, config, &failed);
        debug!(
            phase = %ValidationPhase::Decided,
            blocked = result.is_blocked,
            "validation finished"
        );
        Ok(result)
    }

    /// Fan out the deterministic detector and every adapter, then join
    /// with per-adapter deadlines. Phase outputs accumulate append-only;
    /// no phase's findings are ever replaced by a later phase.
    async fn run_detection(
        &self,
        prompt: &str,
        config: &SecurityLevelConfig,
    ) -> (Vec<Finding>, Vec<String>) {
        let adapter_futures = self.classifiers.iter().map(|classifier| {
            let classifier = Arc::clone(classifier);
            async move {
                let name = classifier.name().to_string();
                match timeout(classifier.timeout(), classifier.classify(prompt)).await {
                    Ok(Ok(findings)) => (name, Ok(findings)),
                    Ok(Err(e)) => (name, Err(e)),
                    Err(_) => {
                        let err = Error::Timeout(name.clone());
                        (name, Err(err))
                    }
                }
            }
        });

        // The detector runs inside the same join so a slow adapter
        // never serializes behind it.
        let (detector_findings, adapter_results) = tokio::join!(
            async { self.detector.detect(prompt, config) },
            join_all(adapter_futures)
        );

        let mut findings = detector_findings;
        let mut failed = Vec::new();

        for (name, outcome) in adapter_results {
            match outcome {
                Ok(adapter_findings) => findings.extend(adapter_findings),
                Err(e) => {
                    warn!(classifier = %name, error = %e, "classifier degraded, proceeding without it");
                    failed.push(name);
                }
            }
        }

        (findings, failed)
    }
}
