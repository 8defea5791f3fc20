//! Decision merger
//!
//! Combines the context signals, every phase's accumulated findings,
//! and the security level config into the final verdict, triggering
//! the sanitizer over the union of accepted spans.
//!
//! Findings are never removed here: a context-suppressed finding stays
//! in the audit list and surfaces as an informational warning, it just
//! stops contributing to blocking and sanitization.

use std::collections::{BTreeMap, BTreeSet};

use promptgate_core::{Category, ContextSignals, Finding, SecurityLevelConfig, ValidationResult};
use tracing::debug;

use crate::sanitizer::{self, CandidateSpan};
use crate::validator::ValidationPhase;

/// Produce the final verdict for one validation call.
///
/// `failed_classifiers` names adapters that returned errors or timed
/// out; each contributes a degraded-coverage warning, never a failure.
pub fn decide(
    prompt: &str,
    signals: ContextSignals,
    findings: Vec<Finding>,
    config: &SecurityLevelConfig,
    failed_classifiers: &[String],
) -> ValidationResult {
    let context_suppresses = signals.suppresses_blocking();

    // The context-override rule, applied uniformly to every category
    // where context matters. Jailbreak never qualifies.
    let is_suppressed = |finding: &Finding| {
        finding.category.is_threat()
            && context_suppresses
            && finding.category.context_suppressible()
    };

    let mut warnings = Vec::new();
    let mut suppressed_categories: BTreeSet<Category> = BTreeSet::new();
    let mut max_by_category: BTreeMap<Category, f32> = BTreeMap::new();
    let mut candidates: Vec<CandidateSpan> = Vec::new();
    let mut confidence_score = 1.0f32;
    let mut any_active = false;

    for finding in &findings {
        if !finding.category.is_threat() {
            continue;
        }

        if is_suppressed(finding) {
            suppressed_categories.insert(finding.category);
            continue;
        }

        any_active = true;
        let entry = max_by_category.entry(finding.category).or_insert(0.0);
        *entry = entry.max(finding.confidence);

        if finding.confidence >= config.detection_threshold {
            candidates.extend(CandidateSpan::from_finding(finding));
        }
    }

    if any_active {
        confidence_score = max_by_category.values().fold(0.0, |acc, &v| acc.max(v));
    }

    let mut blocked_categories = BTreeSet::new();
    for (&category, &confidence) in &max_by_category {
        if confidence >= config.blocking_threshold {
            blocked_categories.insert(category);
        } else if confidence >= config.detection_threshold {
            warnings.push(format!(
                "potential {} detected (confidence {:.2}), below blocking threshold",
                category, confidence
            ));
        }
    }

    for category in &suppressed_categories {
        warnings.push(format!(
            "{} finding suppressed by question/configuration context",
            category
        ));
    }

    for name in failed_classifiers {
        warnings.push(format!(
            "classifier '{}' unavailable, detection coverage reduced",
            name
        ));
    }

    debug!(
        phase = %ValidationPhase::Merged,
        blocked_categories = blocked_categories.len(),
        suppressed = suppressed_categories.len(),
        findings = findings.len(),
        "findings merged per category"
    );

    let (sanitized_text, sanitization_spans) = sanitizer::resolve(prompt, candidates);
    debug!(
        phase = %ValidationPhase::Sanitized,
        spans = sanitization_spans.len(),
        "sanitization spans applied"
    );

    let is_blocked = config.block_mode && !blocked_categories.is_empty();

    ValidationResult {
        sanitized_text,
        findings,
        context_signals: signals,
        sanitization_spans,
        blocked_categories,
        warnings,
        confidence_score,
        is_blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptgate_core::FindingSource;

    fn no_context() -> ContextSignals {
        ContextSignals::default()
    }

    fn question_context() -> ContextSignals {
        ContextSignals {
            is_question: true,
            is_disclosure: false,
            is_config_context: false,
        }
    }

    fn spanned(category: Category, confidence: f32, span: (usize, usize)) -> Finding {
        Finding::spanned(category, confidence, FindingSource::Pattern, span)
    }

    #[test]
    fn category_blocks_at_blocking_threshold() {
        let config = SecurityLevelConfig::balanced();
        let prompt = "0123456789abcdef";
        let findings = vec![spanned(Category::Injection, 0.9, (0, 4))];

        let result = decide(prompt, no_context(), findings, &config, &[]);
        assert!(result.blocked_categories.contains(&Category::Injection));
        assert!(result.is_blocked);
        assert!(result.sanitized_text.starts_with("[REDACTED_INJECTION]"));
    }

    #[test]
    fn category_warns_between_thresholds() {
        let config = SecurityLevelConfig::balanced();
        let findings = vec![spanned(Category::Injection, 0.7, (0, 4))];

        let result = decide("0123456789", no_context(), findings, &config, &[]);
        assert!(result.blocked_categories.is_empty());
        assert!(!result.is_blocked);
        assert!(result.warnings.iter().any(|w| w.contains("injection")));
        // Still sanitized: above detection threshold
        assert!(result.sanitized_text.contains("[REDACTED_INJECTION]"));
    }

    #[test]
    fn context_suppresses_every_category_except_jailbreak() {
        let config = SecurityLevelConfig::balanced();
        for category in [
            Category::Credential,
            Category::PersonalInfo,
            Category::Injection,
            Category::MaliciousCode,
        ] {
            let findings = vec![spanned(category, 0.99, (0, 4))];
            let result = decide("0123456789", question_context(), findings, &config, &[]);
            assert!(
                !result.blocked_categories.contains(&category),
                "{category} should be suppressed by question context"
            );
            assert!(!result.is_blocked);
            // Audit list keeps the suppressed finding
            assert_eq!(result.findings.len(), 1);
            assert!(result.warnings.iter().any(|w| w.contains("suppressed")));
            // Suppressed spans are not redacted
            assert_eq!(result.sanitized_text, "0123456789");
        }
    }

    #[test]
    fn jailbreak_is_never_suppressed_by_context() {
        let config = SecurityLevelConfig::balanced();
        let findings = vec![spanned(Category::Jailbreak, 0.95, (0, 4))];

        let result = decide("0123456789", question_context(), findings, &config, &[]);
        assert!(result.blocked_categories.contains(&Category::Jailbreak));
        assert!(result.is_blocked);
    }

    #[test]
    fn disclosure_overrides_question_context() {
        let config = SecurityLevelConfig::balanced();
        let signals = ContextSignals {
            is_question: true,
            is_disclosure: true,
            is_config_context: false,
        };
        let findings = vec![spanned(Category::Credential, 0.95, (0, 4))];

        let result = decide("0123456789", signals, findings, &config, &[]);
        assert!(result.blocked_categories.contains(&Category::Credential));
    }

    #[test]
    fn block_mode_off_reports_but_never_refuses() {
        let mut config = SecurityLevelConfig::balanced();
        config.block_mode = false;
        let findings = vec![spanned(Category::MaliciousCode, 0.99, (0, 4))];

        let result = decide("0123456789", no_context(), findings, &config, &[]);
        assert!(!result.is_blocked);
        // Category still reported and text still sanitized
        assert!(result.blocked_categories.contains(&Category::MaliciousCode));
        assert!(result.sanitized_text.contains("[REDACTED_COMMAND]"));
    }

    #[test]
    fn confidence_is_one_with_no_threat() {
        let config = SecurityLevelConfig::balanced();
        let result = decide("hello", no_context(), vec![], &config, &[]);
        assert_eq!(result.confidence_score, 1.0);

        let findings = vec![Finding::unlocated(
            Category::Normal,
            0.9,
            FindingSource::Classifier("binary".to_string()),
        )];
        let result = decide("hello", no_context(), findings, &config, &[]);
        assert_eq!(result.confidence_score, 1.0);
    }

    #[test]
    fn confidence_is_max_of_active_findings() {
        let config = SecurityLevelConfig::balanced();
        let findings = vec![
            spanned(Category::Injection, 0.7, (0, 2)),
            spanned(Category::Credential, 0.92, (4, 8)),
        ];
        let result = decide("0123456789", no_context(), findings, &config, &[]);
        assert_eq!(result.confidence_score, 0.92);
    }

    #[test]
    fn failed_classifiers_surface_as_warnings() {
        let config = SecurityLevelConfig::balanced();
        let result = decide(
            "hello",
            no_context(),
            vec![],
            &config,
            &["ner".to_string(), "zero-shot".to_string()],
        );
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("ner"));
    }

    #[test]
    fn unlocated_findings_block_without_sanitizing() {
        let config = SecurityLevelConfig::balanced();
        let findings = vec![Finding::unlocated(
            Category::Jailbreak,
            0.96,
            FindingSource::Classifier("binary".to_string()),
        )];

        let result = decide("some manipulation attempt", no_context(), findings, &config, &[]);
        assert!(result.is_blocked);
        assert_eq!(result.sanitized_text, "some manipulation attempt");
        assert!(result.sanitization_spans.is_empty());
    }
}
