//! Validation output types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::context::ContextSignals;
use crate::finding::{Category, Finding};

/// One accepted redaction region in the sanitized text
///
/// Within one `ValidationResult`, spans are sorted by start and pairwise
/// non-overlapping. When candidate spans overlapped, the accepted span
/// records the subsumed findings' ids in `origin_finding_ids` for audit
/// rather than discarding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationSpan {
    /// Byte offset of the region start in the original prompt
    pub start: usize,

    /// Byte offset one past the region end
    pub end: usize,

    /// Text substituted for the region
    pub replacement_text: String,

    /// Findings that produced or were subsumed into this span
    pub origin_finding_ids: Vec<Uuid>,
}

impl SanitizationSpan {
    /// Length of the original region in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the region is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether this span overlaps another
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Final verdict for one validation call
///
/// Created once per call, immutable after construction. `findings` is
/// the full, unfiltered evidence list for audit; suppressed findings
/// stay in it even when they did not contribute to blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Prompt with all accepted redactions applied
    pub sanitized_text: String,

    /// Every finding from every phase, unfiltered
    pub findings: Vec<Finding>,

    /// Context signals derived for this prompt, recorded for audit
    pub context_signals: ContextSignals,

    /// Redactions applied to produce `sanitized_text`
    pub sanitization_spans: Vec<SanitizationSpan>,

    /// Categories whose maximum confidence reached the blocking threshold
    pub blocked_categories: BTreeSet<Category>,

    /// Human-readable notes: non-blocking detections, context
    /// suppressions, degraded classifier coverage
    pub warnings: Vec<String>,

    /// Maximum confidence across non-suppressed threat findings;
    /// 1.0 when nothing survived suppression (no threat)
    pub confidence_score: f32,

    /// Whether the prompt is refused. Always false when the level's
    /// block mode is off, regardless of blocked categories.
    pub is_blocked: bool,
}

impl ValidationResult {
    /// Whether any threat evidence survived, blocking or not
    pub fn has_threat_findings(&self) -> bool {
        self.findings.iter().any(|f| f.category.is_threat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_overlap_detection() {
        let a = SanitizationSpan {
            start: 0,
            end: 10,
            replacement_text: "[X]".to_string(),
            origin_finding_ids: vec![],
        };
        let b = SanitizationSpan {
            start: 9,
            end: 12,
            replacement_text: "[Y]".to_string(),
            origin_finding_ids: vec![],
        };
        let c = SanitizationSpan {
            start: 10,
            end: 12,
            replacement_text: "[Z]".to_string(),
            origin_finding_ids: vec![],
        };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
