//! Sanitizer / overlap resolver
//!
//! Given candidate spans from all phases, produces one non-overlapping,
//! order-preserving redaction of the original text. The accumulate-
//! then-rewrite design is deliberate: all candidates are resolved over
//! the union of accepted spans, then the text is rewritten exactly once
//! right-to-left so earlier offsets stay valid without an offset table.

use promptgate_core::{Finding, SanitizationSpan};

/// One candidate redaction region derived from a finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
    pub finding_id: uuid::Uuid,
}

impl CandidateSpan {
    /// Derive a candidate from a spanned finding. Findings without a
    /// span (whole-prompt judgments) produce no candidate.
    pub fn from_finding(finding: &Finding) -> Option<Self> {
        finding.span.map(|(start, end)| Self {
            start,
            end,
            replacement: finding.replacement_text().to_string(),
            finding_id: finding.id,
        })
    }

    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Offsets from external entity classifiers can be off; reject
    /// anything that does not address a valid region of the prompt.
    fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Resolve overlapping candidates and rewrite the text once.
///
/// Candidates are sorted by `(start asc, length desc)` and walked left
/// to right: a candidate overlapping the most recently accepted span is
/// discarded, but its originating finding id is recorded on the
/// accepted span's audit list. The longer span wins ties at the same
/// start because of the sort order.
pub fn resolve(prompt: &str, candidates: Vec<CandidateSpan>) -> (String, Vec<SanitizationSpan>) {
    let mut candidates: Vec<CandidateSpan> = candidates
        .into_iter()
        .filter(|c| {
            let valid = c.is_valid_for(prompt);
            if !valid {
                tracing::warn!(start = c.start, end = c.end, "dropping out-of-range span");
            }
            valid
        })
        .collect();

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

    let mut accepted: Vec<SanitizationSpan> = Vec::new();
    for candidate in candidates {
        match accepted.last_mut() {
            Some(last) if candidate.start < last.end => {
                // Subsumed by the previously accepted span; keep the
                // provenance, drop the region.
                if !last.origin_finding_ids.contains(&candidate.finding_id) {
                    last.origin_finding_ids.push(candidate.finding_id);
                }
            }
            _ => accepted.push(SanitizationSpan {
                start: candidate.start,
                end: candidate.end,
                replacement_text: candidate.replacement,
                origin_finding_ids: vec![candidate.finding_id],
            }),
        }
    }

    let mut sanitized = prompt.to_string();
    for span in accepted.iter().rev() {
        sanitized.replace_range(span.start..span.end, &span.replacement_text);
    }

    (sanitized, accepted)
}
