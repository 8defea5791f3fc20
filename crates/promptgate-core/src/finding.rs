//! Detection evidence types shared by every pipeline phase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of detection categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Credential,
    PersonalInfo,
    Injection,
    MaliciousCode,
    Jailbreak,
    Normal,
}

impl Category {
    /// Human-readable label used in warnings and serialized results
    pub fn label(&self) -> &'static str {
        match self {
            Self::Credential => "credential",
            Self::PersonalInfo => "personal_info",
            Self::Injection => "injection",
            Self::MaliciousCode => "malicious_code",
            Self::Jailbreak => "jailbreak",
            Self::Normal => "normal",
        }
    }

    /// Whether findings of this category represent a threat at all
    pub fn is_threat(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Whether interrogative/configuration context may suppress blocking
    /// for this category.
    ///
    /// Jailbreak is the deliberate exception: an attempted manipulation
    /// phrased as a hypothetical question is still an attempted
    /// manipulation and must block regardless of interrogative form.
    pub fn context_suppressible(&self) -> bool {
        !matches!(self, Self::Jailbreak)
    }

    /// Default redaction placeholder when a finding carries no hint
    pub fn replacement_placeholder(&self) -> &'static str {
        match self {
            Self::Credential => "[REDACTED_CREDENTIAL]",
            Self::PersonalInfo => "[REDACTED_PII]",
            Self::Injection => "[REDACTED_INJECTION]",
            Self::MaliciousCode => "[REDACTED_COMMAND]",
            Self::Jailbreak => "[REDACTED_JAILBREAK]",
            Self::Normal => "[REDACTED]",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which phase produced a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    /// Structural/literal rule match
    Pattern,
    /// Randomness-score promotion
    Entropy,
    /// External classifier, by adapter name
    Classifier(String),
}

impl std::fmt::Display for FindingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern => f.write_str("pattern"),
            Self::Entropy => f.write_str("entropy"),
            Self::Classifier(name) => write!(f, "classifier:{name}"),
        }
    }
}

/// One unit of detection evidence from any phase
///
/// A finding without a span is a whole-prompt judgment from a classifier;
/// a finding with a span is a precise detector-level match. Offsets are
/// byte offsets into the original, unmodified prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique id, referenced by sanitization spans for audit provenance
    pub id: Uuid,

    /// Detection category
    pub category: Category,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,

    /// Phase that produced this finding
    pub source: FindingSource,

    /// Byte span in the original prompt, if the match is precise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,

    /// Replacement text to use when sanitizing this span
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement_hint: Option<String>,
}

impl Finding {
    /// Create a whole-prompt finding with no precise location
    pub fn unlocated(category: Category, confidence: f32, source: FindingSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            confidence: confidence.clamp(0.0, 1.0),
            source,
            span: None,
            replacement_hint: None,
        }
    }

    /// Create a finding with a precise byte span
    pub fn spanned(
        category: Category,
        confidence: f32,
        source: FindingSource,
        span: (usize, usize),
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            confidence: confidence.clamp(0.0, 1.0),
            source,
            span: Some(span),
            replacement_hint: None,
        }
    }

    /// Attach a replacement hint
    pub fn with_replacement(mut self, hint: impl Into<String>) -> Self {
        self.replacement_hint = Some(hint.into());
        self
    }

    /// Replacement text for sanitization: the hint if present, otherwise
    /// the category placeholder.
    pub fn replacement_text(&self) -> &str {
        self.replacement_hint
            .as_deref()
            .unwrap_or_else(|| self.category.replacement_placeholder())
    }
}
