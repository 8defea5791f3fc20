//! Wire shapes at the classifier service boundary
//!
//! External services answer in one of three shapes: a binary label with
//! a score, a per-token entity list, or multi-label zero-shot scores.
//! All of them normalize into the common finding shape here, before
//! anything reaches the merger.

use promptgate_core::{Category, Finding, FindingSource};
use serde::Deserialize;

/// Tolerant union of the response shapes classifiers produce
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassifierResponse {
    /// Per-token entity recognition output
    Entities { entities: Vec<EntityHit> },

    /// Multi-label zero-shot output: parallel label/score arrays
    MultiLabel { labels: Vec<String>, scores: Vec<f32> },

    /// Binary or single-label classification output
    Label { label: String, score: f32 },
}

/// One recognized entity with its span in the submitted text
#[derive(Debug, Clone, Deserialize)]
pub struct EntityHit {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Map a service label onto the closed category set. Unknown labels map
/// to nothing rather than guessing.
pub fn map_label(label: &str) -> Option<Category> {
    let normalized = label.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "credential" | "credentials" | "secret" | "api_key" | "apikey" | "key" | "token"
        | "password" => Some(Category::Credential),
        "personal_info" | "pii" | "person" | "email" | "phone" | "ssn" | "address"
        | "credit_card" => Some(Category::PersonalInfo),
        "injection" | "prompt_injection" | "sql_injection" | "attack" => Some(Category::Injection),
        "malicious_code" | "malicious" | "malware" | "dangerous_code" | "command" => {
            Some(Category::MaliciousCode)
        }
        "jailbreak" | "jailbroken" | "manipulation" => Some(Category::Jailbreak),
        "normal" | "benign" | "safe" | "clean" | "legitimate" | "no_threat" => {
            Some(Category::Normal)
        }
        _ => None,
    }
}

impl ClassifierResponse {
    /// Normalize into findings, applying the adapter's confidence floor.
    /// Everything below the floor is rejected here, at the boundary,
    /// not downstream.
    pub fn into_findings(self, classifier_name: &str, min_confidence: f32) -> Vec<Finding> {
        let source = || FindingSource::Classifier(classifier_name.to_string());

        match self {
            Self::Label { label, score } => map_label(&label)
                .filter(|_| score >= min_confidence)
                .map(|category| vec![Finding::unlocated(category, score, source())])
                .unwrap_or_default(),

            Self::MultiLabel { labels, scores } => {
                if labels.len() != scores.len() {
                    // Unpaired tail carries no usable signal; keep the
                    // pairs that line up.
                    tracing::warn!(
                        classifier = classifier_name,
                        labels = labels.len(),
                        scores = scores.len(),
                        "label/score arrays differ in length, extra entries ignored"
                    );
                }
                labels
                    .iter()
                    .zip(scores)
                    .filter(|(_, score)| *score >= min_confidence)
                    .filter_map(|(label, score)| {
                        map_label(label)
                            .map(|category| Finding::unlocated(category, score, source()))
                    })
                    .collect()
            }

            Self::Entities { entities } => entities
                .into_iter()
                .filter(|e| e.score >= min_confidence)
                .filter_map(|e| {
                    map_label(&e.entity_type).map(|category| {
                        Finding::spanned(category, e.score, source(), (e.start, e.end))
                    })
                })
                .collect(),
        }
    }
}
