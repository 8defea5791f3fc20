//! Pattern & entropy detector
//!
//! Combines the structural rule bank and the entropy scanner into the
//! deterministic detection phase. Both sub-strategies run over the
//! literal, unmodified prompt; neither sees classifier output.

use promptgate_core::{Finding, Result, SecurityLevelConfig};

use crate::entropy::EntropyScanner;
use crate::patterns::StructuralRules;

/// Deterministic scanner producing candidate sensitive/malicious spans
pub struct PatternEntropyDetector {
    rules: StructuralRules,
    scanner: EntropyScanner,
}

impl PatternEntropyDetector {
    /// Compile all rules. Fails only on a malformed rule, at startup.
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: StructuralRules::new()?,
            scanner: EntropyScanner::new()?,
        })
    }

    /// Run both sub-strategies. Infallible at request time; the entropy
    /// floor comes from the per-call security level.
    pub fn detect(&self, prompt: &str, config: &SecurityLevelConfig) -> Vec<Finding> {
        let mut findings = self.rules.detect(prompt);
        findings.extend(self.scanner.scan(prompt, config.entropy_threshold));

        tracing::debug!(count = findings.len(), "pattern/entropy detection complete");
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptgate_core::{Category, FindingSource};

    #[test]
    fn structural_and_entropy_findings_accumulate() {
        let detector = PatternEntropyDetector::new().unwrap();
        let config = SecurityLevelConfig::balanced();

        // Keyed secret matches structurally; the value also clears the
        // entropy floor next to the "token" keyword.
        let text = "token: 9fK2mX7qLp4Zw8Rt1VbN6cJd3hYs";
        let findings = detector.detect(text, &config);

        assert!(findings
            .iter()
            .any(|f| f.source == FindingSource::Pattern && f.category == Category::Credential));
        assert!(findings
            .iter()
            .any(|f| f.source == FindingSource::Entropy && f.category == Category::Credential));
    }

    #[test]
    fn clean_prompt_yields_no_findings() {
        let detector = PatternEntropyDetector::new().unwrap();
        let config = SecurityLevelConfig::balanced();

        let findings = detector.detect("Summarize this article about honeybees.", &config);
        assert!(findings.is_empty());
    }

    #[test]
    fn entropy_floor_follows_security_level() {
        let detector = PatternEntropyDetector::new().unwrap();
        let text = "my password is Xk92mQ7plAz3vN8rTb5w";

        let strict = SecurityLevelConfig::strict();
        let findings = detector.detect(text, &strict);
        assert!(findings
            .iter()
            .any(|f| f.source == FindingSource::Entropy));

        let mut lax = SecurityLevelConfig::permissive();
        lax.entropy_threshold = 6.0;
        let findings = detector.detect(text, &lax);
        assert!(!findings.iter().any(|f| f.source == FindingSource::Entropy));
    }
}
