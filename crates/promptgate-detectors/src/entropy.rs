//! Entropy scanner
//!
//! Promotes high-randomness substrings to credential findings. Entropy
//! alone produces unacceptable false positives on ordinary technical
//! vocabulary, so a candidate is promoted only when a credential-
//! indicating keyword occurs within a bounded window around it.

use aho_corasick::AhoCorasick;
use promptgate_core::{Category, Error, Finding, FindingSource, Result};

/// Default minimum candidate length in bytes
const MIN_TOKEN_LEN: usize = 16;

/// Default keyword co-occurrence window in bytes
const KEYWORD_WINDOW: usize = 48;

/// Scanner configuration and compiled keyword matcher
pub struct EntropyScanner {
    min_token_len: usize,
    keyword_window: usize,
    keywords: AhoCorasick,
}

/// Shannon entropy of the byte distribution, in bits per byte
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for b in s.bytes() {
        counts[b as usize] += 1;
    }

    let len = s.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

impl EntropyScanner {
    /// Build a scanner with default token length and window
    pub fn new() -> Result<Self> {
        Self::with_limits(MIN_TOKEN_LEN, KEYWORD_WINDOW)
    }

    /// Build a scanner with explicit limits
    pub fn with_limits(min_token_len: usize, keyword_window: usize) -> Result<Self> {
        let keywords = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build([
                "password", "passwd", "pwd", "key", "token", "secret", "credential", "auth",
                "bearer", "apikey", "api_key", "api-key",
            ])
            .map_err(|e| Error::malformed_rule(format!("entropy keywords: {e}")))?;

        Ok(Self {
            min_token_len,
            keyword_window,
            keywords,
        })
    }

    /// Scan the prompt, promoting candidates whose entropy exceeds
    /// `threshold` and which co-occur with a credential keyword.
    pub fn scan(&self, text: &str, threshold: f64) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (start, candidate) in self.candidates(text) {
            if !Self::is_mixed_alphanumeric(candidate) {
                continue;
            }

            let entropy = shannon_entropy(candidate);
            if entropy <= threshold {
                continue;
            }

            let end = start + candidate.len();
            if !self.near_keyword(text, start, end) {
                tracing::debug!(
                    start,
                    entropy = format!("{entropy:.2}"),
                    "high-entropy token without keyword context, skipping"
                );
                continue;
            }

            let confidence = (0.80 + (entropy - threshold) * 0.1).min(0.95) as f32;
            findings.push(
                Finding::spanned(
                    Category::Credential,
                    confidence,
                    FindingSource::Entropy,
                    (start, end),
                )
                .with_replacement("[REDACTED_CREDENTIAL]"),
            );
        }

        findings
    }

    /// Maximal runs of token characters at least `min_token_len` long
    fn candidates<'t>(&self, text: &'t str) -> Vec<(usize, &'t str)> {
        let mut out = Vec::new();
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if Self::is_token_byte(bytes[i]) {
                let start = i;
                while i < bytes.len() && Self::is_token_byte(bytes[i]) {
                    i += 1;
                }
                if i - start >= self.min_token_len {
                    out.push((start, &text[start..i]));
                }
            } else {
                i += 1;
            }
        }

        out
    }

    fn is_token_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'_' | b'-')
    }

    /// Candidates must mix letters and digits; pure words and pure
    /// numbers are never secrets worth promoting.
    fn is_mixed_alphanumeric(s: &str) -> bool {
        s.chars().any(|c| c.is_ascii_alphabetic()) && s.chars().any(|c| c.is_ascii_digit())
    }

    /// Whether a credential keyword occurs within the window before the
    /// candidate or the window after it.
    fn near_keyword(&self, text: &str, start: usize, end: usize) -> bool {
        let window_start = start.saturating_sub(self.keyword_window);
        let window_end = (end + self.keyword_window).min(text.len());

        // Clamp to char boundaries so slicing can't panic on multibyte
        // input around the window edges.
        let window_start = floor_char_boundary(text, window_start);
        let window_end = floor_char_boundary(text, window_end);

        self.keywords.is_match(&text[window_start..window_end])
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANDOM_TOKEN: &str = "9fK2mX7qLp4Zw8Rt1VbN6cJd3hYs";

    fn scanner() -> EntropyScanner {
        EntropyScanner::new().unwrap()
    }

    #[test]
    fn entropy_of_uniform_string_is_zero() {
        assert_eq!(shannon_entropy("aaaaaaaa"), 0.0);
    }

    #[test]
    fn entropy_grows_with_variety() {
        assert!(shannon_entropy(RANDOM_TOKEN) > shannon_entropy("passwordpassword"));
    }

    #[test]
    fn random_token_near_keyword_is_promoted() {
        let text = format!("my secret is {RANDOM_TOKEN} please keep it safe");
        let findings = scanner().scan(&text, 4.0);

        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.category, Category::Credential);
        assert_eq!(f.source, FindingSource::Entropy);
        let (start, end) = f.span.unwrap();
        assert_eq!(&text[start..end], RANDOM_TOKEN);
    }

    #[test]
    fn random_token_without_keyword_is_ignored() {
        let text = format!("checksum mismatch near {RANDOM_TOKEN} in the build log");
        let findings = scanner().scan(&text, 4.0);
        assert!(findings.is_empty());
    }

    #[test]
    fn ordinary_vocabulary_is_not_promoted() {
        // Long but low-entropy, and not mixed alphanumeric
        let findings = scanner().scan("the authentication token internationalization", 4.0);
        assert!(findings.is_empty());
    }

    #[test]
    fn short_tokens_are_ignored() {
        let findings = scanner().scan("key: a1B2c3D4", 3.0);
        assert!(findings.is_empty());
    }

    #[test]
    fn threshold_gates_promotion() {
        let text = format!("token = {RANDOM_TOKEN}");
        assert!(!scanner().scan(&text, 4.0).is_empty());
        assert!(scanner().scan(&text, 6.0).is_empty());
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        let text = format!("clé secrète — {RANDOM_TOKEN} — ne pas partager");
        let _ = scanner().scan(&text, 4.0);
    }
}
