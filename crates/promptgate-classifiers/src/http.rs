//! HTTP-backed classifier adapter
//!
//! Wraps one external classifier service endpoint. The service receives
//! `{"text": ...}` and answers in any of the shapes `ClassifierResponse`
//! tolerates. An unreachable service, a non-success status, and an
//! unparseable body are all the same failure: the adapter reports
//! `ClassifierUnavailable` and contributes no findings.

use async_trait::async_trait;
use promptgate_core::{Error, Finding, Result};
use serde::Serialize;
use std::time::Duration;

use crate::classifier::{Classifier, DEFAULT_MIN_CONFIDENCE, DEFAULT_TIMEOUT};
use crate::response::ClassifierResponse;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Adapter for one remote classifier endpoint
pub struct HttpClassifier {
    name: String,
    endpoint: String,
    client: reqwest::Client,
    min_confidence: f32,
    timeout: Duration,
}

impl HttpClassifier {
    /// Create an adapter for the given endpoint
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the minimum-confidence floor for this adapter
    pub fn with_min_confidence(mut self, floor: f32) -> Self {
        self.min_confidence = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the invocation deadline for this adapter
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured confidence floor
    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Finding>> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(self.name.clone())
                } else {
                    Error::classifier_unavailable(&self.name, e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::classifier_unavailable(
                &self.name,
                format!("status {}", response.status()),
            ));
        }

        let parsed: ClassifierResponse = response.json().await.map_err(|e| {
            Error::classifier_unavailable(&self.name, format!("unparseable response: {e}"))
        })?;

        let findings = parsed.into_findings(&self.name, self.min_confidence);
        tracing::debug!(
            classifier = %self.name,
            count = findings.len(),
            "classifier response normalized"
        );
        Ok(findings)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
