//! Promptgate Classifiers
//!
//! Adapter layer over external text classifiers. Each adapter wraps one
//! service (binary label, entity recognition, or multi-label zero-shot)
//! behind the uniform [`Classifier`] contract, normalizes its output
//! into findings, and applies a per-classifier confidence floor at the
//! boundary.
//!
//! Failure isolation is the design rule: adapters return typed errors,
//! and the pipeline proceeds without a failing classifier's input.

pub mod classifier;
pub mod http;
pub mod response;

pub use classifier::{Classifier, DEFAULT_MIN_CONFIDENCE, DEFAULT_TIMEOUT};
pub use http::HttpClassifier;
pub use response::{map_label, ClassifierResponse, EntityHit};
