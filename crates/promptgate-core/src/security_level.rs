//! Named, immutable threshold bundles
//!
//! A security level is selected by name and passed explicitly into each
//! validation call. The registry is populated once at startup and
//! read-only afterwards; switching levels at runtime means passing a
//! different config reference into subsequent calls, never mutating a
//! shared one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Immutable threshold bundle for one security level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityLevelConfig {
    /// Level name (lookup key)
    pub name: String,

    /// Minimum confidence for a category to surface as a warning
    pub detection_threshold: f32,

    /// Minimum confidence for a category to block
    pub blocking_threshold: f32,

    /// Shannon-entropy floor for credential promotion (bits per char)
    pub entropy_threshold: f64,

    /// Whether blocked prompts are actually refused (true) or only
    /// sanitized and reported (false, observe-only)
    pub block_mode: bool,
}

impl SecurityLevelConfig {
    /// Validate threshold ranges and ordering
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_config("security level name is empty"));
        }
        for (label, value) in [
            ("detection_threshold", self.detection_threshold),
            ("blocking_threshold", self.blocking_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "{} {} out of range [0, 1] for level '{}'",
                    label, value, self.name
                )));
            }
        }
        if self.detection_threshold > self.blocking_threshold {
            return Err(Error::invalid_config(format!(
                "detection_threshold {} exceeds blocking_threshold {} for level '{}'",
                self.detection_threshold, self.blocking_threshold, self.name
            )));
        }
        if self.entropy_threshold <= 0.0 {
            return Err(Error::invalid_config(format!(
                "entropy_threshold must be positive for level '{}'",
                self.name
            )));
        }
        Ok(())
    }

    /// Lenient default: block only near-certain threats
    pub fn permissive() -> Self {
        Self {
            name: "permissive".to_string(),
            detection_threshold: 0.80,
            blocking_threshold: 0.95,
            entropy_threshold: 4.5,
            block_mode: true,
        }
    }

    /// Recommended default for production
    pub fn balanced() -> Self {
        Self {
            name: "balanced".to_string(),
            detection_threshold: 0.60,
            blocking_threshold: 0.85,
            entropy_threshold: 4.0,
            block_mode: true,
        }
    }

    /// Aggressive blocking for high-sensitivity deployments
    pub fn strict() -> Self {
        Self {
            name: "strict".to_string(),
            detection_threshold: 0.40,
            blocking_threshold: 0.70,
            entropy_threshold: 3.5,
            block_mode: true,
        }
    }
}

/// Process-wide table of named security levels
///
/// Adding a level requires only adding a config entry, never code
/// changes to the pipeline.
#[derive(Debug, Clone)]
pub struct SecurityLevelRegistry {
    levels: HashMap<String, SecurityLevelConfig>,
}

impl SecurityLevelRegistry {
    /// Registry with the three built-in levels
    pub fn builtin() -> Self {
        let mut levels = HashMap::new();
        for config in [
            SecurityLevelConfig::permissive(),
            SecurityLevelConfig::balanced(),
            SecurityLevelConfig::strict(),
        ] {
            levels.insert(config.name.clone(), config);
        }
        Self { levels }
    }

    /// Parse additional levels from a YAML document and merge them over
    /// the built-ins. Same-named entries replace built-ins.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let custom: Vec<SecurityLevelConfig> = serde_yaml::from_str(yaml)
            .map_err(|e| Error::invalid_config(format!("failed to parse level file: {e}")))?;

        let mut registry = Self::builtin();
        for config in custom {
            config.validate()?;
            registry.levels.insert(config.name.clone(), config);
        }
        Ok(registry)
    }

    /// Load levels from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Look up a level by name
    pub fn get(&self, name: &str) -> Result<&SecurityLevelConfig> {
        self.levels
            .get(name)
            .ok_or_else(|| Error::invalid_config(format!("unknown security level '{name}'")))
    }

    /// Names of all registered levels
    pub fn names(&self) -> Vec<&str> {
        self.levels.keys().map(String::as_str).collect()
    }
}

impl Default for SecurityLevelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_levels_are_valid() {
        for name in ["permissive", "balanced", "strict"] {
            let registry = SecurityLevelRegistry::builtin();
            let config = registry.get(name).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn unknown_level_is_invalid_config() {
        let registry = SecurityLevelRegistry::builtin();
        let err = registry.get("paranoid").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let config = SecurityLevelConfig {
            name: "broken".to_string(),
            detection_threshold: 0.9,
            blocking_threshold: 0.5,
            entropy_threshold: 4.0,
            block_mode: true,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_levels_merge_over_builtins() {
        let yaml = r#"
- name: observe
  detection_threshold: 0.5
  blocking_threshold: 0.9
  entropy_threshold: 4.0
  block_mode: false
"#;
        let registry = SecurityLevelRegistry::from_yaml(yaml).unwrap();
        assert!(registry.get("observe").is_ok());
        assert!(registry.get("balanced").is_ok());
        assert!(!registry.get("observe").unwrap().block_mode);
    }

    #[test]
    fn level_file_round_trip() {
        let yaml = r#"
- name: audit-only
  detection_threshold: 0.3
  blocking_threshold: 0.99
  entropy_threshold: 3.8
  block_mode: false
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let registry = SecurityLevelRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.get("audit-only").unwrap().entropy_threshold, 3.8);
    }

    #[test]
    fn invalid_yaml_entry_rejected_at_load() {
        let yaml = r#"
- name: ""
  detection_threshold: 0.5
  blocking_threshold: 0.9
  entropy_threshold: 4.0
  block_mode: true
"#;
        assert!(SecurityLevelRegistry::from_yaml(yaml).is_err());
    }
}
