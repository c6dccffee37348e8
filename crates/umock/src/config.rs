//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Knobs for one generation run. Loading this from a config file is the
/// caller's concern; the derives make that a one-liner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Keys recognized in `<key>:AutoMockable` marker comments.
    pub marker_keys: Vec<String>,
    /// Prefix introducing `key=value` directives in leading comments.
    pub directive_prefix: String,
    /// Suffix appended to the mocked name to form the mock type name.
    pub mock_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker_keys: vec!["sourcery".to_string(), "mock".to_string()],
            directive_prefix: "mock".to_string(),
            mock_suffix: "Mock".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"mock_suffix": "Stub"}"#).unwrap();
        assert_eq!(config.mock_suffix, "Stub");
        assert_eq!(
            config.marker_keys,
            vec!["sourcery".to_string(), "mock".to_string()]
        );
        assert_eq!(config.directive_prefix, "mock");
    }
}
