// File: src/config.rs
// Purpose: Configuration parsing from jsvalidation.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Process-wide defaults for the validation bridge
///
/// Passed explicitly into the factory; nothing in the crate reads it
/// from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsValidationConfig {
    /// Turn off remote (server round-trip) rules entirely
    #[serde(default = "default_false")]
    pub disable_remote_validation: bool,

    /// View template identifier used to render the specification
    #[serde(default = "default_view")]
    pub view: String,

    /// Selector of the form the client validator attaches to
    #[serde(default = "default_form_selector")]
    pub form_selector: String,

    /// Path the remote validation endpoint is mounted on
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
}

/// Layout of a config file: either the bare keys or a `[jsvalidation]` table
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Nested { jsvalidation: JsValidationConfig },
    Flat(JsValidationConfig),
}

// Default values
fn default_false() -> bool {
    false
}

fn default_view() -> String {
    "jsvalidation::bootstrap".to_string()
}

fn default_form_selector() -> String {
    "form".to_string()
}

fn default_remote_path() -> String {
    "/jsvalidation/remote".to_string()
}

impl Default for JsValidationConfig {
    fn default() -> Self {
        Self {
            disable_remote_validation: default_false(),
            view: default_view(),
            form_selector: default_form_selector(),
            remote_path: default_remote_path(),
        }
    }
}

impl JsValidationConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./jsvalidation.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("jsvalidation.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(content).context("Invalid jsvalidation TOML")?;

        Ok(match file {
            ConfigFile::Nested { jsvalidation } => jsvalidation,
            ConfigFile::Flat(config) => config,
        })
    }

    /// Whether remote rules may be sent to the client
    pub fn remote_enabled(&self) -> bool {
        !self.disable_remote_validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JsValidationConfig::default();
        assert!(!config.disable_remote_validation);
        assert!(config.remote_enabled());
        assert_eq!(config.view, "jsvalidation::bootstrap");
        assert_eq!(config.form_selector, "form");
        assert_eq!(config.remote_path, "/jsvalidation/remote");
    }

    #[test]
    fn test_empty_config() {
        let config = JsValidationConfig::from_toml_str("   \n").unwrap();
        assert_eq!(config, JsValidationConfig::default());
    }

    #[test]
    fn test_flat_config() {
        let toml = r##"
            disable_remote_validation = true
            form_selector = "#signup"
        "##;
        let config = JsValidationConfig::from_toml_str(toml).unwrap();
        assert!(config.disable_remote_validation);
        assert_eq!(config.form_selector, "#signup");
        assert_eq!(config.view, "jsvalidation::bootstrap");
    }

    #[test]
    fn test_nested_config_ignores_unknown_keys() {
        let toml = r#"
            [jsvalidation]
            view = "jsvalidation::plain"
            focus_on_error = true
        "#;
        let config = JsValidationConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.view, "jsvalidation::plain");
        assert!(!config.disable_remote_validation);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = JsValidationConfig::load("does/not/exist/jsvalidation.toml").unwrap();
        assert_eq!(config, JsValidationConfig::default());
    }
}
