// File: src/specification.rs
// Purpose: Client-facing data model (RuleSpec, FieldValidation, ValidatorSpecification)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One server rule as the client sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub rule_name: String,
    /// Positional, in the order the server rule declares them
    pub parameters: Vec<String>,
    /// Evaluated by a callback to the remote endpoint instead of locally
    pub is_remote: bool,
}

impl RuleSpec {
    pub fn new(rule_name: impl Into<String>, parameters: Vec<String>, is_remote: bool) -> Self {
        Self {
            rule_name: rule_name.into(),
            parameters,
            is_remote,
        }
    }
}

/// All client rules for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub field_name: String,
    pub rules: Vec<RuleSpec>,
    /// Rule name → unexpanded message template
    pub messages: BTreeMap<String, String>,
    /// Replaces `:attribute` when the client renders a message
    pub display_name: String,
}

impl FieldValidation {
    pub fn rule(&self, rule_name: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|r| r.rule_name == rule_name)
    }

    pub fn has_remote_rules(&self) -> bool {
        self.rules.iter().any(|r| r.is_remote)
    }
}

/// Everything the client needs to validate a form
///
/// Owns its data by value and offers no mutation; build a new one from
/// the source rules to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSpecification {
    fields: Vec<FieldValidation>,
    remote_token: Option<String>,
    remote_enabled: bool,
    selector: String,
    view_template: String,
}

impl ValidatorSpecification {
    pub(crate) fn new(
        fields: Vec<FieldValidation>,
        remote_token: Option<String>,
        remote_enabled: bool,
        selector: String,
        view_template: String,
    ) -> Self {
        Self {
            fields,
            remote_token,
            remote_enabled,
            selector,
            view_template,
        }
    }

    pub fn fields(&self) -> &[FieldValidation] {
        &self.fields
    }

    pub fn field(&self, field_name: &str) -> Option<&FieldValidation> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn remote_token(&self) -> Option<&str> {
        self.remote_token.as_deref()
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn view_template(&self) -> &str {
        &self.view_template
    }

    /// Serialize to the JSON document the client library consumes
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
