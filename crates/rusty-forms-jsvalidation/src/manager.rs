// File: src/manager.rs
// Purpose: Assemble the final ValidatorSpecification and hand it to a view

use crate::config::JsValidationConfig;
use crate::error::Result;
use crate::remote;
use crate::specification::{FieldValidation, ValidatorSpecification};
use crate::view::ViewRegistry;
use maud::Markup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation and remote options recognized by [`assemble`]
///
/// Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleOptions {
    pub disable_remote_validation: bool,
    pub view: String,
    pub form_selector: String,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::from(&JsValidationConfig::default())
    }
}

impl From<&JsValidationConfig> for AssembleOptions {
    fn from(config: &JsValidationConfig) -> Self {
        Self {
            disable_remote_validation: config.disable_remote_validation,
            view: config.view.clone(),
            form_selector: config.form_selector.clone(),
        }
    }
}

impl AssembleOptions {
    /// Read options from a loosely typed map such as a per-page JSON blob
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Combine translated fields, the remote token and options
///
/// Remote validation ends up enabled only if the caller enables it, the
/// options don't disable it, and a non-empty token exists. When it is not
/// enabled the token is not embedded and remote rules are removed.
pub fn assemble(
    fields: Vec<FieldValidation>,
    remote_token: Option<String>,
    remote_enabled: bool,
    options: &AssembleOptions,
) -> ValidatorSpecification {
    let remote_token = remote_token.filter(|t| !t.is_empty());
    let remote_enabled =
        remote_enabled && !options.disable_remote_validation && remote_token.is_some();

    let fields = remote::attach(fields, remote_token.as_deref(), remote_enabled);
    let remote_token = if remote_enabled { remote_token } else { None };

    ValidatorSpecification::new(
        fields,
        remote_token,
        remote_enabled,
        options.form_selector.clone(),
        options.view.clone(),
    )
}

/// Handle returned by every factory entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manager {
    specification: ValidatorSpecification,
}

impl Manager {
    pub fn new(specification: ValidatorSpecification) -> Self {
        Self { specification }
    }

    pub fn specification(&self) -> &ValidatorSpecification {
        &self.specification
    }

    pub fn into_specification(self) -> ValidatorSpecification {
        self.specification
    }

    pub fn to_json(&self) -> Result<String> {
        self.specification.to_json()
    }

    /// Render with the builtin views
    pub fn render(&self) -> Result<Markup> {
        self.render_with(&ViewRegistry::default())
    }

    /// Render with application views, picked by the specification's view template
    pub fn render_with(&self, views: &ViewRegistry) -> Result<Markup> {
        views.render(&self.specification)
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&markup.into_string())
    }
}
