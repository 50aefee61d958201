// File: src/engine.rs
// Purpose: Validation engine collaborator - validator instances and the factory that makes them

use crate::messages::{Attributes, Messages};
use crate::rule::RuleMap;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Input bound to a validator; empty when only the rule structure matters
pub type InputData = BTreeMap<String, JsonValue>;

/// A built validator whose original definitions can be read back
pub trait ValidatorInstance: Send + Sync {
    fn rules(&self) -> &RuleMap;
    fn messages(&self) -> &Messages;
    fn custom_attributes(&self) -> &Attributes;
}

/// Creates validator instances
pub trait ValidationEngine: Send + Sync {
    fn make(
        &self,
        data: InputData,
        rules: RuleMap,
        messages: Messages,
        attributes: Attributes,
    ) -> Box<dyn ValidatorInstance>;
}

/// Plain validator holding its definitions by value
#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    data: InputData,
    rules: RuleMap,
    messages: Messages,
    attributes: Attributes,
}

impl RuleValidator {
    pub fn new(rules: RuleMap) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_data(mut self, data: InputData) -> Self {
        self.data = data;
        self
    }

    pub fn data(&self) -> &InputData {
        &self.data
    }
}

impl ValidatorInstance for RuleValidator {
    fn rules(&self) -> &RuleMap {
        &self.rules
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn custom_attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Default engine producing [`RuleValidator`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl ValidationEngine for RuleEngine {
    fn make(
        &self,
        data: InputData,
        rules: RuleMap,
        messages: Messages,
        attributes: Attributes,
    ) -> Box<dyn ValidatorInstance> {
        Box::new(
            RuleValidator::new(rules)
                .with_messages(messages)
                .with_attributes(attributes)
                .with_data(data),
        )
    }
}
