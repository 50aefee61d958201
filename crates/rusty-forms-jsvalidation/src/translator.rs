// File: src/translator.rs
// Purpose: Translate field → rule declarations into client FieldValidation lists

use crate::messages::{display_name, resolve_message, Attributes, Messages, SizeKind};
use crate::registry::RuleRegistry;
use crate::rule::{ParsedRule, RuleMap};
use crate::specification::{FieldValidation, RuleSpec};
use std::collections::BTreeMap;

/// Walks a rule map and produces one [`FieldValidation`] per field
///
/// Pure over its inputs and the registry. Never fails: rules with no
/// registered strategy come out as remote rules.
pub struct RuleTranslator<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> RuleTranslator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Translate every field, keeping field and rule declaration order
    pub fn translate(
        &self,
        rules: &RuleMap,
        messages: &Messages,
        attributes: &Attributes,
    ) -> Vec<FieldValidation> {
        rules
            .iter()
            .map(|(field, declarations)| {
                self.translate_field(field, declarations, messages, attributes)
            })
            .collect()
    }

    fn translate_field(
        &self,
        field: &str,
        declarations: &[String],
        messages: &Messages,
        attributes: &Attributes,
    ) -> FieldValidation {
        let parsed: Vec<ParsedRule> = declarations
            .iter()
            .filter_map(|d| ParsedRule::parse(d))
            .collect();

        let kind = SizeKind::for_rules(parsed.iter().map(|r| r.name.as_str()));

        let mut specs = Vec::with_capacity(parsed.len());
        let mut field_messages = BTreeMap::new();

        for rule in parsed {
            let strategy = self.registry.resolve(&rule.name);
            if strategy.is_remote() && !self.registry.is_registered(&rule.name) {
                tracing::debug!(
                    "Rule {} on {} has no client translation, deferring to server",
                    rule.name,
                    field
                );
            }

            field_messages.insert(
                rule.name.clone(),
                resolve_message(field, &rule.name, kind, messages),
            );

            let parameters = strategy.parameters(field, rule.parameters);
            specs.push(RuleSpec::new(rule.name, parameters, strategy.is_remote()));
        }

        FieldValidation {
            field_name: field.to_string(),
            rules: specs,
            messages: field_messages,
            display_name: display_name(field, attributes),
        }
    }
}
