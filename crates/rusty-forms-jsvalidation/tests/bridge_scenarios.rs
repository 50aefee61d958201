//! End-to-end scenarios for the validation bridge
//!
//! Each test goes through the public factory API the way an application
//! would: rules in, serialized specification out.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rusty_forms_jsvalidation::{
    Attributes, BridgeError, Encrypter, FormRequestSource, JsValidationConfig, JsValidatorFactory,
    Messages, RuleMap, RuleRegistry, SessionStore, TranslationStrategy,
};
use serde_json::{json, Value};
use std::sync::Arc;

struct Session(&'static str);

impl SessionStore for Session {
    fn token(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

struct IdentityEncrypter;

impl Encrypter for IdentityEncrypter {
    fn encrypt(&self, value: &str) -> anyhow::Result<String> {
        Ok(value.to_string())
    }

    fn decrypt(&self, payload: &str) -> anyhow::Result<String> {
        Ok(payload.to_string())
    }
}

fn config(disable_remote: bool) -> JsValidationConfig {
    JsValidationConfig {
        disable_remote_validation: disable_remote,
        ..JsValidationConfig::default()
    }
}

fn to_value(factory: &JsValidatorFactory, rules: RuleMap) -> Value {
    let json = factory
        .make(rules, Messages::new(), Attributes::new(), None)
        .to_json()
        .unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn email_rules_with_remote_disabled() {
    let factory = JsValidatorFactory::new(config(true));
    let spec = to_value(&factory, RuleMap::new().with("email", ["required", "email"]));

    assert_eq!(
        spec,
        json!({
            "fields": [{
                "fieldName": "email",
                "rules": [
                    {"ruleName": "required", "parameters": [], "isRemote": false},
                    {"ruleName": "email", "parameters": [], "isRemote": false}
                ],
                "messages": {
                    "email": "The :attribute must be a valid email address.",
                    "required": "The :attribute field is required."
                },
                "displayName": "email"
            }],
            "remoteToken": null,
            "remoteEnabled": false,
            "selector": "form",
            "viewTemplate": "jsvalidation::bootstrap"
        })
    );
}

#[test]
fn unique_rule_goes_remote_with_session_token() {
    let factory = JsValidatorFactory::new(config(false))
        .with_session(Arc::new(Session("abc")))
        .with_encrypter(Arc::new(IdentityEncrypter));

    let manager = factory.make(
        RuleMap::new().with("username", ["required", "unique:users"]),
        Messages::new(),
        Attributes::new(),
        None,
    );
    let spec = manager.specification();

    let username = spec.field("username").unwrap();
    let unique = username.rule("unique").unwrap();
    assert!(unique.is_remote);
    assert_eq!(unique.parameters, vec!["users"]);
    assert!(!username.rule("required").unwrap().is_remote);
    assert_eq!(spec.remote_token(), Some("abc"));
    assert!(spec.remote_enabled());
}

#[test]
fn non_form_request_value_is_rejected() {
    let factory = JsValidatorFactory::new(config(false));
    let value = json!({"email": "required|email"});

    let err = factory
        .form_request(FormRequestSource::from_value(&value), None)
        .unwrap_err();

    match err {
        BridgeError::InvalidArgumentKind { value: offending } => {
            assert_eq!(offending, value.to_string());
        }
        other => panic!("expected InvalidArgumentKind, got {other}"),
    }
}

#[test]
fn no_session_means_no_remote_rules() {
    let factory = JsValidatorFactory::new(config(false));
    let manager = factory.make(
        RuleMap::new()
            .with("username", "required|unique:users|some_custom_rule")
            .with("code", "exists:codes"),
        Messages::new(),
        Attributes::new(),
        None,
    );
    let spec = manager.specification();

    assert_eq!(spec.remote_token(), None);
    assert!(!spec.remote_enabled());
    assert_eq!(spec.fields().len(), 2);
    assert!(spec.fields().iter().all(|f| !f.has_remote_rules()));
    assert!(spec.field("code").unwrap().rules.is_empty());
}

#[rstest]
#[case(RuleMap::new().with("a", "unique:t"))]
#[case(RuleMap::new().with("a", "unique:t").with("b", "exists:t,id|custom"))]
#[case(RuleMap::new().with("a", "required"))]
fn disable_option_turns_remote_off(#[case] rules: RuleMap) {
    let factory = JsValidatorFactory::new(config(true)).with_session(Arc::new(Session("abc")));
    let spec = factory
        .make(rules, Messages::new(), Attributes::new(), None)
        .into_specification();

    assert!(!spec.remote_enabled());
    assert!(spec.fields().iter().all(|f| !f.has_remote_rules()));
}

#[test]
fn assembly_is_byte_identical_for_same_inputs() {
    let build = || {
        JsValidatorFactory::new(config(false))
            .with_session(Arc::new(Session("frozen")))
            .make(
                RuleMap::new()
                    .with("username", "required|alpha_dash|unique:users")
                    .with("age", "integer|between:18,120")
                    .with("email", "required|email"),
                [("age.between".to_string(), "Adults only.".to_string())].into(),
                [("email".to_string(), "e-mail address".to_string())].into(),
                Some("#signup"),
            )
            .to_json()
            .unwrap()
    };

    assert_eq!(build(), build());
}

#[test]
fn fields_and_rule_order_follow_declaration() {
    let factory = JsValidatorFactory::new(config(false)).with_session(Arc::new(Session("t")));
    let rules = RuleMap::new()
        .with("zip", "required|digits:5")
        .with("country", "required|in:US,CA")
        .with("address_line", "max:120|required|string");

    let spec = factory
        .make(rules.clone(), Messages::new(), Attributes::new(), None)
        .into_specification();

    let fields: Vec<_> = spec.fields().iter().map(|f| f.field_name.as_str()).collect();
    assert_eq!(fields, rules.fields().collect::<Vec<_>>());

    let address: Vec<_> = spec
        .field("address_line")
        .unwrap()
        .rules
        .iter()
        .map(|r| r.rule_name.as_str())
        .collect();
    assert_eq!(address, vec!["max", "required", "string"]);
    assert_eq!(spec.field("address_line").unwrap().display_name, "address line");
}

#[test]
fn custom_client_rule_is_not_remote() {
    let mut registry = RuleRegistry::new();
    registry
        .register("postcode", TranslationStrategy::Client)
        .unwrap();

    let factory = JsValidatorFactory::new(config(false))
        .with_registry(Arc::new(registry))
        .with_session(Arc::new(Session("t")));

    let spec = factory
        .make(
            RuleMap::new().with("zip", "postcode:GB|other_rule"),
            Messages::new(),
            Attributes::new(),
            None,
        )
        .into_specification();

    let zip = spec.field("zip").unwrap();
    assert!(!zip.rule("postcode").unwrap().is_remote);
    assert_eq!(zip.rule("postcode").unwrap().parameters, vec!["GB"]);
    assert!(zip.rule("other_rule").unwrap().is_remote);
}
