// File: src/factory.rs
// Purpose: Entry points - raw rules, form requests and prebuilt validators converge on js_validator

use crate::config::JsValidationConfig;
use crate::engine::{InputData, RuleEngine, ValidationEngine, ValidatorInstance};
use crate::error::{BridgeError, Result};
use crate::manager::{assemble, AssembleOptions, Manager};
use crate::messages::{Attributes, Messages};
use crate::registry::RuleRegistry;
use crate::remote::{Encrypter, RemoteProtocol, SessionStore};
use crate::rule::RuleMap;
use crate::translator::RuleTranslator;
use std::collections::HashMap;
use std::sync::Arc;

/// Declarative rule set for one form
///
/// Every method is optional; a form request with no `rules` validates
/// nothing.
pub trait FormRequest: Send + Sync {
    fn rules(&self) -> RuleMap {
        RuleMap::new()
    }

    fn messages(&self) -> Messages {
        Messages::new()
    }

    fn attributes(&self) -> Attributes {
        Attributes::new()
    }
}

/// Resolves the current user or route for a form request
pub type Resolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Request-scoped collaborators handed to form requests built by name
///
/// Each one is present only if the application configured it.
#[derive(Clone, Default)]
pub struct FormRequestContext {
    pub session: Option<Arc<dyn SessionStore>>,
    pub user_resolver: Option<Resolver>,
    pub route_resolver: Option<Resolver>,
}

impl std::fmt::Debug for FormRequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRequestContext")
            .field("session", &self.session.is_some())
            .field("user_resolver", &self.user_resolver.is_some())
            .field("route_resolver", &self.route_resolver.is_some())
            .finish()
    }
}

impl FormRequestContext {
    pub fn user(&self) -> Option<String> {
        self.user_resolver.as_ref().and_then(|resolve| resolve())
    }

    pub fn route(&self) -> Option<String> {
        self.route_resolver.as_ref().and_then(|resolve| resolve())
    }
}

type FormRequestConstructor = Arc<dyn Fn(&FormRequestContext) -> Box<dyn FormRequest> + Send + Sync>;

/// What the form request entry point was given
pub enum FormRequestSource {
    /// A ready form request
    Instance(Box<dyn FormRequest>),
    /// Identifier of a registered form request kind
    Named(String),
    /// Some other value; always rejected
    Unrecognized(String),
}

impl FormRequestSource {
    pub fn instance(request: impl FormRequest + 'static) -> Self {
        FormRequestSource::Instance(Box::new(request))
    }

    /// Interpret a loosely typed value: strings name a form request kind
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(name) => FormRequestSource::Named(name.clone()),
            other => FormRequestSource::Unrecognized(other.to_string()),
        }
    }
}

impl From<&str> for FormRequestSource {
    fn from(name: &str) -> Self {
        FormRequestSource::Named(name.to_string())
    }
}

impl From<String> for FormRequestSource {
    fn from(name: String) -> Self {
        FormRequestSource::Named(name)
    }
}

impl From<Box<dyn FormRequest>> for FormRequestSource {
    fn from(request: Box<dyn FormRequest>) -> Self {
        FormRequestSource::Instance(request)
    }
}

/// Builds client validation specifications
///
/// # Example
///
/// ```rust,ignore
/// let factory = JsValidatorFactory::new(JsValidationConfig::load_default()?)
///     .with_session(session)
///     .with_encrypter(encrypter);
///
/// let manager = factory.make(
///     RuleMap::new().with("email", "required|email|unique:users"),
///     Messages::new(),
///     Attributes::new(),
///     None,
/// );
/// let markup = manager.render()?;
/// ```
pub struct JsValidatorFactory {
    config: JsValidationConfig,
    registry: Arc<RuleRegistry>,
    engine: Arc<dyn ValidationEngine>,
    protocol: RemoteProtocol,
    context: FormRequestContext,
    form_requests: HashMap<String, FormRequestConstructor>,
}

impl JsValidatorFactory {
    /// Factory with the builtin registry and engine and no session
    pub fn new(config: JsValidationConfig) -> Self {
        Self {
            config,
            registry: Arc::new(RuleRegistry::new()),
            engine: Arc::new(RuleEngine),
            protocol: RemoteProtocol::new(),
            context: FormRequestContext::default(),
            form_requests: HashMap::new(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn ValidationEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.protocol = self.protocol.with_session(session.clone());
        self.context.session = Some(session);
        self
    }

    pub fn with_encrypter(mut self, encrypter: Arc<dyn Encrypter>) -> Self {
        self.protocol = self.protocol.with_encrypter(encrypter);
        self
    }

    pub fn with_user_resolver(mut self, resolver: Resolver) -> Self {
        self.context.user_resolver = Some(resolver);
        self
    }

    pub fn with_route_resolver(mut self, resolver: Resolver) -> Self {
        self.context.route_resolver = Some(resolver);
        self
    }

    /// Make a form request kind constructible by identifier
    pub fn register_form_request<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&FormRequestContext) -> Box<dyn FormRequest> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.form_requests.contains_key(&name) {
            return Err(BridgeError::DuplicateFormRequest { name });
        }

        self.form_requests.insert(name, Arc::new(constructor));
        Ok(())
    }

    pub fn config(&self) -> &JsValidationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Protocol to share with the remote endpoint
    pub fn remote_protocol(&self) -> &RemoteProtocol {
        &self.protocol
    }

    /// Specification from raw rules, messages and attributes
    pub fn make(
        &self,
        rules: RuleMap,
        messages: Messages,
        custom_attributes: Attributes,
        selector: Option<&str>,
    ) -> Manager {
        let validator = self.validator_instance(rules, messages, custom_attributes);
        self.js_validator(validator.as_ref(), selector)
    }

    /// Specification from a form request instance or identifier
    pub fn form_request(
        &self,
        source: impl Into<FormRequestSource>,
        selector: Option<&str>,
    ) -> Result<Manager> {
        let request = match source.into() {
            FormRequestSource::Instance(request) => request,
            FormRequestSource::Named(name) => self.create_form_request(&name)?,
            FormRequestSource::Unrecognized(value) => {
                return Err(BridgeError::invalid_argument(value));
            }
        };

        let validator =
            self.validator_instance(request.rules(), request.messages(), request.attributes());
        Ok(self.js_validator(validator.as_ref(), selector))
    }

    /// Specification from an already built validator
    pub fn validator(&self, validator: &dyn ValidatorInstance, selector: Option<&str>) -> Manager {
        self.js_validator(validator, selector)
    }

    /// Common path of every entry point
    ///
    /// The configured `form_selector` always takes precedence over
    /// `selector`.
    pub fn js_validator(&self, validator: &dyn ValidatorInstance, selector: Option<&str>) -> Manager {
        let options = AssembleOptions::from(&self.config);

        if let Some(requested) = selector {
            if requested != options.form_selector {
                tracing::debug!(
                    "Selector {} overridden by configured form_selector {}",
                    requested,
                    options.form_selector
                );
            }
        }

        let fields = RuleTranslator::new(&self.registry).translate(
            validator.rules(),
            validator.messages(),
            validator.custom_attributes(),
        );

        let token = self.protocol.session_token();
        let specification = assemble(fields, token, self.config.remote_enabled(), &options);

        Manager::new(specification)
    }

    /// Fresh, encrypted remote token for the current session
    pub fn session_token(&self) -> Option<String> {
        self.protocol.session_token()
    }

    fn validator_instance(
        &self,
        rules: RuleMap,
        messages: Messages,
        custom_attributes: Attributes,
    ) -> Box<dyn ValidatorInstance> {
        self.engine
            .make(InputData::new(), rules, messages, custom_attributes)
    }

    fn create_form_request(&self, name: &str) -> Result<Box<dyn FormRequest>> {
        let constructor = self
            .form_requests
            .get(name)
            .ok_or_else(|| BridgeError::invalid_argument(name))?;

        Ok(constructor(&self.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::{FixedSession, ReverseEncrypter};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct SignupRequest;

    impl FormRequest for SignupRequest {
        fn rules(&self) -> RuleMap {
            RuleMap::new()
                .with("username", "required|unique:users")
                .with("password", "required|min:8|confirmed")
        }

        fn attributes(&self) -> Attributes {
            [("username".to_string(), "user name".to_string())].into()
        }
    }

    struct EmptyRequest;

    impl FormRequest for EmptyRequest {}

    fn factory() -> JsValidatorFactory {
        JsValidatorFactory::new(JsValidationConfig::default())
            .with_session(Arc::new(FixedSession(Some("abc".to_string()))))
    }

    #[test]
    fn test_make_builds_specification() {
        let manager = factory().make(
            RuleMap::new().with("email", "required|email"),
            Messages::new(),
            Attributes::new(),
            None,
        );

        let spec = manager.specification();
        assert_eq!(spec.fields().len(), 1);
        assert_eq!(spec.remote_token(), Some("abc"));
        assert!(spec.remote_enabled());
    }

    #[test]
    fn test_form_request_instance() {
        let manager = factory()
            .form_request(FormRequestSource::instance(SignupRequest), None)
            .unwrap();

        let username = manager.specification().field("username").unwrap();
        assert_eq!(username.display_name, "user name");
        assert!(username.rule("unique").unwrap().is_remote);
    }

    #[test]
    fn test_form_request_without_rules() {
        let manager = factory()
            .form_request(FormRequestSource::instance(EmptyRequest), None)
            .unwrap();
        assert!(manager.specification().fields().is_empty());
    }

    #[test]
    fn test_named_form_request_gets_context() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_ctor = seen.clone();

        let mut factory = factory()
            .with_user_resolver(Arc::new(|| Some("user-7".to_string())));
        factory
            .register_form_request("signup", move |ctx: &FormRequestContext| {
                *seen_in_ctor.lock().unwrap() =
                    Some((ctx.session.is_some(), ctx.user(), ctx.route()));
                Box::new(SignupRequest) as Box<dyn FormRequest>
            })
            .unwrap();

        let manager = factory.form_request("signup", Some("#signup")).unwrap();

        assert_eq!(manager.specification().fields().len(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            Some((true, Some("user-7".to_string()), None))
        );
    }

    #[test]
    fn test_unknown_form_request_name() {
        let err = factory().form_request("App\\Http\\Missing", None).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgumentKind { ref value } if value == "App\\Http\\Missing"));
    }

    #[test]
    fn test_unrecognized_value_is_rejected() {
        let value = serde_json::json!({"rules": {"email": "required"}});
        let err = factory()
            .form_request(FormRequestSource::from_value(&value), None)
            .unwrap_err();

        match err {
            BridgeError::InvalidArgumentKind { value } => assert!(value.contains("\"rules\"")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_form_request_registration() {
        let mut factory = factory();
        factory
            .register_form_request("signup", |_: &FormRequestContext| {
                Box::new(EmptyRequest) as Box<dyn FormRequest>
            })
            .unwrap();
        let err = factory
            .register_form_request("signup", |_: &FormRequestContext| {
                Box::new(EmptyRequest) as Box<dyn FormRequest>
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateFormRequest { .. }));
    }

    #[test]
    fn test_configured_selector_wins() {
        let config = JsValidationConfig {
            form_selector: "#configured".to_string(),
            ..JsValidationConfig::default()
        };
        let manager = JsValidatorFactory::new(config).make(
            RuleMap::new().with("name", "required"),
            Messages::new(),
            Attributes::new(),
            Some("#per-call"),
        );
        assert_eq!(manager.specification().selector(), "#configured");
    }

    #[test]
    fn test_token_is_fresh_and_encrypted() {
        let factory = factory().with_encrypter(Arc::new(ReverseEncrypter));
        assert_eq!(factory.session_token().as_deref(), Some("enc:cba"));

        let manager = factory.validator(
            &crate::engine::RuleValidator::new(RuleMap::new().with("name", "unique:users")),
            None,
        );
        assert_eq!(manager.specification().remote_token(), Some("enc:cba"));
    }
}
