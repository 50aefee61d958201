// File: rusty-forms-jsvalidation/src/lib.rs
// Purpose: Main entry point for the client-side validation bridge

//! # rusty-forms-jsvalidation
//!
//! Translate server-side validation rules into a specification the browser
//! can enforce before submission. Rules that need server state (`unique`,
//! `exists`, anything unknown) are deferred to an authenticated remote
//! endpoint instead of being skipped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rusty_forms_jsvalidation::{JsValidationConfig, JsValidatorFactory, RuleMap};
//!
//! // 1. Build a factory once at startup
//! let factory = JsValidatorFactory::new(JsValidationConfig::load_default()?)
//!     .with_session(session)
//!     .with_encrypter(encrypter);
//!
//! // 2. Translate rules per request
//! let manager = factory.make(
//!     RuleMap::new()
//!         .with("username", "required|unique:users")
//!         .with("email", "required|email"),
//!     Default::default(),
//!     Default::default(),
//!     None,
//! );
//!
//! // 3. Embed it in a page
//! let markup = manager.render()?;
//!
//! // 4. Serve remote checks
//! let app = Router::new().merge(rusty_forms_jsvalidation::remote::routes(
//!     &factory.config().remote_path,
//!     factory.remote_protocol().clone(),
//!     evaluator,
//! ));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod manager;
pub mod messages;
pub mod registry;
pub mod remote;
pub mod rule;
pub mod specification;
pub mod translator;
pub mod view;

// Re-export main types
pub use config::JsValidationConfig;
pub use engine::{InputData, RuleEngine, RuleValidator, ValidationEngine, ValidatorInstance};
pub use error::{BridgeError, Result};
pub use factory::{FormRequest, FormRequestContext, FormRequestSource, JsValidatorFactory, Resolver};
pub use manager::{assemble, AssembleOptions, Manager};
pub use messages::{Attributes, Messages};
pub use registry::{ParameterTransform, RuleRegistry, TranslationStrategy};
pub use remote::{
    Encrypter, RemoteCheckState, RemoteCheckTracker, RemoteOutcome, RemoteProtocol,
    RemoteRuleEvaluator, RemoteValidationRequest, RemoteValidationResponse, SessionStore,
};
pub use rule::{IntoRuleList, ParsedRule, RuleMap};
pub use specification::{FieldValidation, RuleSpec, ValidatorSpecification};
pub use translator::RuleTranslator;
pub use view::{ScriptView, View, ViewRegistry};
