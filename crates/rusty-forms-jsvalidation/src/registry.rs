// File: src/registry.rs
// Purpose: Rule name → translation strategy registry

use crate::error::{BridgeError, Result};
use crate::rule::normalize_rule_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rules the client evaluator understands as-is
const CLIENT_RULES: &[&str] = &[
    "accepted",
    "after",
    "after_or_equal",
    "alpha",
    "alpha_dash",
    "alpha_num",
    "array",
    "bail",
    "before",
    "before_or_equal",
    "between",
    "boolean",
    "date",
    "date_equals",
    "different",
    "digits",
    "digits_between",
    "email",
    "file",
    "filled",
    "gt",
    "gte",
    "image",
    "integer",
    "ip",
    "ipv4",
    "ipv6",
    "json",
    "lt",
    "lte",
    "max",
    "mimes",
    "mimetypes",
    "min",
    "nullable",
    "numeric",
    "present",
    "required",
    "required_if",
    "required_unless",
    "required_with",
    "required_with_all",
    "required_without",
    "required_without_all",
    "same",
    "size",
    "sometimes",
    "string",
    "timezone",
    "url",
    "uuid",
];

/// Rules that need server state to decide
const REMOTE_RULES: &[&str] = &[
    "active_url",
    "current_password",
    "exists",
    "password",
    "unique",
];

/// Flags the browser regex engine accepts
const CLIENT_REGEX_FLAGS: &[char] = &['i', 'm', 's', 'u'];

/// Rewrites declared parameters into the form the client evaluator expects
pub trait ParameterTransform: Send + Sync {
    fn transform(&self, field: &str, parameters: Vec<String>) -> Vec<String>;
}

impl<F> ParameterTransform for F
where
    F: Fn(&str, Vec<String>) -> Vec<String> + Send + Sync,
{
    fn transform(&self, field: &str, parameters: Vec<String>) -> Vec<String> {
        self(field, parameters)
    }
}

/// How a server rule is carried over to the client
#[derive(Clone)]
pub enum TranslationStrategy {
    /// Evaluated in the browser with the declared parameters
    Client,
    /// Evaluated in the browser after rewriting the parameters
    Transformed(Arc<dyn ParameterTransform>),
    /// Needs a server round-trip
    Remote,
}

/// Fallback for names nothing registered
static REMOTE_DEFERRED: TranslationStrategy = TranslationStrategy::Remote;

impl TranslationStrategy {
    pub fn transformed<T>(transform: T) -> Self
    where
        T: ParameterTransform + 'static,
    {
        TranslationStrategy::Transformed(Arc::new(transform))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, TranslationStrategy::Remote)
    }

    /// Produce the client parameters for a rule on `field`
    pub fn parameters(&self, field: &str, parameters: Vec<String>) -> Vec<String> {
        match self {
            TranslationStrategy::Transformed(transform) => transform.transform(field, parameters),
            TranslationStrategy::Client | TranslationStrategy::Remote => parameters,
        }
    }
}

impl fmt::Debug for TranslationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStrategy::Client => write!(f, "Client"),
            TranslationStrategy::Transformed(_) => write!(f, "Transformed(..)"),
            TranslationStrategy::Remote => write!(f, "Remote"),
        }
    }
}

/// Registry of translation strategies keyed by rule name
///
/// Populated at startup and shared read-only afterwards (usually behind
/// an `Arc`). Unknown names resolve to [`TranslationStrategy::Remote`].
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    strategies: HashMap<String, TranslationStrategy>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Registry preloaded with the builtin rule vocabulary
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_rules();
        registry
    }

    /// Registry without any rules; everything resolves as remote
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register a strategy for a rule name
    ///
    /// Fails if the name is already taken, builtin or not.
    pub fn register(&mut self, name: &str, strategy: TranslationStrategy) -> Result<()> {
        let name = normalize_rule_name(name);

        if self.strategies.contains_key(&name) {
            return Err(BridgeError::DuplicateRule { name });
        }

        tracing::debug!("Registered rule strategy {} as {:?}", name, strategy);
        self.strategies.insert(name, strategy);
        Ok(())
    }

    /// Look up the strategy for a rule, defaulting to remote deferral
    pub fn resolve(&self, name: &str) -> &TranslationStrategy {
        self.strategies
            .get(&normalize_rule_name(name))
            .unwrap_or(&REMOTE_DEFERRED)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.strategies.contains_key(&normalize_rule_name(name))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    fn register_builtin_rules(&mut self) {
        for name in CLIENT_RULES {
            self.strategies
                .insert((*name).to_string(), TranslationStrategy::Client);
        }

        for name in REMOTE_RULES {
            self.strategies
                .insert((*name).to_string(), TranslationStrategy::Remote);
        }

        self.strategies.insert(
            "confirmed".to_string(),
            TranslationStrategy::transformed(confirmed_parameters),
        );
        self.strategies.insert(
            "in".to_string(),
            TranslationStrategy::transformed(unquoted_parameters),
        );
        self.strategies.insert(
            "not_in".to_string(),
            TranslationStrategy::transformed(unquoted_parameters),
        );
        self.strategies.insert(
            "regex".to_string(),
            TranslationStrategy::transformed(regex_parameters),
        );
        self.strategies.insert(
            "not_regex".to_string(),
            TranslationStrategy::transformed(regex_parameters),
        );
        self.strategies.insert(
            "date_format".to_string(),
            TranslationStrategy::transformed(trimmed_parameters),
        );
    }
}

/// `confirmed` compares against the declared field, else `<field>_confirmation`
fn confirmed_parameters(field: &str, parameters: Vec<String>) -> Vec<String> {
    match parameters.into_iter().map(|p| p.trim().to_string()).find(|p| !p.is_empty()) {
        Some(other) => vec![other],
        None => vec![format!("{}_confirmation", field)],
    }
}

/// `in:"a,b",c` → `a,b` and `c`
fn unquoted_parameters(_field: &str, parameters: Vec<String>) -> Vec<String> {
    parameters
        .into_iter()
        .map(|value| {
            let trimmed = value.trim();
            if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
                trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

fn trimmed_parameters(_field: &str, parameters: Vec<String>) -> Vec<String> {
    parameters.into_iter().map(|p| p.trim().to_string()).collect()
}

/// `/pattern/flags` → `[pattern, flags]` with only client-supported flags
///
/// Undelimited input is passed through as the pattern with no flags.
fn regex_parameters(_field: &str, parameters: Vec<String>) -> Vec<String> {
    let Some(declared) = parameters.into_iter().next() else {
        return Vec::new();
    };

    match split_delimited_pattern(&declared) {
        Some((pattern, flags)) => {
            let flags: String = flags
                .chars()
                .filter(|c| CLIENT_REGEX_FLAGS.contains(c))
                .collect();
            vec![pattern.to_string(), flags]
        }
        None => vec![declared, String::new()],
    }
}

fn split_delimited_pattern(declared: &str) -> Option<(&str, &str)> {
    let open = declared.chars().next()?;
    if open.is_alphanumeric() || open == '\\' || open.is_whitespace() {
        return None;
    }

    let close = match open {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        '<' => '>',
        other => other,
    };

    let body = &declared[open.len_utf8()..];
    let end = body.rfind(close)?;
    let flags = &body[end + close.len_utf8()..];

    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some((&body[..end], flags))
}
