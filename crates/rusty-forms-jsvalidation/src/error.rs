// File: src/error.rs
// Purpose: Error type shared by the registry, factory and manager

/// Errors surfaced to callers of the validation bridge
///
/// Unknown rules and missing session/encryption collaborators are not
/// errors: they degrade to remote deferral or to "no remote validation".
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A value handed to the form request entry point is not a known form request
    #[error("Invalid form request argument: `{value}` is not a recognized form request")]
    InvalidArgumentKind { value: String },

    /// Two translation strategies registered under the same rule name
    #[error("Rule strategy already registered: {name}")]
    DuplicateRule { name: String },

    /// Two form request constructors registered under the same identifier
    #[error("Form request already registered: {name}")]
    DuplicateFormRequest { name: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl BridgeError {
    pub fn invalid_argument(value: impl Into<String>) -> Self {
        BridgeError::InvalidArgumentKind {
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_value() {
        let err = BridgeError::invalid_argument("App\\NotARequest");
        assert!(matches!(err, BridgeError::InvalidArgumentKind { ref value } if value == "App\\NotARequest"));
        assert!(err.to_string().contains("App\\NotARequest"));
    }

    #[test]
    fn test_config_error_from_anyhow() {
        let err: BridgeError = anyhow::anyhow!("bad toml").into();
        assert_eq!(err.to_string(), "Configuration error: bad toml");
    }
}
