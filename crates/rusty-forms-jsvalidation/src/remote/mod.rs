// File: src/remote/mod.rs
// Purpose: Remote validation protocol - token lifecycle, remote rule flagging, wire contract

pub mod endpoint;
pub mod state;

use crate::specification::FieldValidation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub use endpoint::{routes, RemoteEndpointError, RemoteRuleEvaluator};
pub use state::{RemoteCheckState, RemoteCheckTracker, RemoteOutcome, RequestTicket};

/// Session collaborator: exposes the anti-forgery token of the live session
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// The application's authenticated symmetric encryption
pub trait Encrypter: Send + Sync {
    fn encrypt(&self, value: &str) -> anyhow::Result<String>;
    fn decrypt(&self, payload: &str) -> anyhow::Result<String>;
}

/// Body the client posts to the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteValidationRequest {
    /// Field being checked
    pub field: String,
    pub rule_name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub field_value: String,
    pub remote_token: String,
}

/// Endpoint answer for an accepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteValidationResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Produces and checks remote tokens
///
/// Both collaborators are optional. Without a session there is no token
/// and remote rules are left to the server-side check on submission.
#[derive(Clone, Default)]
pub struct RemoteProtocol {
    session: Option<Arc<dyn SessionStore>>,
    encrypter: Option<Arc<dyn Encrypter>>,
}

impl std::fmt::Debug for RemoteProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteProtocol")
            .field("session", &self.session.is_some())
            .field("encrypter", &self.encrypter.is_some())
            .finish()
    }
}

impl RemoteProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_encrypter(mut self, encrypter: Arc<dyn Encrypter>) -> Self {
        self.encrypter = Some(encrypter);
        self
    }

    pub fn session(&self) -> Option<&Arc<dyn SessionStore>> {
        self.session.as_ref()
    }

    /// Derive a fresh remote token for the current request
    ///
    /// The value is the session's raw token passed through
    /// [`Encrypter::encrypt`], or the raw token when no encrypter is
    /// configured. A failed encryption yields no token.
    pub fn session_token(&self) -> Option<String> {
        let token = self
            .session
            .as_ref()?
            .token()
            .filter(|t| !t.is_empty())?;

        match &self.encrypter {
            Some(encrypter) => match encrypter.encrypt(&token) {
                Ok(encrypted) => Some(encrypted),
                Err(e) => {
                    tracing::warn!("Failed to encrypt remote validation token: {}", e);
                    None
                }
            },
            None => Some(token),
        }
    }

    /// Check a token presented by the client against the live session
    ///
    /// An empty session token or an empty presented token never verifies.
    pub fn verify_token(&self, presented: &str) -> bool {
        let Some(expected) = self
            .session
            .as_ref()
            .and_then(|s| s.token())
            .filter(|t| !t.is_empty())
        else {
            return false;
        };

        let candidate = match &self.encrypter {
            Some(encrypter) => match encrypter.decrypt(presented) {
                Ok(plain) => plain,
                Err(e) => {
                    tracing::debug!("Rejected remote token that failed to decrypt: {}", e);
                    return false;
                }
            },
            None => presented.to_string(),
        };

        if candidate.is_empty() {
            return false;
        }

        bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
    }
}

/// Finalize remote rules for a set of translated fields
///
/// With remote validation enabled and a token present, remote rules stay
/// flagged. Otherwise they are dropped from the client list (the client
/// treats them as passing) along with their messages. Fields are never
/// dropped.
pub fn attach(
    fields: Vec<FieldValidation>,
    token: Option<&str>,
    remote_enabled: bool,
) -> Vec<FieldValidation> {
    let remote_available = remote_enabled && token.is_some_and(|t| !t.is_empty());
    if remote_available {
        return fields;
    }

    fields
        .into_iter()
        .map(|mut field| {
            let (remote, local): (Vec<_>, Vec<_>) =
                field.rules.into_iter().partition(|rule| rule.is_remote);

            for rule in &remote {
                tracing::debug!(
                    "Remote validation unavailable, leaving {} on {} to the server",
                    rule.rule_name,
                    field.field_name
                );
                if !local.iter().any(|r| r.rule_name == rule.rule_name) {
                    field.messages.remove(&rule.rule_name);
                }
            }

            field.rules = local;
            field
        })
        .collect()
}
