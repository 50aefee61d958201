// File: src/remote/state.rs
// Purpose: Client-side remote check state machine with stale response discarding

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State of one remote rule on one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoteCheckState {
    /// Not checked since the last edit
    #[default]
    Pending,
    /// Request in flight
    Validating,
    Valid,
    Invalid,
    /// Network failure or token rejection; needs a new edit to retry
    Error,
}

impl std::fmt::Display for RemoteCheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteCheckState::Pending => write!(f, "pending"),
            RemoteCheckState::Validating => write!(f, "validating"),
            RemoteCheckState::Valid => write!(f, "valid"),
            RemoteCheckState::Invalid => write!(f, "invalid"),
            RemoteCheckState::Error => write!(f, "error"),
        }
    }
}

/// What came back for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    Valid,
    Invalid,
    NetworkFailure,
    TokenRejected,
}

impl RemoteOutcome {
    fn next_state(self) -> RemoteCheckState {
        match self {
            RemoteOutcome::Valid => RemoteCheckState::Valid,
            RemoteOutcome::Invalid => RemoteCheckState::Invalid,
            RemoteOutcome::NetworkFailure | RemoteOutcome::TokenRejected => RemoteCheckState::Error,
        }
    }
}

/// Handle for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub field: String,
    pub rule: String,
    /// Value the request was issued for
    pub value: String,
    seq: u64,
}

#[derive(Debug, Default)]
struct Check {
    state: RemoteCheckState,
    latest: Option<u64>,
}

/// Tracks remote checks per (field, rule)
///
/// One outstanding request per pair. An edit returns every rule on the
/// field to `Pending` and orphans whatever is in flight, so only the
/// response to the latest request can move a check forward.
#[derive(Debug, Default)]
pub struct RemoteCheckTracker {
    checks: HashMap<(String, String), Check>,
    next_seq: u64,
}

impl RemoteCheckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, field: &str, rule: &str) -> RemoteCheckState {
        self.checks
            .get(&(field.to_string(), rule.to_string()))
            .map(|c| c.state)
            .unwrap_or_default()
    }

    /// Start a check on blur/change
    ///
    /// Only a `Pending` check starts; anything else returns `None`.
    pub fn begin(&mut self, field: &str, rule: &str, value: &str) -> Option<RequestTicket> {
        let check = self
            .checks
            .entry((field.to_string(), rule.to_string()))
            .or_default();

        if check.state != RemoteCheckState::Pending {
            return None;
        }

        self.next_seq += 1;
        check.state = RemoteCheckState::Validating;
        check.latest = Some(self.next_seq);

        Some(RequestTicket {
            field: field.to_string(),
            rule: rule.to_string(),
            value: value.to_string(),
            seq: self.next_seq,
        })
    }

    /// Apply a response; returns false when the ticket is stale
    pub fn complete(&mut self, ticket: &RequestTicket, outcome: RemoteOutcome) -> bool {
        let Some(check) = self
            .checks
            .get_mut(&(ticket.field.clone(), ticket.rule.clone()))
        else {
            return false;
        };

        if check.state != RemoteCheckState::Validating || check.latest != Some(ticket.seq) {
            tracing::trace!(
                "Discarding stale remote response for {} on {}",
                ticket.rule,
                ticket.field
            );
            return false;
        }

        check.state = outcome.next_state();
        check.latest = None;
        true
    }

    /// The user edited `field`: every rule on it goes back to `Pending`
    pub fn edit(&mut self, field: &str) {
        for ((check_field, _), check) in self.checks.iter_mut() {
            if check_field == field {
                check.state = RemoteCheckState::Pending;
                check.latest = None;
            }
        }
    }
}
