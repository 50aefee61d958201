// File: src/remote/endpoint.rs
// Purpose: Axum route that verifies remote tokens and dispatches remote rule checks

use super::{RemoteProtocol, RemoteValidationRequest, RemoteValidationResponse};
use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Performs the server-side check for a remote rule (e.g. a uniqueness query)
#[async_trait]
pub trait RemoteRuleEvaluator: Send + Sync {
    async fn evaluate(&self, request: &RemoteValidationRequest) -> anyhow::Result<bool>;
}

/// Failures the endpoint reports to the client
#[derive(Debug)]
pub enum RemoteEndpointError {
    /// Token missing, forged or from another session (403)
    TokenRejected,
    /// Evaluator failure (500)
    Internal(anyhow::Error),
}

impl IntoResponse for RemoteEndpointError {
    fn into_response(self) -> Response {
        match self {
            RemoteEndpointError::TokenRejected => {
                (StatusCode::FORBIDDEN, "Invalid remote validation token").into_response()
            }
            RemoteEndpointError::Internal(err) => {
                tracing::error!("Remote validation failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
            }
        }
    }
}

impl From<anyhow::Error> for RemoteEndpointError {
    fn from(err: anyhow::Error) -> Self {
        RemoteEndpointError::Internal(err)
    }
}

#[derive(Clone)]
struct EndpointState {
    protocol: RemoteProtocol,
    evaluator: Arc<dyn RemoteRuleEvaluator>,
}

/// Router serving `POST <path>` for remote rule checks
///
/// ```rust,ignore
/// let app = Router::new().merge(rusty_forms_jsvalidation::remote::routes(
///     &config.remote_path,
///     factory.remote_protocol().clone(),
///     Arc::new(UniqueUsernames::new(pool)),
/// ));
/// ```
pub fn routes(
    path: &str,
    protocol: RemoteProtocol,
    evaluator: Arc<dyn RemoteRuleEvaluator>,
) -> Router {
    Router::new()
        .route(path, post(remote_validation_handler))
        .with_state(EndpointState {
            protocol,
            evaluator,
        })
}

async fn remote_validation_handler(
    State(state): State<EndpointState>,
    Json(request): Json<RemoteValidationRequest>,
) -> Result<Json<RemoteValidationResponse>, RemoteEndpointError> {
    if !state.protocol.verify_token(&request.remote_token) {
        tracing::warn!(
            "Rejected remote validation of {} on {}: bad token",
            request.rule_name,
            request.field
        );
        return Err(RemoteEndpointError::TokenRejected);
    }

    let valid = state.evaluator.evaluate(&request).await?;
    tracing::debug!(
        "Remote validation of {} on {}: valid={}",
        request.rule_name,
        request.field,
        valid
    );

    Ok(Json(RemoteValidationResponse {
        valid,
        message: None,
    }))
}
