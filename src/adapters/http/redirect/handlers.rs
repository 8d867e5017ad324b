//! HTTP handlers for the redirect endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use super::dto::ErrorResponse;
use crate::application::{RedeemError, RedeemLinkHandler, ReplyGenerationError};
use crate::domain::foundation::LinkId;

/// Shared state of the redirect routes.
#[derive(Clone)]
pub struct RedirectAppState {
    pub redeem: Arc<RedeemLinkHandler>,
}

impl RedirectAppState {
    pub fn new(redeem: Arc<RedeemLinkHandler>) -> Self {
        Self { redeem }
    }
}

/// GET /shill/:id - Generate a reply for a link and redirect to the tweet composer
pub async fn redeem_link(
    State(state): State<RedirectAppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, RedirectApiError> {
    let link_id: LinkId = raw_id
        .parse()
        .map_err(|_| RedirectApiError::MalformedId(raw_id.clone()))?;

    let redeemed = state.redeem.handle(link_id).await?;
    info!(
        link_id = %link_id,
        chat_id = %redeemed.link.chat_id,
        "Redirecting to reply composer"
    );

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, redeemed.redirect_url)],
    )
        .into_response())
}

/// GET /health-check
pub async fn health_check() -> &'static str {
    "We're alive!"
}

/// API error wrapper mapping redemption failures to HTTP responses.
#[derive(Debug)]
pub enum RedirectApiError {
    MalformedId(String),
    Redeem(RedeemError),
}

impl From<RedeemError> for RedirectApiError {
    fn from(err: RedeemError) -> Self {
        Self::Redeem(err)
    }
}

impl IntoResponse for RedirectApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            RedirectApiError::MalformedId(id) => (
                StatusCode::NOT_FOUND,
                "LINK_NOT_FOUND",
                format!("Link not found: {}", id),
            ),
            RedirectApiError::Redeem(RedeemError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                "LINK_NOT_FOUND",
                format!("Link not found: {}", id),
            ),
            RedirectApiError::Redeem(RedeemError::Generation(
                err @ ReplyGenerationError::LengthExceeded { .. },
            )) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "REPLY_TOO_LONG",
                err.to_string(),
            ),
            RedirectApiError::Redeem(RedeemError::Generation(err)) => (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                err.to_string(),
            ),
            RedirectApiError::Redeem(RedeemError::Storage(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            warn!(error_code, %message, "Link redemption failed");
        }
        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
