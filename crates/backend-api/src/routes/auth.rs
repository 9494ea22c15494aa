use axum::{extract::State, Json};
use tracing::info;

use super::models::{DevTokenRequest, SessionResponse};
use crate::{ApiError, AppState};

/// Mint an account and session for local testing.
///
/// Only answers when `auth.allow_dev_tokens` is set; otherwise the route
/// behaves as if it did not exist.
#[utoipa::path(
    post,
    path = "/api/auth/dev/token",
    tag = "Auth",
    request_body(content = DevTokenRequest, description = "Optional display name"),
    responses(
        (status = 200, description = "Development session issued", body = SessionResponse),
        (status = 404, description = "Development tokens are disabled", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to create development session", body = crate::error::ErrorResponse)
    )
)]
pub async fn dev_token(
    State(state): State<AppState>,
    body: Option<Json<DevTokenRequest>>,
) -> Result<Json<SessionResponse>, ApiError> {
    if !state.dev_tokens_enabled() {
        return Err(ApiError::not_found("not found"));
    }

    let request = body.map(|Json(request)| request).unwrap_or_default();

    let account = state
        .authenticator()
        .register_account(request.display_name)
        .await?;
    let session = state.authenticator().issue_session(account.id).await?;

    info!(account = %account.public_id, "issued development session");

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at.to_rfc3339(),
        account: account.into(),
    }))
}
