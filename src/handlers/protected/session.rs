use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, SessionIdentity};

/// GET /api/session - decoded identity of the current session, including
/// which source the token was read from. Session-gated like every other
/// protected route; this replaces the old unauthenticated token-dump
/// diagnostics.
pub async fn session_get(Extension(identity): Extension<SessionIdentity>) -> ApiResult<SessionIdentity> {
    Ok(ApiResponse::success(identity))
}
