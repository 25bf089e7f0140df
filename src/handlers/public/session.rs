use axum::{http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{self, Claims};
use crate::database::models::Usuario;
use crate::database::usuarios::UsuarioRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: Usuario,
    pub expires_in: u64,
}

/// POST /api/login - credential check; issues the session token and cookie
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }

    let repo = UsuarioRepository::new(DatabaseManager::pool().await?);
    let usuario = repo
        .verificar_credenciales(username, &payload.password)
        .await?
        .ok_or_else(|| {
            // Unknown user and wrong password look identical to the client
            tracing::debug!("login rejected for '{}'", username);
            ApiError::unauthorized("Invalid credentials")
        })?;

    let claims = Claims::new(usuario.username.clone(), usuario.email.clone(), usuario.rol.clone());
    let token = auth::issue_session_token(&claims).map_err(|e| {
        tracing::error!("failed to issue session token: {}", e);
        ApiError::internal_server_error("Could not create session")
    })?;

    let cookie = auth::session_cookie(&token);
    let expires_in = crate::config::config().security.session_expiry_hours * 3600;

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(LoginResponse {
            token,
            usuario,
            expires_in,
        }),
    ))
}

/// POST /api/logout - clears the session cookie. Succeeds regardless of
/// whether the request carried a valid session.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        ApiResponse::success(json!({ "logged_out": true })),
    )
}
