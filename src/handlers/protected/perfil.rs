use axum::{Extension, Json};

use crate::database::models::Usuario;
use crate::database::usuarios::{PerfilUpdate, UsuarioRepository};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionIdentity};

/// GET /api/perfil - the caller's own profile
pub async fn perfil_get(Extension(identity): Extension<SessionIdentity>) -> ApiResult<Usuario> {
    let repo = UsuarioRepository::new(DatabaseManager::pool().await?);
    let usuario = repo
        .por_username(&identity.username)
        .await?
        .ok_or_else(|| ApiError::not_found("User no longer exists"))?;
    Ok(ApiResponse::success(usuario))
}

/// PUT /api/perfil - update own profile fields
pub async fn perfil_put(
    Extension(identity): Extension<SessionIdentity>,
    Json(cambios): Json<PerfilUpdate>,
) -> ApiResult<Usuario> {
    if cambios.is_empty() {
        return Err(ApiError::bad_request("At least one of nombre, apellido, email is required"));
    }

    let repo = UsuarioRepository::new(DatabaseManager::pool().await?);
    let usuario = repo
        .actualizar_perfil(&identity.username, &cambios)
        .await?
        .ok_or_else(|| ApiError::not_found("User no longer exists"))?;
    Ok(ApiResponse::success(usuario))
}
