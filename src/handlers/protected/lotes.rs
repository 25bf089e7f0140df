use axum::{extract::Path, Json};

use crate::database::lotes::{LoteRepository, LoteUpdate};
use crate::database::models::Lote;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionIdentity};

/// PUT /api/lotes/:smp - update mutable listing fields (estado, agente).
/// The GET on this path is public, so the session gate is the
/// SessionIdentity extractor rather than the router-level middleware.
pub async fn lote_put(
    identity: SessionIdentity,
    Path(smp): Path<String>,
    Json(cambios): Json<LoteUpdate>,
) -> ApiResult<Lote> {
    if cambios.is_empty() {
        return Err(ApiError::bad_request("At least one of estado, agente is required"));
    }

    let repo = LoteRepository::new(DatabaseManager::pool().await?);
    if !repo.actualizar(&smp, &cambios).await? {
        return Err(ApiError::not_found(format!("Unknown SMP '{}'", smp)));
    }

    tracing::info!("lote {} updated by {}", smp, identity.username);

    let lote = repo
        .por_smp(&smp)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Unknown SMP '{}'", smp)))?;
    Ok(ApiResponse::success(lote))
}
