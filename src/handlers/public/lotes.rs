use axum::extract::{Path, Query};

use crate::database::lotes::{BusquedaLotes, LoteRepository};
use crate::database::models::{AgenteResumen, Frente, Lote, RangoNumerico};
use crate::database::usuarios::UsuarioRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::filter::LoteFilter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{self, FiltrosAgregados};

async fn lote_repo() -> Result<LoteRepository, ApiError> {
    Ok(LoteRepository::new(DatabaseManager::pool().await?))
}

/// GET /api/lotes/filtros - merged filter payload, one round-trip
pub async fn filtros() -> ApiResult<FiltrosAgregados> {
    let payload = services::filtros_agregados().await?;
    Ok(ApiResponse::success(payload))
}

/// GET /api/lotes/barrios
pub async fn barrios() -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(lote_repo().await?.barrios().await?))
}

/// GET /api/lotes/estados
pub async fn estados() -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(lote_repo().await?.estados().await?))
}

/// GET /api/lotes/origenes
pub async fn origenes() -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(lote_repo().await?.origenes().await?))
}

/// GET /api/lotes/tipos
pub async fn tipos() -> ApiResult<Vec<String>> {
    Ok(ApiResponse::success(lote_repo().await?.tipos().await?))
}

/// GET /api/lotes/agentes
pub async fn agentes() -> ApiResult<Vec<AgenteResumen>> {
    let repo = UsuarioRepository::new(DatabaseManager::pool().await?);
    Ok(ApiResponse::success(repo.agentes().await?))
}

/// GET /api/lotes/area-range
pub async fn area_range() -> ApiResult<Option<RangoNumerico>> {
    Ok(ApiResponse::success(lote_repo().await?.rango_area().await?))
}

/// GET /api/lotes/frente-range
pub async fn frente_range() -> ApiResult<Option<RangoNumerico>> {
    Ok(ApiResponse::success(lote_repo().await?.rango_frente().await?))
}

/// GET /api/lotes - filtered, paginated catalog search
pub async fn buscar(Query(filter): Query<LoteFilter>) -> ApiResult<BusquedaLotes> {
    let sql = filter.to_sql().map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ApiResponse::success(lote_repo().await?.buscar(&sql).await?))
}

/// GET /api/lotes/:smp - listing detail
pub async fn detalle(Path(smp): Path<String>) -> ApiResult<Lote> {
    let lote = lote_repo()
        .await?
        .por_smp(&smp)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Unknown SMP '{}'", smp)))?;
    Ok(ApiResponse::success(lote))
}

/// GET /api/lotes/:smp/frentes - frontage rows for a listing
pub async fn frentes(Path(smp): Path<String>) -> ApiResult<Vec<Frente>> {
    let repo = lote_repo().await?;

    // 404 for an unknown parcel; a known parcel with no frontage rows is an
    // empty list, not an error
    if repo.por_smp(&smp).await?.is_none() {
        return Err(ApiError::not_found(format!("Unknown SMP '{}'", smp)));
    }

    Ok(ApiResponse::success(repo.frentes_por_smp(&smp).await?))
}
