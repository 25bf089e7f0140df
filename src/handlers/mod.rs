pub mod protected;
pub mod public;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Lotes API",
            "version": version,
            "description": "Listing management API for land parcels",
            "endpoints": {
                "home": "/ (public)",
                "catalog": "/api/lotes[?barrio=&estado=&...] (public)",
                "filters": "/api/lotes/filtros (public - aggregated filter payload)",
                "options": "/api/lotes/{barrios,estados,origenes,tipos,agentes} (public)",
                "ranges": "/api/lotes/{area-range,frente-range} (public)",
                "detail": "/api/lotes/:smp[/frentes] (public)",
                "session": "/api/login, /api/logout (public), /api/session (protected)",
                "profile": "/api/perfil (protected)",
                "manage": "PUT /api/lotes/:smp (protected)",
            }
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
