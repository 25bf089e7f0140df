pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the application router. Lives in the library so tests can drive
/// the exact router the binary serves.
pub fn app() -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(lotes_routes())
        .merge(session_routes())
        .merge(protected_routes())
        // Global middleware
        .layer(from_fn(middleware::rate_limit_middleware))
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

fn lotes_routes() -> Router {
    use handlers::{protected, public::lotes};

    Router::new()
        .route("/api/lotes", get(lotes::buscar))
        .route("/api/lotes/filtros", get(lotes::filtros))
        .route("/api/lotes/barrios", get(lotes::barrios))
        .route("/api/lotes/estados", get(lotes::estados))
        .route("/api/lotes/origenes", get(lotes::origenes))
        .route("/api/lotes/tipos", get(lotes::tipos))
        .route("/api/lotes/agentes", get(lotes::agentes))
        .route("/api/lotes/area-range", get(lotes::area_range))
        .route("/api/lotes/frente-range", get(lotes::frente_range))
        // Reading a listing is public; changing it requires a session,
        // enforced by the SessionIdentity extractor on the PUT handler
        .route("/api/lotes/:smp", get(lotes::detalle).put(protected::lotes::lote_put))
        .route("/api/lotes/:smp/frentes", get(lotes::frentes))
}

fn session_routes() -> Router {
    use handlers::public::session;

    Router::new()
        .route("/api/login", post(session::login))
        .route("/api/logout", post(session::logout))
}

fn protected_routes() -> Router {
    use handlers::protected::{perfil, session};

    Router::new()
        .route("/api/session", get(session::session_get))
        .route("/api/perfil", get(perfil::perfil_get).put(perfil::perfil_put))
        .route_layer(from_fn(middleware::session_auth_middleware))
}
