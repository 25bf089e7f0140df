use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = lotes_api::config::config();

    // A deployed instance must never run with a missing or placeholder
    // signing secret; refuse to start instead of accepting it silently.
    if let Err(e) = config.validate() {
        tracing::error!("configuration error: {}", e);
        anyhow::bail!("configuration error: {}", e);
    }

    tracing::info!("Starting Lotes API in {:?} mode", config.environment);

    let app = lotes_api::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("LOTES_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Lotes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
