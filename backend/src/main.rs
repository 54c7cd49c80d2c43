use std::net::SocketAddr;

use tracing::{info, Level};

use gift_tracker_backend::{create_router, initialize_backend, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Config::from_env();
    info!("Starting with config: {:?}", config);

    let state = initialize_backend(&config.database_url).await?;
    let app = create_router(state, &config.cors_origin)?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
