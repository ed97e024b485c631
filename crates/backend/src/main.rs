use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use backend::api::AppState;
use backend::dashboards::d402_shared_dashboard::SeaOrmShareStore;
use backend::{routes, shared, system};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config);
    let conn = shared::data::db::initialize_database(&db_path)
        .await
        .context("db init failed")?;

    let state = AppState::new(
        Arc::new(SeaOrmShareStore::new(conn)),
        config.locale.to_format(),
    );
    let app = routes::configure_routes(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    tracing::info!("Public dashboard server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
