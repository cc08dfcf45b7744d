use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{Level, info};

use cinelog::config::AppConfig;
use cinelog::session::SessionStore;
use cinelog::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = cinelog::database::init_db(&config.database.url).await?;
    cinelog::seed::seed_genres(&db).await?;

    let state = AppState {
        db,
        sessions: Arc::new(SessionStore::new()),
    };
    let app = cinelog::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
