//! Pyrador server: loads settings from the environment (and `.env`), creates tables, serves the API.

use pyrador::{app, logging, AppState, SessionFactory, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    logging::init();

    let sessions = SessionFactory::connect(&settings.database).await?;
    sessions.create_tables().await?;
    let state = AppState { sessions };

    let listener = TcpListener::bind(&settings.server.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
