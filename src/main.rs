use log::{error, info};
use tokio::net::TcpListener;

use group_service::{app, integration, state::AppState};

#[tokio::main]
async fn main() {
    let config = match integration::Config::init() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Service stopped: {e}");
        std::process::exit(1);
    }
}

async fn run(config: integration::Config) -> group_service::Result<()> {
    let state = AppState::init(&config.storage)?;

    let router = app(state).layer(config.env.cors()?);

    let addr = config.env.addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(integration::Error::from)?;
    info!("Listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(integration::Error::from)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
