mod api;
mod config;
mod http;
mod inference;
mod server;

use std::sync::Arc;

use api::CorsPolicy;
use config::Config;
use inference::Engine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    match &cfg.allow_origin {
        Some(origin) => tracing::info!("CORS allowed origin: {}", origin),
        None => tracing::info!("CORS allowed origin: <none>"),
    }

    let engine = Arc::new(Engine::load(&cfg)?);
    let cors = CorsPolicy::from_config(&cfg);
    let router = Arc::new(api::routes(engine, cors));

    tokio::select! {
        res = server::listener::run(&cfg, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
