use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::router::Router;

/// Binds the listening socket and accepts connections forever.
///
/// A bind failure is fatal to the process.
pub async fn run(cfg: &Config, router: Arc<Router>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, router, cfg.read_timeout).await
}

/// Accept loop over an already-bound listener.
///
/// Failures accepting an individual connection are logged and skipped; the
/// loop keeps accepting. Each accepted connection is handed to its own task,
/// so a slow handler or a slow client never stalls acceptance. Tasks are
/// unbounded, one per live connection.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    deadline: Option<Duration>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "failed to accept connection, skipping");
                continue;
            }
        };
        tracing::debug!("Accepted connection from {}", peer);

        let router = router.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router);

            let result = match deadline {
                // Hardening option: bound the whole exchange. Off by default.
                Some(dur) => match tokio::time::timeout(dur, conn.run()).await {
                    Ok(res) => res,
                    Err(_) => Err(anyhow::anyhow!("connection deadline exceeded")),
                },
                None => conn.run().await,
            };

            if let Err(e) = result {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
