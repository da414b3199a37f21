use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tracing::{error, info};

/// Spawns the process-liveness HTTP responder. A bind failure is logged
/// and never takes the bot down.
pub fn spawn(port: u16) {
    tokio::spawn(async move {
        let app = Router::new().route("/healthz", get(healthz));
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind liveness endpoint on {}: {}", addr, e);
                return;
            }
        };

        info!("Liveness endpoint listening on {}", addr);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Liveness endpoint error: {}", e);
        }
    });
}

async fn healthz() -> &'static str {
    "ok"
}
