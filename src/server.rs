use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::cors;

pub struct Server {
    config: Config,
    routes: Router,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Server {
            config,
            routes: Router::new(),
        }
    }

    pub fn with_routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    pub fn router(&self) -> Router {
        let app = Router::new()
            .route("/liveness", get(liveness))
            .merge(self.routes.clone());
        cors::apply(app, &self.config.cors)
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.server_addr).await?;
        log::info!("Server running on {}", listener.local_addr()?);
        log::info!(
            "CORS origins {:?}, credentials {}, enforce {}",
            self.config.cors.allowed_origins,
            self.config.cors.allow_credentials,
            self.config.cors.enforce_origin
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn liveness() -> StatusCode {
    StatusCode::OK
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutting down server...");
}
