use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::api::handlers::{handle_health, handle_solve};
use crate::pipeline::Pipeline;

pub struct GuardServer {
    pub port: u16,
    pub pipeline: Arc<Pipeline>,
}

impl GuardServer {
    pub fn new(port: u16, pipeline: Arc<Pipeline>) -> Self {
        Self { port, pipeline }
    }

    pub async fn start(&self) -> Result<(), String> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "math-guard API listening");
        axum::Server::bind(&addr)
            .serve(router(self.pipeline.clone()).into_make_service())
            .await
            .map_err(|err| err.to_string())
    }
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/solve", post(handle_solve))
        .with_state(pipeline)
}
