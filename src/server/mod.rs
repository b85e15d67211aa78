mod handlers;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{health, quotes, routes, vehicles};

pub use crate::api::DynAPI;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/api/health", get(health))
        .route("/api/calculate-route", post(routes::calculate))
        .route("/api/vehicles", get(vehicles::list))
        .route("/api/quotes", post(quotes::create))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).map_err(|err| {
        tracing::error!(error = %err, "failed to bind {}", addr);
        unexpected_error()
    })?;

    serve_on(api, listener).await
}

/// Serves on an already bound listener, e.g. one bound to port 0.
pub async fn serve_on<T: API + Sync + Send + 'static>(
    api: T,
    listener: TcpListener,
) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {:?}", listener.local_addr());

    axum::Server::from_tcp(listener)
        .map_err(|err| {
            tracing::error!(error = %err, "failed to start server");
            unexpected_error()
        })?
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "server error");
            unexpected_error()
        })
}
