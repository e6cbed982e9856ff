use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use log::{info, warn};

use state::AppState;

pub mod error;
pub mod extract;
pub mod group;
pub mod identity;
pub mod integration;
pub mod message;
mod schema;
pub mod slug;
pub mod state;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// All routes of the service, without transport-level layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .merge(group::api(state.clone()))
        .merge(message::api(state))
        .layer(middleware::from_fn(log_request))
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let resp = next.run(req).await;

    let status = resp.status();
    if status.is_server_error() {
        warn!("{method} {uri} -> {status}");
    } else {
        info!("{method} {uri} -> {status}");
    }

    resp
}
