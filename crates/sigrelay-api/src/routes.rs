//! HTTP route definitions.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DeliveryState;

/// Listing of the supported operations, appended to 404 and 405 bodies.
pub const USAGE: &str = "
GET /receive/pop   => Return the oldest message
GET /receive/flush => Return all messages
";

/// Build the delivery router.
///
/// Only `GET` is served. `HEAD` is rejected explicitly so it can never
/// consume a message.
pub fn create_router(state: Arc<DeliveryState>) -> Router {
    Router::new()
        .route("/receive/pop", get_only(get(receive_pop)))
        .route("/receive/flush", get_only(get(receive_flush)))
        .route("/healthz", get_only(get(healthz)))
        .fallback(unsupported_path)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn get_only(route: MethodRouter<Arc<DeliveryState>>) -> MethodRouter<Arc<DeliveryState>> {
    route.head(method_not_allowed).fallback(method_not_allowed)
}

async fn receive_pop(State(state): State<Arc<DeliveryState>>) -> Result<Response, ApiError> {
    match state.pop() {
        Some(message) => json_response(&message),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn receive_flush(State(state): State<Arc<DeliveryState>>) -> Result<Response, ApiError> {
    let messages = state.flush();
    debug!(count = messages.len(), "Flushed messages");
    json_response(&messages)
}

async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        format!("ERROR! GET is the only allowed verb. The supported paths are below:{USAGE}"),
    )
        .into_response()
}

async fn unsupported_path(method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return method_not_allowed().await;
    }

    (
        StatusCode::NOT_FOUND,
        format!(
            "ERROR! GET {} is not supported. The supported paths are below:{USAGE}",
            uri.path()
        ),
    )
        .into_response()
}

fn json_response<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let mut body = serde_json::to_vec(value)?;
    body.push(b'\n');
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
