//! Router assembly.

use crate::{AppState, handlers, middleware};
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the service router.
///
/// Each route carries its own rate-limit layer. The router reads the peer address
/// from `ConnectInfo`, so serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: AppState) -> Router {
    let chat = Router::new()
        .route("/chat/", post(handlers::chat))
        .route_layer(from_fn_with_state(state.clone(), middleware::limit_chat));

    let status = Router::new()
        .route("/srv/get/", get(handlers::status))
        .route_layer(from_fn_with_state(state.clone(), middleware::limit_status));

    chat.merge(status)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
