//! Rate-limit middleware.
//!
//! Runs as a route layer, so a rejected request never reaches body parsing or the
//! scheduler.

use crate::{ApiError, AppState, ClientIdentity};
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use parley_rate_limit::Quota;
use std::net::SocketAddr;

/// Applies the chat quota.
pub async fn limit_chat(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(&state, peer, &request, state.limits().chat())?;
    Ok(next.run(request).await)
}

/// Applies the status quota.
pub async fn limit_status(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    enforce(&state, peer, &request, state.limits().status())?;
    Ok(next.run(request).await)
}

fn enforce(
    state: &AppState,
    peer: SocketAddr,
    request: &Request,
    quota: &Quota,
) -> Result<(), ApiError> {
    let identity =
        ClientIdentity::resolve(peer.ip(), request.headers(), *state.use_auth_identity());
    if state.limiter().is_exempt(&identity.ip().to_string()) {
        return Ok(());
    }
    state.limiter().check(identity.key(), quota).map_err(|e| {
        tracing::info!(client = identity.key(), path = %request.uri().path(), "Rate limited");
        ApiError::from(e)
    })
}
