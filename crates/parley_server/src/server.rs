//! Service wiring and the accept loop.

use crate::{AppState, ParleyConfig, create_router};
use parley_error::ParleyResult;
use parley_inference::GenerationScheduler;
use parley_models::HuggingFaceBackend;
use parley_rate_limit::{RateLimiter, spawn_sweeper};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

/// Builds handler state from configuration and starts the window sweeper.
///
/// Must be called from within a tokio runtime. The returned handle belongs to the
/// sweeper task; abort it on shutdown.
///
/// # Errors
///
/// Fails on invalid quotas or backend settings, or when the HTTP client cannot be
/// built.
pub fn build_state(config: &ParleyConfig) -> ParleyResult<(AppState, JoinHandle<()>)> {
    let parser = config.model().parser();
    let backend = HuggingFaceBackend::new(config.backend().huggingface_config()?, Handle::current())?
        .with_end_marker(parser.end_marker());
    let scheduler = GenerationScheduler::new(Arc::new(backend), parser)
        .with_max_new_tokens_cap(*config.model().max_new_tokens_cap())
        .with_generation_timeout(config.model().generation_timeout());

    let limiter = Arc::new(RateLimiter::new(config.rate_limit().exempt().iter().cloned()));
    let state = AppState::from_config(config, scheduler, Arc::clone(&limiter))?;
    let sweeper = spawn_sweeper(limiter, config.rate_limit().sweep_interval());

    info!(
        model = %config.model().id(),
        %parser,
        cap = *config.model().max_new_tokens_cap(),
        "Service state ready"
    );
    Ok((state, sweeper))
}

/// Serves the router on `addr` until `shutdown` resolves.
///
/// # Errors
///
/// Fails if the address cannot be bound or the accept loop dies.
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> ParleyResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Parley listening");

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}
