pub mod error;
pub mod handlers;
pub mod state;
pub mod templates;

use std::{future::Future, io, sync::Arc};

use axum::{
    Router,
    routing::{any, get},
};
use log::info;
use tokio::net::TcpListener;

pub use error::ClassifyErr;
pub use state::AppState;
pub use templates::Templates;

/// Builds the two routes of the front end around a shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(handlers::home))
        .route(
            "/classify",
            get(handlers::classify).post(handlers::classify),
        )
        .with_state(state)
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// # Arguments
/// * `listener` - An already bound listener.
/// * `state` - The trained classifier and the page templates.
/// * `shutdown` - Resolves when the server should stop accepting connections.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("listening at {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
