mod config;

use std::{future, sync::Arc};

use anyhow::Context;
use log::{info, warn};
use machine_learning::Classifier;
use server::AppState;
use tokio::{net::TcpListener, signal, task};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let spec = config.pipeline_spec()?;

    // The listener is only bound once the classifier is ready.
    let classifier = task::block_in_place(|| Classifier::train(&config.dataset, &spec))
        .with_context(|| format!("failed to train on {}", config.dataset.display()))?;
    let state = Arc::new(AppState::new(classifier).context("failed to load templates")?);

    let listener = TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    server::serve(listener, state, async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received SIGINT"),
            Err(e) => {
                warn!("cannot listen for SIGINT: {e}");
                future::pending::<()>().await;
            }
        }
    })
    .await?;

    info!("wrapping up");
    Ok(())
}
