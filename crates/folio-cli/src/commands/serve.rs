//! Usage: folio serve [--config <PATH>]

use anyhow::Context;
use clap::Args;
use folio_api::AppState;
use folio_core::logging_facility;

use super::ConfigArgs;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = args.config.load()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    logging_facility::init(config.logging_profile());
    tracing::info!(
        environment = ?config.environment,
        backend = ?config.backend,
        "starting folio"
    );

    let state = AppState::from_config(&config).context("opening the store")?;
    folio_api::serve(&config, state)
        .await
        .with_context(|| format!("serving on {}", config.bind_address()))
}
