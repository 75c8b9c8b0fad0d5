pub mod migrate;
pub mod serve;
pub mod user;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use folio_api::FolioConfig;

/// Config file selection shared by every command
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file (defaults to ./folio.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<FolioConfig> {
        FolioConfig::load(self.config.as_deref()).context("loading configuration")
    }
}
