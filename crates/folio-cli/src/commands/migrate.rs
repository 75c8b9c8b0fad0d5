//! Usage: folio migrate [--db <PATH>] [--config <PATH>]

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use folio_store::{db, migrations};

use super::ConfigArgs;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Database file; defaults to the configured `sqlite.path`
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn execute(args: MigrateArgs) -> anyhow::Result<()> {
    let path = match args.db {
        Some(path) => path,
        None => args.config.load()?.sqlite.path,
    };

    let mut conn = db::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let ran = migrations::apply_migrations(&mut conn)?;
    let total = migrations::applied_migrations(&conn)?.len();

    println!(
        "{}: {} migration(s) applied, {} new",
        path.display(),
        total,
        ran.len()
    );
    for id in ran {
        println!("  + {}", id);
    }
    Ok(())
}
