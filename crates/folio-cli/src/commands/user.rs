//! Usage: folio user add --email <EMAIL> --password <PASSWORD> [--name <NAME>] [--admin]

use anyhow::Context;
use clap::{Args, Subcommand};
use folio_api::AppState;
use folio_core::model::Role;
use folio_core_types::Sensitive;
use folio_engine::commands::account;

use super::ConfigArgs;

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user account in the configured store
    Add(AddArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Give the account the admin role
    #[arg(long)]
    pub admin: bool,
}

pub async fn execute(args: UserArgs) -> anyhow::Result<()> {
    match args.command {
        UserCommand::Add(add_args) => execute_add(add_args).await,
    }
}

async fn execute_add(args: AddArgs) -> anyhow::Result<()> {
    let config = args.config.load()?;
    let state = AppState::from_config(&config).context("opening the store")?;
    let role = if args.admin { Role::Admin } else { Role::User };

    let user = account::create_user(
        &state.store,
        &args.email,
        Sensitive::new(args.password),
        args.name,
        role,
    )
    .await?;

    println!(
        "Created {} user {} (id {})",
        role,
        user.get_str("email").unwrap_or_default(),
        user.id().map(|id| id.to_string()).unwrap_or_default()
    );
    Ok(())
}
