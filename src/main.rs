use clap::{Parser, Subcommand};

use crate::cmd::accounts::AccountsCommand;
use crate::cmd::sync::SyncCommand;

mod cmd;
mod config;
mod core;
mod splitwise;
mod ynab;

/// Sync Splitwise shared expenses into a YNAB budget account
#[derive(Parser, Debug)]
#[command(name = "swynab", version, about)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch expenses from Splitwise and import your share into YNAB
    Sync(SyncCommand),

    /// List the accounts of the YNAB budget
    Accounts(AccountsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Command::Sync(cmd) => cmd.exec(),
        Command::Accounts(cmd) => cmd.exec(),
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
