//! Stratum CLI - versioned schema migrations for a catalog plus tenant databases

use clap::Parser;
use std::process::exit;

mod cli;
mod commands;
mod units;

use cli::Cli;
use commands::common::ExitCode;
use commands::{apply, ls, reconcile, revert, status};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Apply(args) => apply::execute(args, &cli.global).await,
        cli::Commands::Revert(args) => revert::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Reconcile(args) => reconcile::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
    };

    if let Err(e) = result {
        if let Some(ExitCode(code)) = e.downcast_ref::<ExitCode>() {
            exit(*code);
        }
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}
