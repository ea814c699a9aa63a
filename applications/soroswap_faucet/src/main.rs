// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::bail;

use crate::{
    cli::{Cli, Commands},
    command::{build_session, handle_copy, handle_init, handle_list, handle_mint},
    config::read_config_file,
    logger::init_logger,
    shell::run_shell,
};

mod catalog;
mod cli;
mod clipboard;
mod command;
mod config;
mod constants;
mod error;
mod helpers;
mod logger;
mod session;
mod shell;
mod shutdown;
mod table;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::init();
    init_logger(cli.common.log_level)?;

    if let Err(err) = handle_command(cli).await {
        eprintln!("👮 Command failed with error \"{}\"", err);
        return Err(err);
    }

    Ok(())
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.get_config_path();
    if let Commands::Init = cli.command {
        return handle_init(&config_path, &cli.common.overrides).await;
    }

    let mut config = read_config_file(&config_path).await?;
    // optionally override config values
    cli.common.overrides.apply(&mut config);
    if let Some(conf) = config.missing_conf() {
        bail!("Missing configuration values: {:?}", conf);
    }

    let session = build_session(&config).await?;
    match cli.command {
        Commands::Init => {},
        Commands::List => handle_list(&session)?,
        Commands::Mint(args) => handle_mint(&session, args).await?,
        Commands::Copy(args) => handle_copy(&session, args).await?,
        Commands::Shell(args) => {
            if let Some(address) = args.address {
                session.set_wallet_address(address);
            }
            run_shell(session).await?;
        },
    }

    Ok(())
}
