// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use futures::future;
use log::*;
use serde_json::Value;
use soroswap_faucet_client::FaucetClient;
use tokio::fs;

use crate::{
    catalog::TokenCatalog,
    cli::{CopyArgs, MintArgs, Overrides},
    clipboard::SystemClipboard,
    config::Config,
    error::MintError,
    helpers::truncate_address,
    session::{FaucetSession, Message, TokenRow},
    table::Table,
    table_row,
};

const LOG_TARGET: &str = "soroswap::faucet::command";

pub async fn build_session(config: &Config) -> anyhow::Result<FaucetSession> {
    let catalog = match &config.tokens_file {
        Some(path) => TokenCatalog::from_file(path, &config.network, config.excluded_contracts.as_slice()).await?,
        None => TokenCatalog::bundled(&config.network, config.excluded_contracts.as_slice())?,
    };
    if catalog.is_empty() {
        warn!(target: LOG_TARGET, "{}", no_tokens_message(&config.network));
    } else {
        info!(target: LOG_TARGET, "Offering {} token(s) on {}", catalog.len(), config.network);
    }

    let client = FaucetClient::connect(config.faucet_url.clone())
        .with_context(|| format!("Invalid faucet URL '{}'", config.faucet_url))?;
    info!(target: LOG_TARGET, "🌍️ Using faucet at {}", client.faucet_url());

    Ok(FaucetSession::new(
        client,
        SystemClipboard,
        catalog,
        config.copied_indicator,
    ))
}

pub async fn handle_init(config_path: &Path, overrides: &Overrides) -> anyhow::Result<()> {
    if fs::metadata(config_path).await.is_ok() {
        bail!("Config file already exists at {}", config_path.display());
    }
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut config = Config::default();
    overrides.apply(&mut config);

    let file = fs::File::create(config_path)
        .await
        .with_context(|| anyhow!("Failed to open config path {}", config_path.display()))?;
    config.write(file).await.context("Writing config failed")?;

    info!(target: LOG_TARGET, "Config file created at {}", config_path.display());
    Ok(())
}

/// Shown when the selected network has no mintable tokens. The bundled list only carries the native asset, so a
/// real token list has to be configured.
pub fn no_tokens_message(network: &str) -> String {
    format!(
        "No tokens available on {}. Point `tokens_file` in the config (or --tokens-file) at a Soroswap token list",
        network
    )
}

pub fn token_table(rows: &[TokenRow<'_>], with_mint_state: bool) -> Table<'static> {
    let mut table = Table::new();
    if with_mint_state {
        table.set_titles(vec!["Code", "Name", "Contract", "Decimals", "Issuer", ""]);
    } else {
        table.set_titles(vec!["Code", "Name", "Contract", "Decimals", "Issuer"]);
    }
    for row in rows {
        let token = row.token;
        let issuer = token
            .issuer
            .as_deref()
            .map(truncate_address)
            .unwrap_or_else(|| "-".to_string());
        let mut cells = table_row![token.code, token.name, row.contract_label(), token.decimals, issuer];
        if with_mint_state {
            cells.push(row.mint_label().to_string());
        }
        table.add_row(cells);
    }
    table
}

pub fn handle_list(session: &FaucetSession) -> anyhow::Result<()> {
    let rows = session.rows();
    if rows.is_empty() {
        println!("{}", no_tokens_message(session.catalog().network()));
        return Ok(());
    }
    token_table(&rows, false).print_stdout()?;
    Ok(())
}

/// The message shown to the user for the outcome of minting `query`.
pub fn outcome_message(session: &FaucetSession, query: &str, result: &Result<Value, MintError>) -> Message {
    match result {
        Ok(resp) => {
            debug!(target: LOG_TARGET, "Faucet response: {}", resp);
            let code = session.catalog().find(query).map(|t| t.code.as_str()).unwrap_or(query);
            Message::success(format!("Successfully minted {}!", code))
        },
        Err(err) => Message::error(err.to_string()),
    }
}

pub async fn handle_mint(session: &FaucetSession, args: MintArgs) -> anyhow::Result<()> {
    if session.catalog().is_empty() {
        bail!(no_tokens_message(session.catalog().network()));
    }
    session.set_wallet_address(args.address);

    let results = future::join_all(args.tokens.iter().map(|query| session.mint_by_query(query))).await;

    let mut num_failed = 0;
    for (query, result) in args.tokens.iter().zip(&results) {
        let message = outcome_message(session, query, result);
        if message.is_error() {
            num_failed += 1;
        }
        println!("{}", message);
    }

    if num_failed > 0 {
        bail!("{} of {} mint(s) failed", num_failed, results.len());
    }
    Ok(())
}

pub async fn handle_copy(session: &FaucetSession, args: CopyArgs) -> anyhow::Result<()> {
    let token = session
        .catalog()
        .find(&args.token)
        .ok_or_else(|| anyhow!("Unknown token '{}'", args.token))?;

    match session.copy_address(&token.contract).await {
        Ok(()) => {
            println!("✓ Copied! {} ({})", token.contract, token.code);
            Ok(())
        },
        Err(err) => {
            if let Some(message) = session.message() {
                println!("{}", message);
            }
            Err(err.into())
        },
    }
}
