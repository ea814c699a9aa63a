// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use url::Url;

use crate::{config::Config, constants::DEFAULT_FAUCET_CONFIG_PATH};

#[derive(Clone, Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonCli,
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.common.config_path.clone()
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct CommonCli {
    #[clap(short = 'c', long, parse(from_os_str), default_value = DEFAULT_FAUCET_CONFIG_PATH)]
    pub config_path: PathBuf,
    /// Log level (off, error, warn, info, debug, trace)
    #[clap(long, default_value = "info")]
    pub log_level: LevelFilter,
    #[clap(flatten)]
    pub overrides: Overrides,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init,
    /// List the tokens the faucet offers
    List,
    /// Mint one or more tokens to a wallet
    Mint(MintArgs),
    /// Copy a token contract address to the clipboard
    Copy(CopyArgs),
    /// Start an interactive faucet session
    Shell(ShellArgs),
}

#[derive(Clone, Debug, clap::Args)]
pub struct MintArgs {
    /// The wallet address to mint to (G...)
    #[clap(long, short = 'a')]
    pub address: String,
    /// Ticker codes or contract ids of the tokens to mint
    #[clap(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Clone, Debug, clap::Args)]
pub struct CopyArgs {
    /// Ticker code or contract id
    pub token: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct ShellArgs {
    /// Wallet address to start the session with
    #[clap(long, short = 'a')]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, clap::Args)]
pub struct Overrides {
    /// The faucet API base URL
    #[clap(long)]
    pub faucet_url: Option<Url>,
    /// The network whose tokens are offered
    #[clap(long)]
    pub network: Option<String>,
    /// A JSON token list to use instead of the bundled one
    #[clap(long, parse(from_os_str))]
    pub tokens_file: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = self.faucet_url.clone() {
            log::info!("Overriding faucet URL to {}", url);
            config.faucet_url = url;
        }
        if let Some(network) = self.network.clone() {
            log::info!("Overriding network to {}", network);
            config.network = network;
        }
        if let Some(path) = self.tokens_file.clone() {
            log::info!("Overriding token list to {}", path.display());
            config.tokens_file = Some(path);
        }
    }
}
