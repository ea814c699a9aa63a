// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use soroswap_faucet_client::DEFAULT_FAUCET_ENDPOINT;
use tokio::{
    fs,
    io::{self, AsyncWriteExt},
};
use url::Url;

use crate::constants::{DEFAULT_COPIED_INDICATOR, DEFAULT_NETWORK, EXCLUDED_CONTRACT};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// The faucet API base URL, must contain the protocol
    pub faucet_url: Url,

    /// The network whose tokens are offered
    pub network: String,

    /// Token contracts that are never offered, e.g. the native asset
    pub excluded_contracts: Vec<String>,

    /// A token list to use instead of the bundled one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_file: Option<PathBuf>,

    /// How long a copied contract is flagged as copied
    #[serde(with = "humantime_serde")]
    pub copied_indicator: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            faucet_url: Url::parse(DEFAULT_FAUCET_ENDPOINT).expect("default faucet endpoint is a valid URL"),
            network: DEFAULT_NETWORK.to_string(),
            excluded_contracts: vec![EXCLUDED_CONTRACT.to_string()],
            tokens_file: None,
            copied_indicator: DEFAULT_COPIED_INDICATOR,
        }
    }
}

impl Config {
    pub(crate) async fn write<W: io::AsyncWrite + Unpin>(&self, mut writer: W) -> anyhow::Result<()> {
        let toml = toml::to_string_pretty(self)?;
        writer.write_all(toml.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    pub fn missing_conf(&self) -> Option<Vec<&str>> {
        let mut v: Vec<&str> = Vec::new();
        if self.network.is_empty() {
            v.push("network");
        }
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }
}

/// Reads the config file at `path`. A missing file yields the default config.
pub async fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        },
        Err(e) => return Err(e).with_context(|| format!("Failed to read config file at {}", path.display())),
    };

    let config =
        toml::from_str(&content).with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}
