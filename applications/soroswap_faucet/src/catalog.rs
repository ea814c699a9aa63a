// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::CatalogError;

const LOG_TARGET: &str = "soroswap::faucet::catalog";

const BUNDLED_TOKENS: &str = include_str!("../assets/tokens.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    /// The token contract id. Unique within a network.
    pub contract: String,
    /// Ticker symbol
    pub code: String,
    #[serde(default)]
    pub icon: String,
    pub decimals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkTokens {
    pub network: String,
    pub assets: Vec<Token>,
}

/// Returns the assets of the first `network` entry in `dataset`, in order, without any asset whose contract is in
/// `excluded`. A missing network yields an empty list.
pub fn select_network_tokens<S: AsRef<str>>(dataset: &[NetworkTokens], network: &str, excluded: &[S]) -> Vec<Token> {
    let Some(entry) = dataset.iter().find(|n| n.network == network) else {
        warn!(target: LOG_TARGET, "Network '{}' not found in token list", network);
        return Vec::new();
    };

    entry
        .assets
        .iter()
        .filter(|token| !excluded.iter().any(|c| c.as_ref() == token.contract))
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct TokenCatalog {
    network: String,
    tokens: Vec<Token>,
}

impl TokenCatalog {
    pub fn from_dataset<S: AsRef<str>>(dataset: &[NetworkTokens], network: &str, excluded: &[S]) -> Self {
        let tokens = select_network_tokens(dataset, network, excluded);
        debug!(target: LOG_TARGET, "Loaded {} {} token(s)", tokens.len(), network);
        Self {
            network: network.to_string(),
            tokens,
        }
    }

    pub fn from_json_str<S: AsRef<str>>(json: &str, network: &str, excluded: &[S]) -> Result<Self, CatalogError> {
        let dataset: Vec<NetworkTokens> = serde_json::from_str(json)?;
        Ok(Self::from_dataset(&dataset, network, excluded))
    }

    /// Loads the token list compiled into the binary.
    pub fn bundled<S: AsRef<str>>(network: &str, excluded: &[S]) -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_TOKENS, network, excluded)
    }

    pub async fn from_file<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        network: &str,
        excluded: &[S],
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!(target: LOG_TARGET, "Reading token list from {}", path.display());
        let json = fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json, network, excluded)
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finds a token by exact contract id or by case-insensitive ticker code.
    pub fn find(&self, query: &str) -> Option<&Token> {
        let query = query.trim();
        self.tokens
            .iter()
            .find(|t| t.contract == query)
            .or_else(|| self.tokens.iter().find(|t| t.code.eq_ignore_ascii_case(query)))
    }
}
