// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{io, path::PathBuf};

use soroswap_faucet_client::FaucetClientError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read token list at {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },
    #[error("Invalid token list: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("Please enter a wallet address")]
    EmptyWalletAddress,
    #[error("Unknown token '{0}'")]
    UnknownToken(String),
    #[error("{code} is already being minted")]
    AlreadyInFlight { code: String },
    #[error("Failed to mint {code}")]
    RequestFailed {
        code: String,
        #[source]
        source: FaucetClientError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard utility found (tried {tried})")]
    Unavailable { tried: String },
    #[error("Clipboard utility {program} exited with {status}")]
    CommandFailed { program: String, status: String },
    #[error("Clipboard I/O error: {0}")]
    Io(#[from] io::Error),
}
