// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

pub const DEFAULT_FAUCET_CONFIG_PATH: &str = "data/faucet/config.toml";
pub const DEFAULT_NETWORK: &str = "testnet";
// Native XLM on testnet, which the faucet cannot mint
pub const EXCLUDED_CONTRACT: &str = "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC";
pub const DEFAULT_COPIED_INDICATOR: Duration = Duration::from_millis(2000);

pub const MSG_EMPTY_WALLET_ADDRESS: &str = "Please enter a wallet address";
pub const MSG_COPY_FAILED: &str = "Failed to copy address";
