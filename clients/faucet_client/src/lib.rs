//   Copyright 2024 The Soroswap Development Community
//   SPDX-License-Identifier: BSD-3-Clause

//! HTTP client for the Soroswap faucet API.
//!
//! The faucet mints testnet tokens to a wallet address. A mint is a single `POST` to
//! `/api/faucet?address=<wallet>&contract=<token contract>` with no request body.

pub mod error;

use log::*;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    IntoUrl,
    Url,
};
use serde_json::Value;

pub use crate::error::FaucetClientError;

const LOG_TARGET: &str = "soroswap::faucet::client";

pub const DEFAULT_FAUCET_ENDPOINT: &str = "https://api.soroswap.finance";
const FAUCET_PATH: &str = "/api/faucet";

#[derive(Debug, Clone)]
pub struct FaucetClient {
    client: reqwest::Client,
    faucet_url: Url,
}

impl FaucetClient {
    pub fn connect<T: IntoUrl>(endpoint: T) -> Result<Self, FaucetClientError> {
        let client = reqwest::Client::builder()
            .default_headers({
                let mut headers = HeaderMap::with_capacity(1);
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers
            })
            .build()?;

        let faucet_url = endpoint.into_url()?.join(FAUCET_PATH)?;

        Ok(Self { client, faucet_url })
    }

    pub fn faucet_url(&self) -> &Url {
        &self.faucet_url
    }

    pub fn mint_url(&self, address: &str, contract: &str) -> Url {
        let mut url = self.faucet_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("contract", contract);
        url
    }

    /// Requests the faucet to mint `contract` tokens to `address`.
    ///
    /// Any 2xx status is a success. The JSON body is returned as-is.
    pub async fn mint(&self, address: &str, contract: &str) -> Result<Value, FaucetClientError> {
        let url = self.mint_url(address, contract);
        debug!(target: LOG_TARGET, "POST {}", url);

        let resp = self.client.post(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FaucetClientError::RequestFailedWithStatus {
                status,
                reason: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }

        resp.json()
            .await
            .map_err(|source| FaucetClientError::DeserializeResponse { source })
    }
}
