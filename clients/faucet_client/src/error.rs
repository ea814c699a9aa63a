//   Copyright 2024 The Soroswap Development Community
//   SPDX-License-Identifier: BSD-3-Clause

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FaucetClientError {
    #[error("Failed to send request: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },
    #[error("Failed to mint token: {reason} (status {status})")]
    RequestFailedWithStatus { status: StatusCode, reason: String },
    #[error("Failed to deserialize faucet response: {source}")]
    DeserializeResponse { source: reqwest::Error },
    #[error("Invalid faucet endpoint: {source}")]
    InvalidEndpoint {
        #[from]
        source: url::ParseError,
    },
}

impl FaucetClientError {
    /// The HTTP status returned by the faucet, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailedWithStatus { status, .. } => Some(*status),
            Self::RequestFailed { source } => source.status(),
            _ => None,
        }
    }
}
