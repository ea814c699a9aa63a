//   Copyright 2024 The Soroswap Development Community
//   SPDX-License-Identifier: BSD-3-Clause

use httpmock::prelude::*;
use serde_json::json;
use soroswap_faucet_client::{FaucetClient, FaucetClientError};

const WALLET: &str = "GBZXN7PIRZGNMHGA7MUUUF4GWPY5AYPV6LY4UV2GL6VJGIQRXFDNMADI";
const USDC: &str = "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75";

#[tokio::test]
async fn it_posts_the_mint_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/faucet")
                .query_param("address", WALLET)
                .query_param("contract", USDC)
                .header("content-type", "application/json");
            then.status(200).json_body(json!({ "status": "ok" }));
        })
        .await;

    let client = FaucetClient::connect(server.base_url()).unwrap();
    let resp = client.mint(WALLET, USDC).await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp, json!({ "status": "ok" }));
}

#[tokio::test]
async fn it_fails_on_server_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/faucet");
            then.status(500).body("boom");
        })
        .await;

    let client = FaucetClient::connect(server.base_url()).unwrap();
    let err = client.mint(WALLET, USDC).await.unwrap_err();

    mock.assert_hits_async(1).await;
    match err {
        FaucetClientError::RequestFailedWithStatus { status, reason } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(reason, "Internal Server Error");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn it_fails_on_non_json_success_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/faucet");
            then.status(200).body("minted");
        })
        .await;

    let client = FaucetClient::connect(server.base_url()).unwrap();
    let err = client.mint(WALLET, USDC).await.unwrap_err();
    assert!(matches!(err, FaucetClientError::DeserializeResponse { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn it_fails_when_the_faucet_is_unreachable() {
    // Nothing listens on port 9 (discard) on a test machine
    let client = FaucetClient::connect("http://127.0.0.1:9").unwrap();
    let err = client.mint(WALLET, USDC).await.unwrap_err();
    assert!(matches!(err, FaucetClientError::RequestFailed { .. }));
}
