// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    fmt::{self, Display},
    sync::{Arc, Mutex},
    time::Duration,
};

use dashmap::{mapref::entry::Entry, DashMap};
use log::*;
use serde_json::Value;
use soroswap_faucet_client::FaucetClient;
use tokio::{task::JoinHandle, time::sleep};

use crate::{
    catalog::{Token, TokenCatalog},
    clipboard::Clipboard,
    constants::{MSG_COPY_FAILED, MSG_EMPTY_WALLET_ADDRESS},
    error::{ClipboardError, MintError},
    helpers::{lock, truncate_address},
};

const LOG_TARGET: &str = "soroswap::faucet::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// The outcome of the last user action. Replaced by the next one, never cleared on a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success<S: Into<String>>(text: S) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MessageKind::Success => write!(f, "✅ {}", self.text),
            MessageKind::Error => write!(f, "❌ {}", self.text),
        }
    }
}

/// Mint state of a single token row.
///
/// ```text
/// Idle -> Validating -> Minting -> Succeeded -> Idle
///              |            `----> Failed ----^
///              `-----------------> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintPhase {
    Idle,
    Validating,
    Minting,
    Succeeded,
    Failed,
}

impl MintPhase {
    pub fn can_transition_to(self, next: MintPhase) -> bool {
        use MintPhase::*;
        match self {
            Idle => next == Validating,
            Validating => matches!(next, Minting | Failed),
            Minting => matches!(next, Succeeded | Failed),
            Succeeded | Failed => next == Idle,
        }
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, MintPhase::Validating | MintPhase::Minting)
    }
}

impl Display for MintPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A catalog token together with its current view state.
#[derive(Debug, Clone)]
pub struct TokenRow<'a> {
    pub token: &'a Token,
    pub phase: MintPhase,
    pub copied: bool,
}

impl TokenRow<'_> {
    pub fn is_mint_enabled(&self) -> bool {
        !self.phase.is_in_flight()
    }

    pub fn mint_label(&self) -> &'static str {
        if self.is_mint_enabled() {
            "Mint"
        } else {
            "Minting..."
        }
    }

    pub fn contract_label(&self) -> String {
        if self.copied {
            "✓ Copied!".to_string()
        } else {
            truncate_address(&self.token.contract)
        }
    }
}

#[derive(Debug, Default)]
struct CopiedState {
    contract: Option<String>,
    generation: u64,
    pending_clear: Option<JoinHandle<()>>,
}

struct SessionState {
    client: FaucetClient,
    clipboard: Box<dyn Clipboard>,
    catalog: TokenCatalog,
    copied_indicator: Duration,
    wallet_address: Mutex<String>,
    phases: DashMap<String, MintPhase>,
    message: Mutex<Option<Message>>,
    copied: Mutex<CopiedState>,
}

/// Client-side state of the faucet: the wallet address, per-token mint state, the last outcome message and the
/// "copied" indicator. Cloning gives another handle to the same session.
#[derive(Clone)]
pub struct FaucetSession {
    inner: Arc<SessionState>,
}

impl FaucetSession {
    pub fn new<C: Clipboard + 'static>(
        client: FaucetClient,
        clipboard: C,
        catalog: TokenCatalog,
        copied_indicator: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SessionState {
                client,
                clipboard: Box::new(clipboard),
                catalog,
                copied_indicator,
                wallet_address: Mutex::new(String::new()),
                phases: DashMap::new(),
                message: Mutex::new(None),
                copied: Mutex::new(CopiedState::default()),
            }),
        }
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.inner.catalog
    }

    pub fn wallet_address(&self) -> String {
        lock(&self.inner.wallet_address).clone()
    }

    pub fn set_wallet_address<S: Into<String>>(&self, address: S) {
        *lock(&self.inner.wallet_address) = address.into();
    }

    pub fn message(&self) -> Option<Message> {
        lock(&self.inner.message).clone()
    }

    fn set_message(&self, message: Option<Message>) {
        *lock(&self.inner.message) = message;
    }

    pub fn phase(&self, contract: &str) -> MintPhase {
        self.inner
            .phases
            .get(contract)
            .map(|p| *p)
            .unwrap_or(MintPhase::Idle)
    }

    /// Contracts with a mint request currently in flight
    pub fn in_flight(&self) -> Vec<String> {
        self.inner
            .phases
            .iter()
            .filter(|p| p.value().is_in_flight())
            .map(|p| p.key().clone())
            .collect()
    }

    pub fn copied_contract(&self) -> Option<String> {
        lock(&self.inner.copied).contract.clone()
    }

    pub fn rows(&self) -> Vec<TokenRow<'_>> {
        let copied = self.copied_contract();
        self.inner
            .catalog
            .tokens()
            .iter()
            .map(|token| TokenRow {
                token,
                phase: self.phase(&token.contract),
                copied: copied.as_deref() == Some(token.contract.as_str()),
            })
            .collect()
    }

    /// Mints the catalog token matching `query` (a contract id or ticker code).
    pub async fn mint_by_query(&self, query: &str) -> Result<Value, MintError> {
        let token = self
            .inner
            .catalog
            .find(query)
            .cloned()
            .ok_or_else(|| MintError::UnknownToken(query.to_string()))?;
        self.mint(&token).await
    }

    /// Requests the faucet to mint `token` to the session's wallet address.
    ///
    /// Only one mint per contract can be in flight. Mints of different contracts run independently.
    pub async fn mint(&self, token: &Token) -> Result<Value, MintError> {
        let guard = self.begin_mint(token)?;
        let address = self.wallet_address().trim().to_string();
        if address.is_empty() {
            guard.advance(MintPhase::Failed);
            self.set_message(Some(Message::error(MSG_EMPTY_WALLET_ADDRESS)));
            return Err(MintError::EmptyWalletAddress);
        }

        guard.advance(MintPhase::Minting);
        self.set_message(None);

        info!(target: LOG_TARGET, "Minting {} ({}) to {}", token.code, token.contract, address);
        match self.inner.client.mint(&address, &token.contract).await {
            Ok(resp) => {
                guard.advance(MintPhase::Succeeded);
                info!(target: LOG_TARGET, "Minted {} to {}", token.code, address);
                self.set_message(Some(Message::success(format!("Successfully minted {}!", token.code))));
                Ok(resp)
            },
            Err(source) => {
                guard.advance(MintPhase::Failed);
                error!(target: LOG_TARGET, "Mint error: {}", source);
                self.set_message(Some(Message::error(format!("Failed to mint {}", token.code))));
                Err(MintError::RequestFailed {
                    code: token.code.clone(),
                    source,
                })
            },
        }
    }

    fn begin_mint(&self, token: &Token) -> Result<InFlightGuard<'_>, MintError> {
        match self.inner.phases.entry(token.contract.clone()) {
            // An attempt that has just completed still holds its entry until the guard drops
            Entry::Occupied(_) => {
                warn!(target: LOG_TARGET, "{} is already being minted", token.code);
                Err(MintError::AlreadyInFlight {
                    code: token.code.clone(),
                })
            },
            Entry::Vacant(entry) => {
                debug!(target: LOG_TARGET, "{}: {} -> {}", token.contract, MintPhase::Idle, MintPhase::Validating);
                entry.insert(MintPhase::Validating);
                Ok(InFlightGuard::new(&self.inner.phases, &token.contract))
            },
        }
    }

    /// Copies `contract` to the clipboard and shows the "copied" indicator for the configured window.
    pub async fn copy_address(&self, contract: &str) -> Result<(), ClipboardError> {
        match self.inner.clipboard.write_text(contract).await {
            Ok(()) => {
                self.mark_copied(contract);
                Ok(())
            },
            Err(err) => {
                error!(target: LOG_TARGET, "Failed to copy address: {}", err);
                self.set_message(Some(Message::error(MSG_COPY_FAILED)));
                Err(err)
            },
        }
    }

    fn mark_copied(&self, contract: &str) {
        let mut copied = lock(&self.inner.copied);
        copied.generation += 1;
        copied.contract = Some(contract.to_string());
        // A newer copy supersedes the pending clear of the previous one
        if let Some(pending) = copied.pending_clear.take() {
            pending.abort();
        }

        let generation = copied.generation;
        let window = self.inner.copied_indicator;
        let session = self.clone();
        copied.pending_clear = Some(tokio::spawn(async move {
            sleep(window).await;
            session.clear_copied(generation);
        }));
    }

    fn clear_copied(&self, generation: u64) {
        let mut copied = lock(&self.inner.copied);
        if copied.generation == generation {
            copied.contract = None;
            copied.pending_clear = None;
        }
    }
}

/// Marks a contract as in flight. The mark is removed when the guard is dropped, on every exit path.
struct InFlightGuard<'a> {
    phases: &'a DashMap<String, MintPhase>,
    contract: String,
}

impl<'a> InFlightGuard<'a> {
    fn new(phases: &'a DashMap<String, MintPhase>, contract: &str) -> Self {
        Self {
            phases,
            contract: contract.to_string(),
        }
    }

    fn advance(&self, next: MintPhase) {
        if let Some(mut phase) = self.phases.get_mut(&self.contract) {
            debug!(target: LOG_TARGET, "{}: {} -> {}", self.contract, *phase, next);
            debug_assert!(phase.can_transition_to(next), "invalid transition {} -> {}", *phase, next);
            *phase = next;
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some((_, phase)) = self.phases.remove(&self.contract) {
            debug!(target: LOG_TARGET, "{}: {} -> {}", self.contract, phase, MintPhase::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{
        catalog::NetworkTokens,
        clipboard::MemoryClipboard,
        constants::{DEFAULT_COPIED_INDICATOR, DEFAULT_NETWORK, EXCLUDED_CONTRACT},
    };

    const WALLET: &str = "GABCDEFGHIJKLMNOPQRSTUVWXYZ234567ABCDEFGHIJKLMNOPQRSTUVW";
    const USDC: &str = "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75";
    const EURC: &str = "CCUUDM434BMZMYWYDITHFXHDMIVTGGD6T2I5UKNX5BSLXLW7HVR4MCGZ";

    struct FailingClipboard;

    #[async_trait::async_trait]
    impl Clipboard for FailingClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable {
                tried: "nothing".to_string(),
            })
        }
    }

    fn catalog() -> TokenCatalog {
        let token = |code: &str, contract: &str| Token {
            name: code.to_string(),
            contract: contract.to_string(),
            code: code.to_string(),
            icon: String::new(),
            decimals: 7,
            issuer: None,
        };
        TokenCatalog::from_dataset(
            &[NetworkTokens {
                network: DEFAULT_NETWORK.to_string(),
                assets: vec![token("USDC", USDC), token("EURC", EURC)],
            }],
            DEFAULT_NETWORK,
            &[EXCLUDED_CONTRACT],
        )
    }

    fn session_with<C: Clipboard + 'static>(endpoint: &str, clipboard: C) -> FaucetSession {
        let client = FaucetClient::connect(endpoint).unwrap();
        FaucetSession::new(client, clipboard, catalog(), DEFAULT_COPIED_INDICATOR)
    }

    fn session(server: &MockServer) -> FaucetSession {
        session_with(&server.base_url(), MemoryClipboard::new())
    }

    fn usdc(session: &FaucetSession) -> Token {
        session.catalog().find("USDC").unwrap().clone()
    }

    #[test]
    fn phase_transitions_are_exhaustive() {
        use MintPhase::*;
        let all = [Idle, Validating, Minting, Succeeded, Failed];
        let allowed = [
            (Idle, Validating),
            (Validating, Minting),
            (Validating, Failed),
            (Minting, Succeeded),
            (Minting, Failed),
            (Succeeded, Idle),
            (Failed, Idle),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[tokio::test]
    async fn it_walks_the_mint_phases() {
        let server = MockServer::start_async().await;
        let session = session(&server);
        let token = usdc(&session);

        let guard = session.begin_mint(&token).unwrap();
        assert_eq!(session.phase(USDC), MintPhase::Validating);
        assert_eq!(session.in_flight(), [USDC]);
        assert!(matches!(
            session.begin_mint(&token),
            Err(MintError::AlreadyInFlight { ref code }) if code == "USDC"
        ));

        guard.advance(MintPhase::Minting);
        assert_eq!(session.phase(USDC), MintPhase::Minting);
        guard.advance(MintPhase::Succeeded);
        assert_eq!(session.phase(USDC), MintPhase::Succeeded);
        assert!(!session.rows()[0].phase.is_in_flight());

        drop(guard);
        assert_eq!(session.phase(USDC), MintPhase::Idle);
        assert!(session.in_flight().is_empty());
    }

    #[tokio::test]
    async fn it_mints_successfully() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/faucet")
                    .query_param("address", WALLET)
                    .query_param("contract", USDC);
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(WALLET);
        let token = usdc(&session);
        session.mint(&token).await.unwrap();

        mock.assert_hits_async(1).await;
        assert_eq!(session.message(), Some(Message::success("Successfully minted USDC!")));
        assert!(!session.phase(USDC).is_in_flight());
        assert!(session.rows()[0].is_mint_enabled());
    }

    #[tokio::test]
    async fn it_rejects_empty_wallet_addresses_without_a_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet");
                then.status(200).json_body(json!({}));
            })
            .await;

        let session = session(&server);
        let token = usdc(&session);
        for address in ["", " ", "\t\n  "] {
            session.set_wallet_address(address);
            let err = session.mint(&token).await.unwrap_err();
            assert!(matches!(err, MintError::EmptyWalletAddress));
            assert_eq!(session.message(), Some(Message::error("Please enter a wallet address")));
            assert!(session.in_flight().is_empty());
        }

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn it_trims_the_wallet_address() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet").query_param("address", WALLET);
                then.status(200).json_body(json!({}));
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(format!("  {}\n", WALLET));
        session.mint_by_query("usdc").await.unwrap();
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn it_reports_server_errors_and_becomes_idle() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet");
                then.status(500);
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(WALLET);
        let err = session.mint_by_query(EURC).await.unwrap_err();

        mock.assert_hits_async(1).await;
        assert!(matches!(err, MintError::RequestFailed { ref code, .. } if code == "EURC"));
        assert_eq!(err.to_string(), "Failed to mint EURC");
        assert_eq!(session.message(), Some(Message::error("Failed to mint EURC")));
        assert_eq!(session.phase(EURC), MintPhase::Idle);
        assert!(session.rows().iter().all(|r| r.is_mint_enabled()));
    }

    #[tokio::test]
    async fn it_reports_transport_errors_and_becomes_idle() {
        let session = session_with("http://127.0.0.1:9", MemoryClipboard::new());
        session.set_wallet_address(WALLET);
        let err = session.mint_by_query("USDC").await.unwrap_err();

        assert!(matches!(err, MintError::RequestFailed { .. }));
        assert_eq!(session.message(), Some(Message::error("Failed to mint USDC")));
        assert!(!session.phase(USDC).is_in_flight());
    }

    #[tokio::test]
    async fn it_rejects_unknown_tokens() {
        let server = MockServer::start_async().await;
        let session = session(&server);
        session.set_wallet_address(WALLET);
        let err = session.mint_by_query("DOGE").await.unwrap_err();
        assert!(matches!(err, MintError::UnknownToken(_)));
        assert_eq!(session.message(), None);
    }

    #[tokio::test]
    async fn it_marks_the_token_in_flight_while_minting() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet");
                then.status(200)
                    .json_body(json!({}))
                    .delay(Duration::from_millis(300));
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(WALLET);
        session.set_message(Some(Message::error("stale")));

        let task = tokio::spawn({
            let session = session.clone();
            async move { session.mint_by_query("USDC").await }
        });

        // Wait for the request to be in flight
        while !session.phase(USDC).is_in_flight() {
            tokio::task::yield_now().await;
        }
        assert_eq!(session.message(), None);
        let row = session.rows().into_iter().find(|r| r.token.contract == USDC).unwrap();
        assert!(!row.is_mint_enabled());
        assert_eq!(row.mint_label(), "Minting...");

        // The same token cannot be minted twice concurrently
        let err = session.mint_by_query("USDC").await.unwrap_err();
        assert!(matches!(err, MintError::AlreadyInFlight { .. }));

        task.await.unwrap().unwrap();
        mock.assert_hits_async(1).await;
        assert!(session.in_flight().is_empty());
        assert_eq!(session.rows()[0].mint_label(), "Mint");
    }

    #[tokio::test]
    async fn it_mints_distinct_tokens_concurrently() {
        let server = MockServer::start_async().await;
        let usdc_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet").query_param("contract", USDC);
                then.status(200).json_body(json!({})).delay(Duration::from_millis(100));
            })
            .await;
        let eurc_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet").query_param("contract", EURC);
                then.status(502);
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(WALLET);
        let (usdc, eurc) = tokio::join!(session.mint_by_query("USDC"), session.mint_by_query("EURC"));

        assert!(usdc.is_ok());
        assert!(eurc.is_err());
        usdc_mock.assert_hits_async(1).await;
        eurc_mock.assert_hits_async(1).await;
        assert!(session.in_flight().is_empty());
    }

    #[tokio::test]
    async fn it_clears_the_in_flight_mark_when_cancelled() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/faucet");
                then.status(200).json_body(json!({})).delay(Duration::from_secs(5));
            })
            .await;

        let session = session(&server);
        session.set_wallet_address(WALLET);
        let task = tokio::spawn({
            let session = session.clone();
            async move { session.mint_by_query("USDC").await }
        });
        while !session.phase(USDC).is_in_flight() {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;
        assert!(!session.phase(USDC).is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn copied_indicator_clears_after_the_window() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let session = session_with("http://127.0.0.1:9", clipboard.clone());

        session.copy_address(USDC).await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some(USDC));
        assert_eq!(session.copied_contract().as_deref(), Some(USDC));
        assert_eq!(session.rows()[0].contract_label(), "✓ Copied!");
        assert_eq!(session.rows()[1].contract_label(), "CCUUDM...R4MCGZ");

        sleep(Duration::from_millis(1999)).await;
        assert_eq!(session.copied_contract().as_deref(), Some(USDC));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(session.copied_contract(), None);
        assert_eq!(session.rows()[0].contract_label(), "CCW67T...SJMI75");
    }

    #[tokio::test(start_paused = true)]
    async fn a_newer_copy_supersedes_the_pending_clear() {
        let session = session_with("http://127.0.0.1:9", MemoryClipboard::new());

        session.copy_address(USDC).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        session.copy_address(EURC).await.unwrap();

        // The first clear would have fired here
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(session.copied_contract().as_deref(), Some(EURC));

        sleep(Duration::from_millis(1001)).await;
        assert_eq!(session.copied_contract(), None);
    }

    #[tokio::test]
    async fn copy_failures_set_a_generic_message() {
        let session = session_with("http://127.0.0.1:9", FailingClipboard);
        let err = session.copy_address(USDC).await.unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable { .. }));
        assert_eq!(session.message(), Some(Message::error("Failed to copy address")));
        assert_eq!(session.copied_contract(), None);
    }
}
