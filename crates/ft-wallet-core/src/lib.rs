use ft_actions::{
    FormContext, FormError, FormValues, actions_from_abi, build_transaction, normalize_fields,
    token_actions,
};
use ft_api_types::{ActionDescriptor, GetAbiResponse, TokenDescriptor, TokenStats, Transaction};
use ft_chain_client::{
    BalanceLine, RpcClient, RpcTransport, StatsCache, StatsRefresh, fetch_balances,
    fetch_token_stats,
};
use ft_session::{Session, SessionError, SessionKit, SessionSlot};
use std::cell::RefCell;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Connect a wallet before sending.")]
    NoSession,
    #[error("unknown token: {0}")]
    UnknownToken(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Abi,
    Builtin,
}

#[derive(Debug, Clone)]
pub struct ActionSet {
    pub contract: String,
    pub source: CatalogSource,
    pub actions: Vec<ActionDescriptor>,
}

impl ActionSet {
    /// Whether this set was loaded for `token`'s contract.
    pub fn is_for(&self, token: &TokenDescriptor) -> bool {
        self.contract == token.contract
    }
}

/// One form submission. `contract` is the account the action set was loaded
/// from; `token_symbol` only supplies precision and the default asset symbol.
pub struct ActionRequest<'a> {
    pub contract: &'a str,
    pub token_symbol: &'a str,
    pub action: &'a ActionDescriptor,
    pub values: &'a FormValues,
}

#[derive(Debug, Clone)]
pub struct Submitted {
    pub transaction: Transaction,
    pub transaction_id: Option<String>,
    pub short_id: String,
}

/// Shorten `id` to `len` characters around an ellipsis.
pub fn short_id(id: &str, len: usize) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= len {
        return id.to_owned();
    }
    let half = len / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

/// Everything a UI handler needs: RPC access, the token registry, the stats
/// cache and the single live wallet session.
pub struct WalletCore<T, K> {
    rpc: RpcClient<T>,
    kit: K,
    tokens: Vec<TokenDescriptor>,
    session: SessionSlot,
    stats: RefCell<StatsCache>,
}

impl<T, K> WalletCore<T, K>
where
    T: RpcTransport,
    K: SessionKit,
{
    pub fn new(rpc: RpcClient<T>, kit: K, tokens: Vec<TokenDescriptor>) -> Self {
        Self {
            rpc,
            kit,
            tokens,
            session: SessionSlot::default(),
            stats: RefCell::new(StatsCache::default()),
        }
    }

    pub fn rpc(&self) -> &RpcClient<T> {
        &self.rpc
    }

    pub fn kit(&self) -> &K {
        &self.kit
    }

    pub fn tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }

    pub fn token(&self, symbol: &str) -> Option<&TokenDescriptor> {
        self.tokens.iter().find(|token| token.symbol == symbol)
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn stats(&self, symbol: &str) -> Option<TokenStats> {
        self.stats.borrow().get(symbol).cloned()
    }

    pub fn precision(&self, symbol: &str) -> u8 {
        self.stats.borrow().precision(symbol)
    }

    pub async fn refresh_stats(&self) -> StatsRefresh {
        let fetched = fetch_token_stats(&self.rpc, &self.tokens).await;
        let refresh = self.stats.borrow_mut().apply(fetched);
        for (symbol, err) in &refresh.failed {
            warn!(%symbol, error = %err, "token stats unavailable");
        }
        refresh
    }

    pub async fn connect(&self) -> Result<Session, SessionError> {
        let session = self.kit.login().await?;
        info!(actor = %session.actor, chain = %session.chain_id, "wallet connected");
        self.session.replace(session.clone());
        Ok(session)
    }

    /// Drop the live session. Adapter logout failures are logged only.
    pub async fn disconnect(&self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Err(err) = self.kit.logout(&session).await {
            warn!(actor = %session.actor, error = %err, "wallet logout failed");
        }
        info!(actor = %session.actor, "wallet disconnected");
    }

    pub async fn restore(&self) -> Option<Session> {
        match self.kit.restore().await {
            Ok(Some(session)) => {
                info!(
                    actor = %session.actor,
                    chain = %session.chain_id,
                    "wallet session restored"
                );
                self.session.replace(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(error = %err, "no prior session to restore");
                None
            }
        }
    }

    pub async fn balances(&self, account: &str) -> Vec<BalanceLine> {
        let stats = self.stats.borrow().clone();
        fetch_balances(&self.rpc, account, &self.tokens, &stats).await
    }

    /// Balances of the connected account.
    pub async fn own_balances(&self) -> Result<Vec<BalanceLine>, SessionError> {
        let actor = self.session.actor().ok_or(SessionError::NotConnected)?;
        Ok(self.balances(&actor).await)
    }

    /// Actions from the contract's ABI, or the built-in token catalog when the
    /// ABI is unavailable or describes nothing usable.
    pub async fn actions_for(&self, contract: &str) -> ActionSet {
        match self.rpc.get_abi(contract).await {
            Ok(GetAbiResponse { abi: Some(abi), .. }) => {
                let actions = actions_from_abi(&abi);
                if !actions.is_empty() {
                    return ActionSet {
                        contract: contract.to_owned(),
                        source: CatalogSource::Abi,
                        actions,
                    };
                }
                debug!(%contract, "ABI has no supported actions");
            }
            Ok(_) => debug!(%contract, "contract publishes no ABI"),
            Err(err) => warn!(%contract, error = %err, "ABI fetch failed"),
        }

        ActionSet {
            contract: contract.to_owned(),
            source: CatalogSource::Builtin,
            actions: token_actions(),
        }
    }

    pub fn form_context(&self, token_symbol: &str) -> FormContext {
        let stats = self.stats.borrow();
        let mut ctx = FormContext::new(token_symbol, stats.precision(token_symbol))
            .with_actor(self.session.actor());
        for token in &self.tokens {
            if let Some(known) = stats.get(&token.symbol) {
                ctx = ctx.with_known_precision(&token.symbol, known.precision);
            }
        }
        ctx
    }

    /// Validate, build and sign a single-action transaction.
    ///
    /// Nothing leaves the page unless a session is live and every field
    /// normalizes.
    pub async fn submit(&self, request: ActionRequest<'_>) -> Result<Submitted, SubmitError> {
        let session = self.session.current().ok_or(SubmitError::NoSession)?;
        let token = self
            .token(request.token_symbol)
            .ok_or_else(|| SubmitError::UnknownToken(request.token_symbol.to_owned()))?;

        let ctx = self.form_context(&token.symbol);
        let data = normalize_fields(request.action, request.values, &ctx)?;
        let transaction = build_transaction(
            request.contract,
            &request.action.name,
            session.permission_level(),
            data,
        );

        let result = self.kit.transact(&session, &transaction).await?;
        let short = short_id(result.transaction_id.as_deref().unwrap_or("pending"), 10);
        info!(
            contract = %request.contract,
            action = %request.action.name,
            tx = %short,
            "transaction submitted"
        );

        Ok(Submitted {
            transaction,
            transaction_id: result.transaction_id,
            short_id: short,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ft_api_types::TransactResult;
    use ft_chain_client::TransportError;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeTransport {
        routes: HashMap<String, Value>,
        calls: Cell<usize>,
    }

    impl FakeTransport {
        fn route(mut self, url: &str, response: Value) -> Self {
            self.routes.insert(url.to_owned(), response);
            self
        }
    }

    #[async_trait(?Send)]
    impl RpcTransport for FakeTransport {
        async fn post_json(&self, url: &str, _body: &Value) -> Result<Value, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.routes.get(url).cloned().ok_or_else(|| TransportError::Status {
                url: url.to_owned(),
                status: 404,
            })
        }
    }

    struct FakeKit {
        transact_result: Result<TransactResult, SessionError>,
        logout_result: Result<(), SessionError>,
        restore_result: Result<Option<Session>, SessionError>,
        transacts: RefCell<Vec<Transaction>>,
    }

    impl Default for FakeKit {
        fn default() -> Self {
            Self {
                transact_result: Ok(TransactResult {
                    transaction_id: Some("0123456789abcdef".to_owned()),
                }),
                logout_result: Ok(()),
                restore_result: Ok(None),
                transacts: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl SessionKit for FakeKit {
        async fn login(&self) -> Result<Session, SessionError> {
            Session::new("alice", "active", "test-chain")
        }

        async fn logout(&self, _session: &Session) -> Result<(), SessionError> {
            self.logout_result.clone()
        }

        async fn restore(&self) -> Result<Option<Session>, SessionError> {
            self.restore_result.clone()
        }

        async fn transact(
            &self,
            _session: &Session,
            transaction: &Transaction,
        ) -> Result<TransactResult, SessionError> {
            self.transacts.borrow_mut().push(transaction.clone());
            self.transact_result.clone()
        }
    }

    const RPC: &str = "https://rpc.example";

    fn tokens() -> Vec<TokenDescriptor> {
        vec![TokenDescriptor {
            symbol: "WON".to_owned(),
            display_name: "WON".to_owned(),
            contract: "w3won".to_owned(),
            explorer_url: String::new(),
        }]
    }

    fn core(transport: FakeTransport, kit: FakeKit) -> WalletCore<FakeTransport, FakeKit> {
        WalletCore::new(RpcClient::new([RPC], transport), kit, tokens())
    }

    fn transfer() -> ActionDescriptor {
        token_actions().into_iter().find(|a| a.name == "transfer").unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn submit_without_session_makes_no_calls() {
        let wallet = core(FakeTransport::default(), FakeKit::default());
        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "5")]);

        let err = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await
            .expect_err("no session");

        assert!(matches!(err, SubmitError::NoSession));
        assert_eq!(wallet.rpc().transport().calls.get(), 0);
        assert!(wallet.kit().transacts.borrow().is_empty());
    }

    #[tokio::test]
    async fn blank_required_fields_block_submission() -> anyhow::Result<()> {
        let wallet = core(FakeTransport::default(), FakeKit::default());
        wallet.connect().await?;
        let action = transfer();
        let input = values(&[("memo", "gm")]);

        let err = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await
            .expect_err("missing fields");

        match err {
            SubmitError::Form(FormError::MissingFields(names)) => {
                assert_eq!(names, vec!["to".to_owned(), "quantity".to_owned()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(wallet.rpc().transport().calls.get(), 0);
        assert!(wallet.kit().transacts.borrow().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn transfer_uses_loaded_precision_and_session_permission() -> anyhow::Result<()> {
        let transport = FakeTransport::default().route(
            "https://rpc.example/v1/chain/get_currency_stats",
            json!({"WON": {
                "supply": "10.00000000 WON",
                "max_supply": "100.00000000 WON",
                "issuer": "w3won"
            }}),
        );
        let wallet = core(transport, FakeKit::default());
        wallet.refresh_stats().await;
        wallet.connect().await?;
        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "1.5"), ("memo", " thanks ")]);

        let submitted = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await?;

        assert_eq!(submitted.short_id, "01234\u{2026}bcdef");
        let sent = wallet.kit().transacts.borrow();
        let action = &sent[0].actions[0];
        assert_eq!(action.account, "w3won");
        assert_eq!(action.name, "transfer");
        assert_eq!(action.authorization[0].actor, "alice");
        assert_eq!(action.authorization[0].permission, "active");
        assert_eq!(
            action.data,
            json!({"from": "alice", "to": "bob", "quantity": "1.50000000 WON", "memo": "thanks"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn adapter_errors_surface_verbatim() -> anyhow::Result<()> {
        let kit = FakeKit {
            transact_result: Err(SessionError::adapter(
                "Transaction failed",
                Some("assertion failure with message: overdrawn balance".to_owned()),
            )),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);
        wallet.connect().await?;
        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "1")]);

        let err = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await
            .expect_err("adapter rejects");

        assert_eq!(err.to_string(), "assertion failure with message: overdrawn balance");
        Ok(())
    }

    #[tokio::test]
    async fn missing_transaction_id_reads_pending() -> anyhow::Result<()> {
        let kit = FakeKit {
            transact_result: Ok(TransactResult::default()),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);
        wallet.connect().await?;
        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "1")]);

        let submitted = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await?;

        assert_eq!(submitted.short_id, "pending");
        assert!(submitted.transaction_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn abi_failure_falls_back_to_builtin_catalog() {
        let wallet = core(FakeTransport::default(), FakeKit::default());

        let set = wallet.actions_for("w3won").await;

        assert_eq!(set.source, CatalogSource::Builtin);
        assert_eq!(set.actions, token_actions());
    }

    #[tokio::test]
    async fn abi_actions_are_preferred() {
        let transport = FakeTransport::default().route(
            "https://rpc.example/v1/chain/get_abi",
            json!({
                "account_name": "w3won",
                "abi": {
                    "structs": [{
                        "name": "setpool",
                        "base": "",
                        "fields": [{"name": "fee_bps", "type": "uint16"}]
                    }],
                    "actions": [{"name": "setpool", "type": "setpool"}]
                }
            }),
        );
        let wallet = core(transport, FakeKit::default());

        let set = wallet.actions_for("w3won").await;

        assert_eq!(set.source, CatalogSource::Abi);
        assert_eq!(set.actions.len(), 1);
        assert_eq!(set.actions[0].name, "setpool");
    }

    #[tokio::test]
    async fn disconnect_clears_session_even_if_logout_fails() -> anyhow::Result<()> {
        let kit = FakeKit {
            logout_result: Err(SessionError::adapter("storage unavailable", None)),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);
        wallet.connect().await?;

        wallet.disconnect().await;

        assert!(wallet.session().is_none());
        assert!(matches!(
            wallet.own_balances().await,
            Err(SessionError::NotConnected)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn submit_signs_against_the_action_set_contract() -> anyhow::Result<()> {
        let wallet = core(FakeTransport::default(), FakeKit::default());
        wallet.connect().await?;
        let set = wallet.actions_for("w3pool").await;
        let won = wallet.token("WON").cloned().expect("registered");
        assert!(!set.is_for(&won));

        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "1")]);
        wallet
            .submit(ActionRequest {
                contract: &set.contract,
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await?;

        let sent = wallet.kit().transacts.borrow();
        assert_eq!(sent[0].actions[0].account, "w3pool");
        Ok(())
    }

    #[tokio::test]
    async fn transact_rejection_mentioning_cancel_stays_an_adapter_error() -> anyhow::Result<()> {
        let kit = FakeKit {
            transact_result: Err(SessionError::adapter(
                "Transaction failed",
                Some("assertion failure with message: order already cancelled".to_owned()),
            )),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);
        wallet.connect().await?;
        let action = transfer();
        let input = values(&[("to", "bob"), ("quantity", "1")]);

        let err = wallet
            .submit(ActionRequest {
                contract: "w3won",
                token_symbol: "WON",
                action: &action,
                values: &input,
            })
            .await
            .expect_err("adapter rejects");

        assert!(matches!(err, SubmitError::Session(SessionError::Adapter { .. })));
        assert_eq!(err.to_string(), "assertion failure with message: order already cancelled");
        Ok(())
    }

    #[tokio::test]
    async fn restore_adopts_a_prior_session() -> anyhow::Result<()> {
        let kit = FakeKit {
            restore_result: Ok(Some(Session::new("alice", "active", "test-chain")?)),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);

        let restored = wallet.restore().await.expect("session restored");

        assert_eq!(restored.actor, "alice");
        assert_eq!(wallet.session(), Some(restored));
        Ok(())
    }

    #[tokio::test]
    async fn restore_without_prior_session_stays_disconnected() {
        let wallet = core(FakeTransport::default(), FakeKit::default());

        assert!(wallet.restore().await.is_none());
        assert!(wallet.session().is_none());
    }

    #[tokio::test]
    async fn restore_failure_stays_disconnected() {
        let kit = FakeKit {
            restore_result: Err(SessionError::adapter("storage unavailable", None)),
            ..FakeKit::default()
        };
        let wallet = core(FakeTransport::default(), kit);

        assert!(wallet.restore().await.is_none());
        assert!(wallet.session().is_none());
        assert!(matches!(
            wallet.own_balances().await,
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn short_ids_keep_both_ends() {
        assert_eq!(short_id("abc", 10), "abc");
        assert_eq!(short_id("0123456789", 10), "0123456789");
        assert_eq!(short_id("0123456789a", 10), "01234\u{2026}6789a");
    }
}
