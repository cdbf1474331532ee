//! Application context.
//!
//! One `App` is built at startup and shared as `Rc<App>` with every handler.
//! WASM is single-threaded, so interior state sits in `RefCell`s; borrows are
//! never held across an `.await`.

use crate::api::FetchTransport;
use crate::dom::{self, Elements};
use crate::session::BrowserSessionKit;
use ft_api_types::TokenDescriptor;
use ft_chain_client::RpcClient;
use ft_chain_xpr::ChainConfig;
use ft_wallet_core::{ActionSet, WalletCore};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// localStorage key holding a comma-separated RPC endpoint override.
pub const ENDPOINTS_KEY: &str = "ft_rpc_endpoints";
/// localStorage key remembering the token picked in the action panel.
pub const ACTION_TOKEN_KEY: &str = "ft_action_token";

pub type Wallet = WalletCore<FetchTransport, BrowserSessionKit>;
pub type Ctx = Rc<App>;

#[derive(Default)]
struct UiState {
    actions: Option<ActionSet>,
    toast_timer: Option<Timeout>,
}

pub struct App {
    pub els: Elements,
    pub wallet: Wallet,
    ui: RefCell<UiState>,
}

impl App {
    pub fn new(els: Elements) -> Self {
        let stored = local_get(ENDPOINTS_KEY);
        let config = ChainConfig::default().with_endpoint_override(stored.as_deref());
        info!(
            app = %config.app_name,
            chain = %config.chain_id.0,
            endpoints = ?config.endpoints,
            "starting"
        );

        let rpc = RpcClient::new(config.endpoints, FetchTransport);
        Self {
            els,
            wallet: WalletCore::new(rpc, BrowserSessionKit, config.tokens),
            ui: RefCell::new(UiState::default()),
        }
    }

    /// Token currently picked in the action panel.
    pub fn selected_token(&self) -> Option<TokenDescriptor> {
        let symbol = dom::get_select_value(&self.els.action_token);
        self.wallet.token(&symbol).cloned()
    }

    pub fn actions(&self) -> Option<ActionSet> {
        self.ui.borrow().actions.clone()
    }

    pub fn set_actions(&self, actions: Option<ActionSet>) {
        self.ui.borrow_mut().actions = actions;
    }

    /// Keep the pending toast timer alive; dropping the previous one cancels it.
    pub fn set_toast_timer(&self, timer: Timeout) {
        self.ui.borrow_mut().toast_timer = Some(timer);
    }
}

// ── localStorage helpers ──

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn local_get(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

pub fn local_set(key: &str, value: &str) {
    if let Some(s) = storage() {
        let _ = s.set_item(key, value);
    }
}
