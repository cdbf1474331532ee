use ft_api_types::{ChainId, TokenDescriptor};
use tracing::warn;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::ReqwestTransport;

pub const XPR_MAINNET: &str = "384da888112027f0321850a169f737c33e53b388aad48b5adace4bab97f437e0";
pub const APP_NAME: &str = "FlexTokens";
pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "https://proton.greymass.com",
    "https://proton.eoscafeblock.com",
];

/// Comma-separated endpoint list overriding [`DEFAULT_ENDPOINTS`].
pub const ENDPOINTS_ENV: &str = "FLEXTOKENS_RPC_ENDPOINTS";

pub fn default_tokens() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor {
            symbol: "WON".to_owned(),
            display_name: "WON".to_owned(),
            contract: "w3won".to_owned(),
            explorer_url: "https://explorer.xprnetwork.org/tokens/WON-proton-w3won".to_owned(),
        },
        TokenDescriptor {
            symbol: "EASY".to_owned(),
            display_name: "EASY".to_owned(),
            contract: "mon3y".to_owned(),
            explorer_url: "https://explorer.xprnetwork.org/tokens/EASY-proton-mon3y".to_owned(),
        },
    ]
}

/// Split `"https://a, https://b/"` into trimmed, non-empty endpoints.
pub fn parse_endpoint_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().trim_end_matches('/'))
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: ChainId,
    pub app_name: String,
    pub endpoints: Vec<String>,
    pub tokens: Vec<TokenDescriptor>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId(XPR_MAINNET.to_owned()),
            app_name: APP_NAME.to_owned(),
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_owned()).collect(),
            tokens: default_tokens(),
        }
    }
}

impl ChainConfig {
    /// Mainnet defaults with `FLEXTOKENS_RPC_ENDPOINTS` applied when set.
    pub fn from_env() -> Self {
        let raw = std::env::var(ENDPOINTS_ENV).ok();
        Self::default().with_endpoint_override(raw.as_deref())
    }

    /// Replace the endpoint list. An override with no usable entries is ignored.
    pub fn with_endpoint_override(mut self, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        let endpoints = parse_endpoint_list(raw);
        if endpoints.is_empty() {
            warn!("endpoint override '{raw}' has no entries, keeping defaults");
        } else {
            self.endpoints = endpoints;
        }
        self
    }
}
