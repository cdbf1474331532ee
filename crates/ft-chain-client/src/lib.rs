//! Chain RPC access with ordered endpoint fallback.
//!
//! The HTTP layer is abstracted behind [`RpcTransport`] so the browser build
//! can use `fetch` and the host build can use `reqwest`.

mod balances;
mod rpc;
mod stats;

pub use balances::{BalanceLine, fetch_balances, zero_balance};
pub use rpc::{
    GET_ABI, GET_CURRENCY_BALANCE, GET_CURRENCY_STATS, RpcClient, RpcError, RpcResponse,
    TransportError,
};
pub use stats::{
    DEFAULT_PRECISION, StatsCache, StatsFetch, StatsRefresh, fetch_token_stats, infer_precision,
    stats_from_row,
};

use async_trait::async_trait;

/// A single JSON POST against one fully-qualified URL.
///
/// Implementations must return `Err` for non-2xx statuses and for bodies that
/// are not valid JSON; the client treats both as a failed endpoint.
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}
