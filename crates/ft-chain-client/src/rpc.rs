use crate::RpcTransport;
use ft_api_types::{
    CurrencyStatsRow, GetAbiRequest, GetAbiResponse, GetCurrencyBalanceRequest,
    GetCurrencyStatsRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const GET_CURRENCY_STATS: &str = "/v1/chain/get_currency_stats";
pub const GET_CURRENCY_BALANCE: &str = "/v1/chain/get_currency_balance";
pub const GET_ABI: &str = "/v1/chain/get_abi";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("no endpoint reachable for {path}{}", describe_cause(.last))]
    NoEndpointReachable {
        path: String,
        #[source]
        last: Option<TransportError>,
    },
    #[error("unexpected response from {endpoint}{path}: {message}")]
    UnexpectedResponse {
        endpoint: String,
        path: String,
        message: String,
    },
    #[error("could not encode request for {path}: {message}")]
    Encode { path: String, message: String },
}

fn describe_cause(last: &Option<TransportError>) -> String {
    match last {
        Some(err) => format!(" ({err})"),
        None => " (no endpoints configured)".to_owned(),
    }
}

/// A parsed response paired with the endpoint that produced it.
#[derive(Debug, Clone)]
pub struct RpcResponse {
    pub data: serde_json::Value,
    pub endpoint: String,
}

pub struct RpcClient<T> {
    endpoints: Vec<String>,
    transport: T,
}

impl<T> RpcClient<T>
where
    T: RpcTransport,
{
    pub fn new<I, S>(endpoints: I, transport: T) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints = endpoints
            .into_iter()
            .map(|endpoint| endpoint.into().trim().trim_end_matches('/').to_owned())
            .filter(|endpoint| !endpoint.is_empty())
            .collect();
        Self {
            endpoints,
            transport,
        }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `body` to `path` on each endpoint in order, returning the first
    /// success.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<RpcResponse, RpcError> {
        let mut last = None;

        for endpoint in &self.endpoints {
            let url = format!("{endpoint}{path}");
            match self.transport.post_json(&url, body).await {
                Ok(data) => {
                    debug!(%endpoint, %path, "rpc call succeeded");
                    return Ok(RpcResponse {
                        data,
                        endpoint: endpoint.clone(),
                    });
                }
                Err(err) => {
                    warn!(%endpoint, %path, error = %err, "rpc endpoint failed, trying next");
                    last = Some(err);
                }
            }
        }

        Err(RpcError::NoEndpointReachable {
            path: path.to_owned(),
            last,
        })
    }

    async fn call<B, R>(&self, path: &str, body: &B) -> Result<R, RpcError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|err| RpcError::Encode {
            path: path.to_owned(),
            message: err.to_string(),
        })?;
        let response = self.post(path, &body).await?;
        serde_json::from_value(response.data).map_err(|err| RpcError::UnexpectedResponse {
            endpoint: response.endpoint,
            path: path.to_owned(),
            message: err.to_string(),
        })
    }

    /// Currency stats keyed by symbol. An unknown symbol yields an empty map.
    pub async fn get_currency_stats(
        &self,
        code: &str,
        symbol: &str,
    ) -> Result<HashMap<String, CurrencyStatsRow>, RpcError> {
        let request = GetCurrencyStatsRequest {
            code: code.to_owned(),
            symbol: symbol.to_owned(),
        };
        self.call(GET_CURRENCY_STATS, &request).await
    }

    /// Balance strings such as `"12.5000 WON"`; empty when the account holds none.
    pub async fn get_currency_balance(
        &self,
        account: &str,
        code: &str,
        symbol: &str,
    ) -> Result<Vec<String>, RpcError> {
        let request = GetCurrencyBalanceRequest {
            account: account.to_owned(),
            code: code.to_owned(),
            symbol: symbol.to_owned(),
        };
        self.call(GET_CURRENCY_BALANCE, &request).await
    }

    pub async fn get_abi(&self, account: &str) -> Result<GetAbiResponse, RpcError> {
        let request = GetAbiRequest {
            account_name: account.to_owned(),
        };
        self.call(GET_ABI, &request).await
    }
}
