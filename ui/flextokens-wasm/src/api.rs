//! Browser RPC transport.
//!
//! `fetch`-backed `RpcTransport` used by the UI's `RpcClient`. Endpoint
//! fallback lives in the client; this only performs one POST.

use async_trait::async_trait;
use ft_chain_client::{RpcTransport, TransportError};
use gloo_net::http::Request;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl RpcTransport for FetchTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let network = |err: gloo_net::Error| TransportError::Network {
            url: url.to_owned(),
            message: err.to_string(),
        };

        let response = Request::post(url)
            .json(body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;

        if !response.ok() {
            return Err(TransportError::Status {
                url: url.to_owned(),
                status: response.status(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::Decode {
                url: url.to_owned(),
                message: err.to_string(),
            })
    }
}
