use async_trait::async_trait;
use ft_chain_client::{RpcTransport, TransportError};

/// `reqwest`-backed transport for host builds.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait(?Send)]
impl RpcTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| TransportError::Network {
                url: url.to_owned(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| TransportError::Decode {
                url: url.to_owned(),
                message: err.to_string(),
            })
    }
}
