use crate::{RpcClient, RpcError, RpcTransport, StatsCache};
use ft_api_types::TokenDescriptor;
use futures::future::join_all;

#[derive(Debug, Clone)]
pub struct BalanceLine {
    pub token: TokenDescriptor,
    pub balance: Result<String, RpcError>,
}

/// `"0.0000 WON"` style zero balance for a token of the given precision.
pub fn zero_balance(symbol: &str, precision: u8) -> String {
    if precision == 0 {
        format!("0 {symbol}")
    } else {
        format!("0.{} {symbol}", "0".repeat(usize::from(precision)))
    }
}

/// Balance of `account` in every token, fetched concurrently.
pub async fn fetch_balances<T>(
    client: &RpcClient<T>,
    account: &str,
    tokens: &[TokenDescriptor],
    stats: &StatsCache,
) -> Vec<BalanceLine>
where
    T: RpcTransport,
{
    join_all(tokens.iter().map(|token| async move {
        let balance = client
            .get_currency_balance(account, &token.contract, &token.symbol)
            .await
            .map(|rows| {
                rows.into_iter()
                    .next()
                    .unwrap_or_else(|| zero_balance(&token.symbol, stats.precision(&token.symbol)))
            });
        BalanceLine {
            token: token.clone(),
            balance,
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeTransport;
    use crate::TransportError;
    use ft_api_types::TokenStats;
    use serde_json::json;

    #[test]
    fn zero_balance_uses_precision() {
        assert_eq!(zero_balance("WON", 4), "0.0000 WON");
        assert_eq!(zero_balance("WON", 8), "0.00000000 WON");
        assert_eq!(zero_balance("RAW", 0), "0 RAW");
    }

    #[tokio::test]
    async fn empty_balance_renders_zero_and_failures_stay_per_token() {
        let transport = FakeTransport::default()
            .route("https://a.example/v1/chain/get_currency_balance", Ok(json!([])));
        let client = RpcClient::new(["https://a.example"], transport);
        let mut stats = StatsCache::default();
        stats.insert(
            "WON",
            TokenStats {
                supply: "1.00000000 WON".to_owned(),
                max_supply: String::new(),
                issuer: "w3won".to_owned(),
                precision: 8,
            },
        );
        let tokens = [TokenDescriptor {
            symbol: "WON".to_owned(),
            display_name: "WON".to_owned(),
            contract: "w3won".to_owned(),
            explorer_url: String::new(),
        }];

        let lines = fetch_balances(&client, "alice", &tokens, &stats).await;
        assert_eq!(lines[0].balance.as_deref(), Ok("0.00000000 WON"));

        let failing_transport = FakeTransport::default().route(
            "https://b.example/v1/chain/get_currency_balance",
            Err(TransportError::Status {
                url: "https://b.example/v1/chain/get_currency_balance".to_owned(),
                status: 500,
            }),
        );
        let failing = RpcClient::new(["https://b.example"], failing_transport);
        let lines = fetch_balances(&failing, "alice", &tokens, &stats).await;
        assert!(lines[0].balance.is_err());
    }
}
