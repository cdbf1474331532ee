//! FlexTokens command line
//!
//! Read-only view of the registered tokens against the same RPC endpoints the
//! browser UI uses.
//!
//! ```bash
//! flextokens stats
//! flextokens balances alice
//! flextokens --endpoint https://rpc.example actions w3won
//! ```

use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use ft_actions::normalize_name;
use ft_api_types::{ActionDescriptor, TokenDescriptor, TokenStats, TransactResult, Transaction};
use ft_chain_client::{BalanceLine, RpcClient};
use ft_chain_xpr::{ChainConfig, ReqwestTransport};
use ft_session::{Session, SessionError, SessionKit};
use ft_wallet_core::{CatalogSource, WalletCore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// FlexTokens - XPR Network token explorer
#[derive(Parser)]
#[command(name = "flextokens")]
#[command(about = "FlexTokens - XPR Network token explorer")]
#[command(version)]
struct Cli {
    /// RPC endpoint, tried in the order given (overrides FLEXTOKENS_RPC_ENDPOINTS)
    #[arg(short, long = "endpoint", value_name = "URL")]
    endpoints: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Supply, max supply, issuer and precision of every registered token
    Stats,
    /// Balance of an account in every registered token
    Balances {
        /// Account name
        account: String,
    },
    /// Actions callable on a contract, from its ABI or the standard token set
    Actions {
        /// Contract account, or a registered token symbol
        contract: String,
    },
}

/// The CLI never signs; every wallet operation is refused.
struct ReadOnlyKit;

#[async_trait(?Send)]
impl SessionKit for ReadOnlyKit {
    async fn login(&self) -> Result<Session, SessionError> {
        Err(SessionError::adapter("the command line cannot sign transactions", None))
    }

    async fn logout(&self, _session: &Session) -> Result<(), SessionError> {
        Ok(())
    }

    async fn restore(&self) -> Result<Option<Session>, SessionError> {
        Ok(None)
    }

    async fn transact(
        &self,
        _session: &Session,
        _transaction: &Transaction,
    ) -> Result<TransactResult, SessionError> {
        Err(SessionError::NotConnected)
    }
}

type Wallet = WalletCore<ReqwestTransport, ReadOnlyKit>;

const UNKNOWN: &str = "\u{2014}";

fn stats_line(token: &TokenDescriptor, stats: Option<&TokenStats>) -> String {
    match stats {
        Some(stats) => format!(
            "{:<6} {:<8} supply={} max={} issuer={} precision={}",
            token.symbol,
            token.contract,
            stats.supply,
            stats.max_supply,
            stats.issuer,
            stats.precision
        ),
        None => format!(
            "{:<6} {:<8} supply={UNKNOWN} max={UNKNOWN} issuer={UNKNOWN} precision={UNKNOWN}",
            token.symbol, token.contract
        ),
    }
}

fn balance_line(line: &BalanceLine) -> String {
    match &line.balance {
        Ok(amount) => format!("{:<6} {amount}", line.token.symbol),
        Err(err) => format!("{:<6} unavailable ({err})", line.token.symbol),
    }
}

fn action_line(action: &ActionDescriptor) -> String {
    let fields: Vec<String> = action
        .fields
        .iter()
        .map(|field| {
            let marker = if field.optional { "?" } else { "" };
            format!("{}:{}{marker}", field.name, field.primitive_type)
        })
        .collect();
    format!("{:<12} {:<16} {}", action.name, action.label, fields.join(" "))
}

async fn show_stats(wallet: &Wallet) -> anyhow::Result<()> {
    let refresh = wallet.refresh_stats().await;
    for token in wallet.tokens() {
        println!("{}", stats_line(token, wallet.stats(&token.symbol).as_ref()));
    }

    if refresh.has_failures() {
        let symbols: Vec<&str> = refresh.failed.iter().map(|(s, _)| s.as_str()).collect();
        bail!("could not load stats for {}", symbols.join(", "));
    }
    Ok(())
}

async fn show_balances(wallet: &Wallet, account: &str) -> anyhow::Result<()> {
    let account = normalize_name(account).map_err(|reason| anyhow!(reason))?;
    // Stats first so zero balances carry each token's precision.
    wallet.refresh_stats().await;

    let lines = wallet.balances(&account).await;
    for line in &lines {
        println!("{}", balance_line(line));
    }

    if lines.iter().all(|line| line.balance.is_err()) {
        bail!("no balances could be loaded for {account}");
    }
    Ok(())
}

async fn show_actions(wallet: &Wallet, target: &str) -> anyhow::Result<()> {
    let contract = match wallet.token(&target.to_ascii_uppercase()) {
        Some(token) => token.contract.clone(),
        None => normalize_name(target)
            .map_err(|reason| anyhow!(reason))
            .context("expected a contract account or a registered token symbol")?,
    };

    let set = wallet.actions_for(&contract).await;
    match set.source {
        CatalogSource::Abi => println!("# actions from the {contract} ABI"),
        CatalogSource::Builtin => println!("# standard token actions ({contract} ABI unavailable)"),
    }
    for action in &set.actions {
        println!("{}", action_line(action));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = if cli.endpoints.is_empty() {
        ChainConfig::from_env()
    } else {
        ChainConfig::default().with_endpoint_override(Some(cli.endpoints.join(",").as_str()))
    };
    info!(app = %config.app_name, endpoints = ?config.endpoints, "using RPC endpoints");

    let rpc = RpcClient::new(config.endpoints, ReqwestTransport::default());
    let wallet = WalletCore::new(rpc, ReadOnlyKit, config.tokens);

    match cli.command {
        Commands::Stats => show_stats(&wallet).await,
        Commands::Balances { account } => show_balances(&wallet, &account).await,
        Commands::Actions { contract } => show_actions(&wallet, &contract).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_actions::token_actions;

    fn won() -> TokenDescriptor {
        TokenDescriptor {
            symbol: "WON".to_owned(),
            display_name: "WON".to_owned(),
            contract: "w3won".to_owned(),
            explorer_url: String::new(),
        }
    }

    #[test]
    fn unknown_stats_render_as_dashes() {
        let line = stats_line(&won(), None);
        assert!(line.starts_with("WON    w3won"));
        assert!(line.ends_with("precision=\u{2014}"));
    }

    #[test]
    fn actions_list_optional_fields() {
        let transfer = token_actions().remove(0);
        assert_eq!(
            action_line(&transfer),
            "transfer     Transfer         from:name to:name quantity:asset memo:string?"
        );
    }

    #[test]
    fn endpoint_flag_is_repeatable() {
        let cli = Cli::try_parse_from([
            "flextokens",
            "--endpoint",
            "https://a.example",
            "-e",
            "https://b.example",
            "stats",
        ])
        .expect("valid arguments");
        assert_eq!(cli.endpoints, vec!["https://a.example", "https://b.example"]);
        assert!(matches!(cli.command, Commands::Stats));
    }
}
