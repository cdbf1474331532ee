//! Balance list for the connected account and the account lookup form.

use crate::dom;
use crate::state::App;
use crate::toast::{self, Tone};
use ft_actions::normalize_name;
use ft_chain_client::BalanceLine;
use tracing::warn;
use web_sys::Element;

const LOADING: &str = "Loading\u{2026}";
const NOT_CONNECTED: &str = "Connect a wallet to see balances.";

fn render_lines(target: &Element, lines: &[BalanceLine]) {
    dom::clear(target);
    let list = dom::create_element("ul");
    list.set_class_name("balances");
    for line in lines {
        let name = &line.token.display_name;
        let item = match &line.balance {
            Ok(amount) => dom::create_text("li", "", &format!("{name}: {amount}")),
            Err(err) => {
                warn!(symbol = %line.token.symbol, error = %err, "balance unavailable");
                dom::create_text("li", "error", &format!("{name}: unavailable"))
            }
        };
        dom::append(&list, &item);
    }
    dom::append(target, &list);
}

/// Reload `#balanceList` for the connected account.
pub async fn refresh_balances(ctx: &App) {
    let target = &ctx.els.balance_list;
    if ctx.wallet.session().is_none() {
        dom::set_status(target, NOT_CONNECTED, false);
        return;
    }

    dom::set_status(target, LOADING, false);
    match ctx.wallet.own_balances().await {
        Ok(lines) => render_lines(target, &lines),
        Err(err) => dom::set_status(target, &err.reason(), true),
    }
}

pub fn clear_balances(ctx: &App) {
    dom::set_status(&ctx.els.balance_list, NOT_CONNECTED, false);
}

/// Balances of whatever account was typed into `#lookupAccount`.
pub async fn on_lookup(ctx: &App) {
    let target = &ctx.els.lookup_results;
    let raw = dom::get_input_value(&ctx.els.lookup_account);

    let account = match normalize_name(&raw) {
        Ok(account) => account,
        Err(reason) => {
            dom::set_status(target, &reason, true);
            toast::show(ctx, &reason, Tone::Error);
            return;
        }
    };

    dom::set_status(target, LOADING, false);
    let lines = ctx.wallet.balances(&account).await;
    render_lines(target, &lines);
}
