//! Token registry views: the stats grid and the action token picker.

use crate::dom;
use crate::state::{self, App};
use crate::toast::{self, Tone};
use ft_api_types::{TokenDescriptor, TokenStats};
use web_sys::HtmlAnchorElement;
use wasm_bindgen::JsCast;

const LOADING: &str = "Loading\u{2026}";
const UNKNOWN: &str = "\u{2014}";

/// Fill `#actionToken` with the registry, restoring the last pick.
pub fn populate_token_select(ctx: &App) {
    let select = &ctx.els.action_token;
    let saved = state::local_get(state::ACTION_TOKEN_KEY).unwrap_or_default();

    dom::clear(select);
    for (i, token) in ctx.wallet.tokens().iter().enumerate() {
        let label = format!("{} ({})", token.display_name, token.contract);
        let option = dom::create_option(&token.symbol, &label, i == 0);
        let _ = select.append_child(&option);
    }

    if !saved.is_empty() && dom::has_option(select, &saved) {
        dom::set_select_value(select, &saved);
    }
}

fn stat_row(list: &web_sys::Element, term: &str, value: &str) {
    dom::append(list, &dom::create_text("dt", "", term));
    dom::append(list, &dom::create_text("dd", "", value));
}

fn token_card(
    token: &TokenDescriptor,
    stats: Option<&TokenStats>,
    loading: bool,
) -> web_sys::Element {
    let card = dom::create_element("article");
    card.set_class_name("token-card");
    let _ = card.set_attribute("data-symbol", &token.symbol);

    let title = dom::create_element("h3");
    if token.explorer_url.is_empty() {
        title.set_text_content(Some(&token.display_name));
    } else {
        let link: HtmlAnchorElement = dom::create_element("a").unchecked_into();
        link.set_href(&token.explorer_url);
        link.set_target("_blank");
        link.set_rel("noopener");
        link.set_text_content(Some(&token.display_name));
        dom::append(&title, &link);
    }
    dom::append(&card, &title);
    dom::append(&card, &dom::create_text("p", "contract", &token.contract));

    let placeholder = if loading { LOADING } else { UNKNOWN };
    let list = dom::create_element("dl");
    match stats {
        Some(stats) => {
            stat_row(&list, "Supply", &stats.supply);
            stat_row(&list, "Max supply", &stats.max_supply);
            stat_row(&list, "Issuer", &stats.issuer);
            stat_row(&list, "Precision", &stats.precision.to_string());
        }
        None => {
            for term in ["Supply", "Max supply", "Issuer", "Precision"] {
                stat_row(&list, term, placeholder);
            }
        }
    }
    dom::append(&card, &list);
    card
}

/// Redraw `#tokenGrid` from the stats cache.
pub fn render_token_grid(ctx: &App, loading: bool) {
    let grid = &ctx.els.token_grid;
    dom::clear(grid);
    for token in ctx.wallet.tokens() {
        let stats = ctx.wallet.stats(&token.symbol);
        dom::append(grid, &token_card(token, stats.as_ref(), loading));
    }
}

pub async fn refresh_stats(ctx: &App) {
    render_token_grid(ctx, true);
    let refresh = ctx.wallet.refresh_stats().await;
    render_token_grid(ctx, false);

    if refresh.has_failures() {
        let symbols: Vec<&str> = refresh.failed.iter().map(|(symbol, _)| symbol.as_str()).collect();
        toast::show(
            ctx,
            &format!("Could not load stats for {}", symbols.join(", ")),
            Tone::Error,
        );
    }
}
