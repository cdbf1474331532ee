//! Event binding.
//!
//! Wires the static page controls. Per-action form listeners are attached in
//! `forms.rs` as the forms are built.

use crate::balances;
use crate::dom;
use crate::forms;
use crate::state::{self, Ctx};
use crate::tokens;
use crate::wallet_ops;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Attach an async handler for `$event` on `$el`, spawned with a clone of the context.
macro_rules! on_event_async {
    ($el:expr, $event:expr, $ctx:expr, $handler:expr) => {{
        let ctx = $ctx.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if $event == "submit" {
                event.prevent_default();
            }
            let ctx2 = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&ctx2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

async fn on_token_change(ctx: &Ctx) {
    state::local_set(
        state::ACTION_TOKEN_KEY,
        &dom::get_select_value(&ctx.els.action_token),
    );
    forms::load_actions(ctx).await;
}

async fn on_refresh_stats(ctx: &Ctx) {
    tokens::refresh_stats(ctx).await;
}

async fn on_refresh_balances(ctx: &Ctx) {
    balances::refresh_balances(ctx).await;
}

async fn on_lookup(ctx: &Ctx) {
    balances::on_lookup(ctx).await;
}

/// Bind all page-level listeners. Call once after init.
pub fn bind_events(ctx: &Ctx) -> Result<(), JsValue> {
    let els = &ctx.els;

    // ── Session ──
    on_event_async!(els.connect_btn, "click", ctx, wallet_ops::on_connect);
    on_event_async!(els.disconnect_btn, "click", ctx, wallet_ops::on_disconnect);

    // ── Stats / balances ──
    on_event_async!(els.refresh_stats, "click", ctx, on_refresh_stats);
    on_event_async!(els.refresh_balances, "click", ctx, on_refresh_balances);

    // ── Actions ──
    on_event_async!(els.action_token, "change", ctx, on_token_change);

    // ── Lookup ──
    on_event_async!(els.lookup_form, "submit", ctx, on_lookup);

    Ok(())
}
