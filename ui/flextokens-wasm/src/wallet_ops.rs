//! Session operations: connect, disconnect and startup restore.
//!
//! Each handler updates the session badge, re-renders forms so autofill
//! follows the connected account, and reloads balances.

use crate::balances;
use crate::dom;
use crate::forms;
use crate::state::{App, Ctx};
use crate::toast::{self, Tone};
use ft_session::SessionError;

/// Reflect the current session in `#sessionStatus` and the connect buttons.
pub fn render_session(ctx: &App) {
    let session = ctx.wallet.session();
    let text = match &session {
        Some(session) => format!("Connected: {}@{}", session.actor, session.permission),
        None => "Not connected".to_owned(),
    };
    dom::set_text(&ctx.els.session_status, &text);
    dom::toggle_class(&ctx.els.session_status, "connected", session.is_some());
    dom::toggle_class(&ctx.els.connect_btn, "hidden", session.is_some());
    dom::toggle_class(&ctx.els.disconnect_btn, "hidden", session.is_none());
}

async fn session_changed(ctx: &Ctx) {
    render_session(ctx);
    forms::render_forms(ctx);
    balances::refresh_balances(ctx).await;
}

pub async fn on_connect(ctx: &Ctx) {
    match ctx.wallet.connect().await {
        Ok(session) => {
            toast::show(ctx, &format!("Connected as {}", session.actor), Tone::Success);
            session_changed(ctx).await;
        }
        Err(SessionError::Cancelled) => toast::show(ctx, "Login cancelled", Tone::Info),
        Err(err) => toast::show(ctx, &err.reason(), Tone::Error),
    }
}

pub async fn on_disconnect(ctx: &Ctx) {
    ctx.wallet.disconnect().await;
    toast::show(ctx, "Disconnected", Tone::Info);
    render_session(ctx);
    forms::render_forms(ctx);
    balances::clear_balances(ctx);
}

pub async fn restore_session(ctx: &Ctx) {
    match ctx.wallet.restore().await {
        Some(session) => {
            toast::show(ctx, &format!("Restored session for {}", session.actor), Tone::Info);
            session_changed(ctx).await;
        }
        None => balances::clear_balances(ctx),
    }
}
