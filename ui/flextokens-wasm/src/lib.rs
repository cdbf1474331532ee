//! FlexTokens WASM frontend
//!
//! Token stats, balances and contract action forms for XPR Network token
//! contracts. Signing is delegated to the page's `flexTokensSession` bridge.

pub mod api;
pub mod balances;
pub mod dom;
pub mod events;
pub mod forms;
pub mod logging;
pub mod session;
pub mod state;
pub mod toast;
pub mod tokens;
pub mod wallet_ops;

use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let ctx = Rc::new(state::App::new(els));

    tokens::populate_token_select(&ctx);
    tokens::render_token_grid(&ctx, true);
    wallet_ops::render_session(&ctx);
    events::bind_events(&ctx)?;

    // Session restore, stats and the action catalog are independent.
    futures::join!(
        wallet_ops::restore_session(&ctx),
        tokens::refresh_stats(&ctx),
        forms::load_actions(&ctx),
    );

    Ok(())
}
