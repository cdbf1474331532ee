//! Transient notification banner.

use crate::state::App;
use gloo_timers::callback::Timeout;

const TOAST_MS: u32 = 3200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Error => "error",
        }
    }
}

/// Show `message` in `#toast`, replacing any toast still on screen.
pub fn show(ctx: &App, message: &str, tone: Tone) {
    let el = &ctx.els.toast;
    el.set_text_content(Some(message));
    el.set_class_name(&format!("toast visible {}", tone.class()));

    let hide = el.clone();
    ctx.set_toast_timer(Timeout::new(TOAST_MS, move || {
        hide.set_class_name("toast");
    }));
}
