//! Contract action forms.
//!
//! One `<form>` per action, built from its field list. Inputs are read back
//! as raw strings; normalization and signing happen in `WalletCore::submit`.

use crate::balances;
use crate::dom;
use crate::state::{App, Ctx};
use crate::toast::{self, Tone};
use ft_actions::{FormValues, format_quantity};
use ft_api_types::{
    ActionDescriptor, AutofillHint, FieldDescriptor, PrimitiveType, TokenDescriptor,
};
use ft_wallet_core::{ActionRequest, ActionSet, CatalogSource};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement};

/// Fetch the selected token's actions and render their forms.
pub async fn load_actions(ctx: &Ctx) {
    let Some(token) = ctx.selected_token() else {
        return;
    };

    dom::set_status(&ctx.els.action_source, "Loading\u{2026}", false);
    ctx.set_actions(None);
    dom::clear(&ctx.els.action_forms);

    let set = ctx.wallet.actions_for(&token.contract).await;
    // The token selector may have moved on while the ABI was loading.
    if !ctx.selected_token().is_some_and(|current| set.is_for(&current)) {
        debug!(contract = %set.contract, "dropping actions for a deselected token");
        return;
    }
    let source = match set.source {
        CatalogSource::Abi => format!("Actions from the {} ABI", set.contract),
        CatalogSource::Builtin => "Standard token actions".to_owned(),
    };
    dom::set_status(&ctx.els.action_source, &source, false);

    ctx.set_actions(Some(set));
    render_forms(ctx);
}

/// Redraw the cached action set, e.g. after the session changes autofill.
pub fn render_forms(ctx: &Ctx) {
    let container = &ctx.els.action_forms;
    dom::clear(container);

    let (Some(token), Some(set)) = (ctx.selected_token(), ctx.actions()) else {
        return;
    };
    if !set.is_for(&token) {
        return;
    }
    for action in &set.actions {
        match build_form(ctx, &token, &set, action) {
            Ok(form) => dom::append(container, &form),
            Err(err) => {
                warn!(action = %action.name, error = ?err, "could not render action form")
            }
        }
    }
}

fn placeholder(field: &FieldDescriptor, token: &TokenDescriptor, precision: u8) -> String {
    match field.primitive_type {
        PrimitiveType::Asset => {
            let example = format_quantity("1", precision).unwrap_or_else(|_| "1".to_owned());
            format!("{example} or {example} {}", token.symbol)
        }
        PrimitiveType::Symbol => format!("{precision},{}", token.symbol),
        PrimitiveType::Name => "account name".to_owned(),
        _ if field.optional => "optional".to_owned(),
        _ => String::new(),
    }
}

fn prefill(ctx: &App, field: &FieldDescriptor, token: &TokenDescriptor) -> Option<String> {
    match field.autofill {
        AutofillHint::SessionActor => ctx.wallet.session().map(|s| s.actor),
        AutofillHint::TokenSymbol => Some(token.symbol.clone()),
        AutofillHint::None => None,
    }
}

fn build_control(ctx: &App, field: &FieldDescriptor, token: &TokenDescriptor) -> Element {
    if field.primitive_type == PrimitiveType::Bool {
        let select: HtmlSelectElement = dom::create_element("select").unchecked_into();
        select.set_name(&field.name);
        if field.optional {
            let _ = select.append_child(&dom::create_option("", "", true));
        }
        let _ = select.append_child(&dom::create_option("true", "true", !field.optional));
        let _ = select.append_child(&dom::create_option("false", "false", false));
        return select.into();
    }

    let input: HtmlInputElement = dom::create_element("input").unchecked_into();
    input.set_name(&field.name);
    if field.primitive_type.is_numeric() {
        input.set_type("number");
        input.set_min("0");
        input.set_step("1");
    } else {
        input.set_type("text");
    }
    input.set_placeholder(&placeholder(field, token, ctx.wallet.precision(&token.symbol)));
    if let Some(value) = prefill(ctx, field, token) {
        input.set_value(&value);
    }
    input.into()
}

fn build_form(
    ctx: &Ctx,
    token: &TokenDescriptor,
    set: &ActionSet,
    action: &ActionDescriptor,
) -> Result<Element, JsValue> {
    let form = dom::create_element("form");
    form.set_class_name("action-form");
    form.set_attribute("data-action", &action.name)?;

    dom::append(&form, &dom::create_text("h3", "", &action.label));
    if !action.description.is_empty() {
        dom::append(&form, &dom::create_text("p", "description", &action.description));
    }

    for field in &action.fields {
        let label = dom::create_element("label");
        let caption = if field.optional {
            format!("{} (optional)", field.name)
        } else {
            field.name.clone()
        };
        dom::append(&label, &dom::create_text("span", "", &caption));
        dom::append(&label, &build_control(ctx, field, token));
        dom::append(&form, &label);
    }

    let button = dom::create_text("button", "primary", "Sign & send");
    button.set_attribute("type", "submit")?;
    dom::append(&form, &button);
    dom::append(&form, &dom::create_text("div", "form-result", ""));

    let handler_ctx = ctx.clone();
    let handler_form = form.clone();
    let handler_action = action.clone();
    let handler_token = token.clone();
    let handler_contract = set.contract.clone();
    let cb = Closure::wrap(Box::new(move |event: web_sys::Event| {
        event.prevent_default();
        let ctx = handler_ctx.clone();
        let form = handler_form.clone();
        let action = handler_action.clone();
        let token = handler_token.clone();
        let contract = handler_contract.clone();
        wasm_bindgen_futures::spawn_local(async move {
            submit_form(&ctx, &form, &token, &contract, &action).await;
        });
    }) as Box<dyn FnMut(_)>);
    form.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())?;
    cb.forget();

    Ok(form)
}

fn control_value(form: &Element, name: &str) -> String {
    let Ok(Some(control)) = form.query_selector(&format!("[name=\"{name}\"]")) else {
        return String::new();
    };
    if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn collect_values(form: &Element, action: &ActionDescriptor) -> FormValues {
    action
        .fields
        .iter()
        .map(|field| (field.name.clone(), control_value(form, &field.name)))
        .collect()
}

fn set_busy(form: &Element, busy: bool) {
    if let Ok(Some(button)) = form.query_selector("button[type=\"submit\"]") {
        if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(busy);
        }
    }
}

async fn submit_form(
    ctx: &Ctx,
    form: &Element,
    token: &TokenDescriptor,
    contract: &str,
    action: &ActionDescriptor,
) {
    let result = form.query_selector(".form-result").ok().flatten();
    let values = collect_values(form, action);

    set_busy(form, true);
    let outcome = ctx
        .wallet
        .submit(ActionRequest {
            contract,
            token_symbol: &token.symbol,
            action,
            values: &values,
        })
        .await;
    set_busy(form, false);

    match outcome {
        Ok(submitted) => {
            if let Some(result) = &result {
                let text = format!("Transaction id: {}", submitted.short_id);
                dom::set_status(result, &text, false);
            }
            toast::show(ctx, "Transaction submitted to network.", Tone::Success);
            balances::refresh_balances(ctx).await;
        }
        Err(err) => {
            let text = err.to_string();
            info!(action = %action.name, error = %text, "submission rejected");
            if let Some(result) = &result {
                dom::set_status(result, &text, true);
            }
            toast::show(ctx, &text, Tone::Error);
        }
    }
}
