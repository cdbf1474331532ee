//! Bridge to the page's JavaScript wallet session kit.
//!
//! The host page defines a global `flexTokensSession` object whose
//! `login`, `logout`, `restore` and `transact` methods return promises
//! (see `web/session-bridge.js`).

use async_trait::async_trait;
use ft_api_types::{TransactResult, Transaction};
use ft_session::{Session, SessionError, SessionKit};
use js_sys::{Promise, Reflect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = flexTokensSession, js_name = login, catch)]
    fn js_login() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = flexTokensSession, js_name = logout, catch)]
    fn js_logout() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = flexTokensSession, js_name = restore, catch)]
    fn js_restore() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = flexTokensSession, js_name = transact, catch)]
    fn js_transact(transaction: JsValue) -> Result<Promise, JsValue>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    actor: String,
    permission: String,
    #[serde(default)]
    chain_id: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TransactReply {
    #[serde(default)]
    transaction_id: Option<String>,
}

fn string_prop(value: &JsValue, key: &str) -> Option<String> {
    if !value.is_object() {
        return None;
    }
    Reflect::get(value, &JsValue::from_str(key))
        .ok()?
        .as_string()
        .filter(|s| !s.trim().is_empty())
}

struct Rejection {
    name: Option<String>,
    message: String,
    cause: Option<String>,
}

/// Read a rejected promise's `name`, `message` and `cause.message`.
fn rejection(fallback: &str, err: JsValue) -> Rejection {
    let message = string_prop(&err, "message")
        .or_else(|| err.as_string())
        .unwrap_or_else(|| fallback.to_owned());
    let cause = Reflect::get(&err, &JsValue::from_str("cause"))
        .ok()
        .filter(|cause| !cause.is_undefined() && !cause.is_null())
        .and_then(|cause| string_prop(&cause, "message").or_else(|| cause.as_string()));

    Rejection {
        name: string_prop(&err, "name"),
        message,
        cause,
    }
}

impl Rejection {
    fn into_adapter(self) -> SessionError {
        SessionError::adapter(&self.message, self.cause)
    }

    fn into_login(self) -> SessionError {
        SessionError::login_rejected(self.name.as_deref(), &self.message, self.cause)
    }
}

async fn call(fallback: &str, promise: Result<Promise, JsValue>) -> Result<JsValue, Rejection> {
    let promise = promise.map_err(|err| rejection(fallback, err))?;
    JsFuture::from(promise)
        .await
        .map_err(|err| rejection(fallback, err))
}

fn to_session(value: JsValue) -> Result<Session, SessionError> {
    let info: SessionInfo = serde_wasm_bindgen::from_value(value).map_err(|err| {
        SessionError::adapter("wallet returned an unreadable session", Some(err.to_string()))
    })?;
    Session::new(&info.actor, &info.permission, &info.chain_id)
}

/// `SessionKit` backed by `window.flexTokensSession`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionKit;

#[async_trait(?Send)]
impl SessionKit for BrowserSessionKit {
    async fn login(&self) -> Result<Session, SessionError> {
        let value = call("Login failed", js_login())
            .await
            .map_err(Rejection::into_login)?;
        if value.is_null() || value.is_undefined() {
            return Err(SessionError::Cancelled);
        }
        to_session(value)
    }

    async fn logout(&self, _session: &Session) -> Result<(), SessionError> {
        call("Logout failed", js_logout())
            .await
            .map(|_| ())
            .map_err(Rejection::into_adapter)
    }

    async fn restore(&self) -> Result<Option<Session>, SessionError> {
        let value = call("Session restore failed", js_restore())
            .await
            .map_err(Rejection::into_adapter)?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        to_session(value).map(Some)
    }

    async fn transact(
        &self,
        _session: &Session,
        transaction: &Transaction,
    ) -> Result<TransactResult, SessionError> {
        let payload = transaction
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| {
                SessionError::adapter("could not encode transaction", Some(err.to_string()))
            })?;

        let value = call("Transaction failed", js_transact(payload))
            .await
            .map_err(Rejection::into_adapter)?;
        let reply: TransactReply = if value.is_object() {
            serde_wasm_bindgen::from_value(value).unwrap_or_default()
        } else {
            TransactReply::default()
        };

        Ok(TransactResult {
            transaction_id: reply.transaction_id,
        })
    }
}
