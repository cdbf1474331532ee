//! Contract action catalog and form input normalization.
//!
//! Actions come either from the built-in token catalog or from a contract's
//! ABI. Raw form strings are turned into the JSON the chain expects before a
//! transaction is assembled.

mod abi;
mod catalog;
mod normalize;

pub use abi::actions_from_abi;
pub use catalog::{autofill_for, token_actions};
pub use normalize::{
    FormContext, FormError, FormValues, format_quantity, missing_fields, normalize_asset,
    normalize_fields, normalize_name, normalize_symbol,
};

use ft_api_types::{Action, PermissionLevel, Transaction};

/// Single-action transaction authorized by `authorization`.
pub fn build_transaction(
    contract: &str,
    action_name: &str,
    authorization: PermissionLevel,
    data: serde_json::Map<String, serde_json::Value>,
) -> Transaction {
    Transaction {
        actions: vec![Action {
            account: contract.to_owned(),
            name: action_name.to_owned(),
            authorization: vec![authorization],
            data: serde_json::Value::Object(data),
        }],
    }
}
