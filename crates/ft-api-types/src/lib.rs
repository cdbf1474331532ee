use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainId(pub String);

/// Precision assumed for a token whose supply has not been loaded.
pub const DEFAULT_PRECISION: u8 = 4;

// ── Token registry ──

/// Static description of a token contract shown in the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub display_name: String,
    pub contract: String,
    pub explorer_url: String,
}

/// Live supply figures for a token, keyed by symbol in the stats cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenStats {
    pub supply: String,
    pub max_supply: String,
    pub issuer: String,
    pub precision: u8,
}

// ── Chain RPC wire types ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCurrencyStatsRequest {
    pub code: String,
    pub symbol: String,
}

/// One entry of the `get_currency_stats` response object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyStatsRow {
    #[serde(default)]
    pub supply: Option<String>,
    #[serde(default)]
    pub max_supply: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCurrencyBalanceRequest {
    pub account: String,
    pub code: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAbiRequest {
    pub account_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAbiResponse {
    pub account_name: String,
    #[serde(default)]
    pub abi: Option<AbiDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbiDef {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub types: Vec<AbiTypeDef>,
    #[serde(default)]
    pub structs: Vec<AbiStruct>,
    #[serde(default)]
    pub actions: Vec<AbiAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiTypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiStruct {
    pub name: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<AbiField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiAction {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

// ── Transactions ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    pub account: String,
    pub name: String,
    pub authorization: Vec<PermissionLevel>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactResult {
    #[serde(default)]
    pub transaction_id: Option<String>,
}

// ── Action catalog ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Name,
    Asset,
    Symbol,
    String,
    Bool,
    Uint16,
    Uint32,
    Uint64,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Asset => "asset",
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Uint16 | Self::Uint32 | Self::Uint64)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported field type: {0}")]
pub struct UnsupportedType(pub String);

impl FromStr for PrimitiveType {
    type Err = UnsupportedType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "asset" => Ok(Self::Asset),
            "symbol" => Ok(Self::Symbol),
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "uint16" => Ok(Self::Uint16),
            "uint32" => Ok(Self::Uint32),
            "uint64" => Ok(Self::Uint64),
            other => Err(UnsupportedType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AutofillHint {
    #[default]
    None,
    SessionActor,
    TokenSymbol,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub primitive_type: PrimitiveType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub autofill: AutofillHint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub label: String,
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_parses_abi_names() {
        assert_eq!("uint64".parse::<PrimitiveType>(), Ok(PrimitiveType::Uint64));
        assert_eq!("asset".parse::<PrimitiveType>(), Ok(PrimitiveType::Asset));
        assert!("uint8".parse::<PrimitiveType>().is_err());
        assert!("name[]".parse::<PrimitiveType>().is_err());
    }

    #[test]
    fn unsupported_type_is_a_std_error() {
        let err = "uint8".parse::<PrimitiveType>().unwrap_err();
        let err: Box<dyn std::error::Error> = Box::new(err);
        assert_eq!(err.to_string(), "unsupported field type: uint8");
    }

    #[test]
    fn currency_stats_row_tolerates_missing_keys() {
        let row: CurrencyStatsRow = serde_json::from_str(r#"{"supply":"10.0000 WON"}"#).unwrap();
        assert_eq!(row.supply.as_deref(), Some("10.0000 WON"));
        assert!(row.issuer.is_none());
    }

    #[test]
    fn abi_response_decodes_type_keys() {
        let raw = r#"{
            "account_name": "w3won",
            "abi": {
                "version": "eosio::abi/1.2",
                "structs": [{
                    "name": "transfer",
                    "base": "",
                    "fields": [{"name": "to", "type": "name"}]
                }],
                "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
            }
        }"#;
        let response: GetAbiResponse = serde_json::from_str(raw).unwrap();
        let abi = response.abi.unwrap();
        assert_eq!(abi.structs[0].fields[0].type_name, "name");
        assert_eq!(abi.actions[0].type_name, "transfer");
        assert!(abi.types.is_empty());
    }
}
