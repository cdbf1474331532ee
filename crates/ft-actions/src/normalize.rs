use ft_api_types::{
    ActionDescriptor, AutofillHint, DEFAULT_PRECISION, FieldDescriptor, PrimitiveType,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Raw form input keyed by field name.
pub type FormValues = HashMap<String, String>;

const MAX_PRECISION: u8 = 18;
/// Asset amounts are signed 64-bit on chain.
const MAX_ASSET_UNITS: u128 = i64::MAX as u128;
/// Largest integer a JavaScript number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// What the form knows beyond its own inputs: the selected token, the signer
/// and any other token precisions already loaded.
#[derive(Debug, Clone)]
pub struct FormContext {
    pub token_symbol: String,
    pub token_precision: u8,
    pub actor: Option<String>,
    pub known_precisions: HashMap<String, u8>,
}

impl FormContext {
    pub fn new(token_symbol: &str, token_precision: u8) -> Self {
        Self {
            token_symbol: token_symbol.to_owned(),
            token_precision,
            actor: None,
            known_precisions: HashMap::new(),
        }
    }

    pub fn with_actor(mut self, actor: Option<String>) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_known_precision(mut self, symbol: &str, precision: u8) -> Self {
        self.known_precisions.insert(symbol.to_owned(), precision);
        self
    }

    fn precision_for(&self, code: &str) -> Option<u8> {
        if code == self.token_symbol {
            Some(self.token_precision)
        } else {
            self.known_precisions.get(code).copied()
        }
    }

    fn autofill(&self, hint: AutofillHint) -> Option<String> {
        match hint {
            AutofillHint::SessionActor => self.actor.clone(),
            AutofillHint::TokenSymbol => Some(self.token_symbol.clone()),
            AutofillHint::None => None,
        }
    }
}

/// Trimmed input for `field`, falling back to its autofill value.
fn effective_value(
    field: &FieldDescriptor,
    values: &FormValues,
    ctx: &FormContext,
) -> Option<String> {
    values
        .get(&field.name)
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| ctx.autofill(field.autofill))
        .filter(|value| !value.is_empty())
}

/// Names of required fields left blank, in declaration order.
pub fn missing_fields(
    action: &ActionDescriptor,
    values: &FormValues,
    ctx: &FormContext,
) -> Vec<String> {
    action
        .fields
        .iter()
        .filter(|field| !field.optional && effective_value(field, values, ctx).is_none())
        .map(|field| field.name.clone())
        .collect()
}

/// Turn raw form strings into the action's JSON data.
pub fn normalize_fields(
    action: &ActionDescriptor,
    values: &FormValues,
    ctx: &FormContext,
) -> Result<Map<String, Value>, FormError> {
    let missing = missing_fields(action, values, ctx);
    if !missing.is_empty() {
        return Err(FormError::MissingFields(missing));
    }

    let mut data = Map::new();
    for field in &action.fields {
        let value = match effective_value(field, values, ctx) {
            Some(raw) => normalize_value(field.primitive_type, &raw, ctx).map_err(|reason| {
                FormError::InvalidField {
                    field: field.name.clone(),
                    reason,
                }
            })?,
            None if field.primitive_type == PrimitiveType::String => {
                Value::String(String::new())
            }
            None => Value::Null,
        };
        data.insert(field.name.clone(), value);
    }
    Ok(data)
}

fn normalize_value(
    primitive_type: PrimitiveType,
    raw: &str,
    ctx: &FormContext,
) -> Result<Value, String> {
    match primitive_type {
        PrimitiveType::Name => normalize_name(raw).map(Value::String),
        PrimitiveType::Asset => normalize_asset(raw, ctx).map(Value::String),
        PrimitiveType::Symbol => normalize_symbol(raw, ctx).map(Value::String),
        PrimitiveType::String => Ok(Value::String(raw.to_owned())),
        PrimitiveType::Bool => parse_bool(raw).map(Value::Bool),
        PrimitiveType::Uint16 => parse_uint::<u16>(raw, u16::MAX.into()).map(Value::from),
        PrimitiveType::Uint32 => parse_uint::<u32>(raw, u32::MAX.into()).map(Value::from),
        PrimitiveType::Uint64 => parse_uint::<u64>(raw, u64::MAX).map(uint64_value),
    }
}

/// uint64 values beyond the JavaScript safe range travel as decimal strings.
fn uint64_value(value: u64) -> Value {
    if value > MAX_SAFE_INTEGER {
        Value::String(value.to_string())
    } else {
        Value::from(value)
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(format!("expected true or false, got '{raw}'")),
    }
}

fn parse_uint<T>(raw: &str, max: u64) -> Result<T, String>
where
    T: std::str::FromStr,
{
    raw.parse::<T>()
        .map_err(|_| format!("expected a whole number from 0 to {max}"))
}

/// Account names: 1-12 chars of `a-z`, `1-5` and `.`, not ending in `.`.
pub fn normalize_name(raw: &str) -> Result<String, String> {
    let name = raw.trim().to_ascii_lowercase();
    if name.is_empty() || name.len() > 12 {
        return Err(format!("'{raw}' must be 1 to 12 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || ('1'..='5').contains(&c) || c == '.')
    {
        return Err(format!("'{raw}' may only contain a-z, 1-5 and '.'"));
    }
    if name.ends_with('.') {
        return Err(format!("'{raw}' may not end with '.'"));
    }
    Ok(name)
}

fn symbol_code(raw: &str) -> Result<String, String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() || code.len() > 7 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(format!("'{raw}' is not a symbol code (1 to 7 letters)"));
    }
    Ok(code)
}

fn parse_precision(raw: &str) -> Result<u8, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= MAX_PRECISION)
        .ok_or_else(|| format!("precision must be 0 to {MAX_PRECISION}"))
}

/// `"WON"` becomes `"8,WON"` when WON has precision 8; `"4,WON"` is kept.
pub fn normalize_symbol(raw: &str, ctx: &FormContext) -> Result<String, String> {
    match raw.split_once(',') {
        Some((precision, code)) => {
            let precision = parse_precision(precision)?;
            Ok(format!("{precision},{}", symbol_code(code)?))
        }
        None => {
            let code = symbol_code(raw)?;
            let precision = ctx.precision_for(&code).unwrap_or(DEFAULT_PRECISION);
            Ok(format!("{precision},{code}"))
        }
    }
}

/// Bare numbers get the selected token's precision and symbol. A full
/// `"amount SYMBOL"` string keeps the typed amount: it is only padded with
/// zeros up to the symbol's known precision, and rejected if it has more
/// decimals than that.
pub fn normalize_asset(raw: &str, ctx: &FormContext) -> Result<String, String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    match parts.as_slice() {
        [amount] => {
            let quantity = format_quantity(amount, ctx.token_precision)?;
            Ok(format!("{quantity} {}", ctx.token_symbol))
        }
        [amount, code] => {
            let code = symbol_code(code)?;
            let places = decimal_places(amount)?;
            let precision = match ctx.precision_for(&code) {
                Some(precision) if places > precision => {
                    return Err(format!(
                        "'{amount}' has more than {precision} decimal places for {code}"
                    ));
                }
                Some(precision) => precision,
                None => places,
            };
            let quantity = format_quantity(amount, precision)?;
            Ok(format!("{quantity} {code}"))
        }
        _ => Err(format!("expected an amount or 'amount SYMBOL', got '{raw}'")),
    }
}

fn decimal_places(amount: &str) -> Result<u8, String> {
    let places = amount
        .split_once('.')
        .map(|(_, frac)| frac.len())
        .unwrap_or(0);
    u8::try_from(places)
        .ok()
        .filter(|p| *p <= MAX_PRECISION)
        .ok_or_else(|| format!("at most {MAX_PRECISION} decimal places allowed"))
}

/// Fixed-point rendering of a positive decimal string, rounded half-up.
pub fn format_quantity(amount: &str, precision: u8) -> Result<String, String> {
    let amount = amount.trim();
    if precision > MAX_PRECISION {
        return Err(format!("precision must be 0 to {MAX_PRECISION}"));
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(format!("'{amount}' is not a positive number"));
    }

    let precision = usize::from(precision);
    let kept = &fraction[..fraction.len().min(precision)];
    let round_up = fraction
        .as_bytes()
        .get(precision)
        .is_some_and(|digit| *digit >= b'5');

    let digits = format!("{whole}{kept:0<precision$}");
    let digits = digits.trim_start_matches('0');
    if digits.len() > 38 {
        return Err("amount is too large".to_owned());
    }
    let mut units: u128 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| "amount is too large".to_owned())?
    };
    if round_up {
        units += 1;
    }

    if units == 0 {
        return Err("amount must be greater than zero".to_owned());
    }
    if units > MAX_ASSET_UNITS {
        return Err("amount is too large".to_owned());
    }

    let padded = format!("{units:0>width$}", width = precision + 1);
    if precision == 0 {
        return Ok(padded);
    }
    let (int_part, frac_part) = padded.split_at(padded.len() - precision);
    Ok(format!("{int_part}.{frac_part}"))
}
