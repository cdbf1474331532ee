use crate::catalog::autofill_for;
use ft_api_types::{
    AbiDef, AbiField, AbiStruct, ActionDescriptor, FieldDescriptor, PrimitiveType, UnsupportedType,
};
use tracing::debug;

const MAX_RESOLVE_DEPTH: usize = 16;

/// Describe every ABI action whose fields all map onto supported primitives.
pub fn actions_from_abi(abi: &AbiDef) -> Vec<ActionDescriptor> {
    abi.actions
        .iter()
        .filter_map(|action| match action_fields(abi, &action.type_name) {
            Ok(fields) => {
                let (title, summary) = ricardian_metadata(&action.ricardian_contract);
                Some(ActionDescriptor {
                    name: action.name.clone(),
                    label: title.unwrap_or_else(|| action.name.clone()),
                    description: summary.unwrap_or_default(),
                    fields,
                })
            }
            Err(err) => {
                debug!(action = %action.name, error = %err, "skipping ABI action");
                None
            }
        })
        .collect()
}

/// `title:` and `summary:` from a ricardian contract's metadata header.
fn ricardian_metadata(contract: &str) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut summary = None;

    for line in contract.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix("title:") {
            title = title.or_else(|| clean_metadata(value));
        } else if let Some(value) = line.strip_prefix("summary:") {
            summary = summary.or_else(|| clean_metadata(value));
        }
    }

    (title, summary)
}

fn clean_metadata(value: &str) -> Option<String> {
    let value = value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .replace("{{nowrap ", "")
        .replace("{{", "")
        .replace("}}", "");
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn resolve_type<'a>(abi: &'a AbiDef, type_name: &'a str) -> &'a str {
    let mut current = type_name;
    for _ in 0..MAX_RESOLVE_DEPTH {
        match abi.types.iter().find(|alias| alias.new_type_name == current) {
            Some(alias) => current = &alias.type_name,
            None => break,
        }
    }
    current
}

fn find_struct<'a>(abi: &'a AbiDef, name: &str) -> Option<&'a AbiStruct> {
    abi.structs.iter().find(|s| s.name == name)
}

/// Fields of `struct_name`, base struct fields first.
fn struct_fields<'a>(
    abi: &'a AbiDef,
    struct_name: &str,
    depth: usize,
) -> Result<Vec<&'a AbiField>, UnsupportedType> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(UnsupportedType(format!("{struct_name} (base chain too deep)")));
    }

    let resolved = resolve_type(abi, struct_name);
    let definition =
        find_struct(abi, resolved).ok_or_else(|| UnsupportedType(resolved.to_owned()))?;

    let mut fields = if definition.base.is_empty() {
        Vec::new()
    } else {
        struct_fields(abi, &definition.base, depth + 1)?
    };
    fields.extend(definition.fields.iter());
    Ok(fields)
}

fn action_fields(abi: &AbiDef, type_name: &str) -> Result<Vec<FieldDescriptor>, UnsupportedType> {
    struct_fields(abi, type_name, 0)?
        .into_iter()
        .map(|field| field_descriptor(abi, field))
        .collect()
}

fn field_descriptor(abi: &AbiDef, field: &AbiField) -> Result<FieldDescriptor, UnsupportedType> {
    // `T?` is optional, `T$` is a binary extension that may be omitted.
    let (raw, optional) = match field
        .type_name
        .strip_suffix('?')
        .or_else(|| field.type_name.strip_suffix('$'))
    {
        Some(inner) => (inner, true),
        None => (field.type_name.as_str(), false),
    };

    let primitive_type: PrimitiveType = resolve_type(abi, raw).parse()?;
    Ok(FieldDescriptor {
        name: field.name.clone(),
        primitive_type,
        optional,
        autofill: autofill_for(&field.name, primitive_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_api_types::{AutofillHint, GetAbiResponse};

    const SETPOOL_RICARDIAN: &str = "---\nspec_version: \"0.2.0\"\ntitle: Configure Pool\n\
        summary: 'Update the pool settings of {{nowrap owner}}'\n---\nBody text";

    fn pool_abi() -> AbiDef {
        let raw = r#"{
            "account_name": "mon3y",
            "abi": {
                "version": "eosio::abi/1.2",
                "types": [{"new_type_name": "account_name", "type": "name"}],
                "structs": [
                    {"name": "owned", "base": "", "fields": [
                        {"name": "owner", "type": "account_name"}
                    ]},
                    {"name": "setpool", "base": "owned", "fields": [
                        {"name": "fee_bps", "type": "uint16"},
                        {"name": "paused", "type": "bool"},
                        {"name": "note", "type": "string?"}
                    ]},
                    {"name": "setmembers", "base": "", "fields": [
                        {"name": "members", "type": "name[]"}
                    ]},
                    {"name": "transfer", "base": "", "fields": [
                        {"name": "from", "type": "name"},
                        {"name": "to", "type": "name"},
                        {"name": "quantity", "type": "asset"},
                        {"name": "memo", "type": "string"}
                    ]}
                ],
                "actions": [
                    {"name": "setpool", "type": "setpool", "ricardian_contract": ""},
                    {"name": "setmembers", "type": "setmembers", "ricardian_contract": ""},
                    {"name": "transfer", "type": "transfer", "ricardian_contract": ""}
                ]
            }
        }"#;
        let response: GetAbiResponse = serde_json::from_str(raw).unwrap();
        let mut abi = response.abi.unwrap();
        abi.actions[0].ricardian_contract = SETPOOL_RICARDIAN.to_owned();
        abi
    }

    #[test]
    fn resolves_aliases_bases_and_optionals() {
        let actions = actions_from_abi(&pool_abi());
        let setpool = &actions[0];

        assert_eq!(setpool.name, "setpool");
        assert_eq!(setpool.label, "Configure Pool");
        assert_eq!(setpool.description, "Update the pool settings of owner");

        let fields: Vec<_> = setpool
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.primitive_type, f.optional))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("owner", PrimitiveType::Name, false),
                ("fee_bps", PrimitiveType::Uint16, false),
                ("paused", PrimitiveType::Bool, false),
                ("note", PrimitiveType::String, true),
            ]
        );
        assert_eq!(setpool.fields[0].autofill, AutofillHint::SessionActor);
    }

    #[test]
    fn skips_actions_with_unsupported_fields() {
        let names: Vec<_> = actions_from_abi(&pool_abi()).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["setpool".to_owned(), "transfer".to_owned()]);
    }

    #[test]
    fn label_falls_back_to_action_name() {
        let transfer = actions_from_abi(&pool_abi()).pop().unwrap();
        assert_eq!(transfer.label, "transfer");
        assert!(transfer.description.is_empty());
    }

    #[test]
    fn ricardian_without_header_yields_nothing() {
        assert_eq!(ricardian_metadata("plain text"), (None, None));
    }
}
