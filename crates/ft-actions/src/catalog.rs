use ft_api_types::{ActionDescriptor, AutofillHint, FieldDescriptor, PrimitiveType};

/// Pre-fill policy shared by the static catalog and ABI-derived actions.
pub fn autofill_for(name: &str, primitive_type: PrimitiveType) -> AutofillHint {
    match (primitive_type, name) {
        (PrimitiveType::Name, "from" | "owner" | "ram_payer" | "payer") => {
            AutofillHint::SessionActor
        }
        (PrimitiveType::Symbol, _) => AutofillHint::TokenSymbol,
        _ => AutofillHint::None,
    }
}

fn field(name: &str, primitive_type: PrimitiveType, optional: bool) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_owned(),
        primitive_type,
        optional,
        autofill: autofill_for(name, primitive_type),
    }
}

fn action(
    name: &str,
    label: &str,
    description: &str,
    fields: Vec<FieldDescriptor>,
) -> ActionDescriptor {
    ActionDescriptor {
        name: name.to_owned(),
        label: label.to_owned(),
        description: description.to_owned(),
        fields,
    }
}

/// Actions every standard token contract exposes.
pub fn token_actions() -> Vec<ActionDescriptor> {
    use PrimitiveType as T;

    vec![
        action(
            "transfer",
            "Transfer",
            "Send tokens to another account.",
            vec![
                field("from", T::Name, false),
                field("to", T::Name, false),
                field("quantity", T::Asset, false),
                field("memo", T::String, true),
            ],
        ),
        action(
            "issue",
            "Issue",
            "Mint new supply to an account. Only the issuer may sign.",
            vec![
                field("to", T::Name, false),
                field("quantity", T::Asset, false),
                field("memo", T::String, true),
            ],
        ),
        action(
            "retire",
            "Burn",
            "Remove tokens from circulation. Only the issuer may sign.",
            vec![field("quantity", T::Asset, false), field("memo", T::String, true)],
        ),
        action(
            "open",
            "Open balance",
            "Create a zero balance row so an account can receive the token.",
            vec![
                field("owner", T::Name, false),
                field("symbol", T::Symbol, false),
                field("ram_payer", T::Name, false),
            ],
        ),
        action(
            "close",
            "Close balance",
            "Release the RAM held by an empty balance row.",
            vec![field("owner", T::Name, false), field("symbol", T::Symbol, false)],
        ),
    ]
}
