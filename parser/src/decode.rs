//! Decoder: raw bindings to typed values.

use std::collections::BTreeMap;

use command_args_core::{ArgumentRole, ArgumentSpec, Arity, Value, ValueKind};

use crate::consume::Binding;
use crate::error::{FailureKind, ParseFailure, Result};
use crate::token::Token;
use crate::values::ArgumentValues;

/// Typed values produced for one command layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLayer {
    /// The command's own arguments.
    pub arguments: ArgumentValues,
    /// Values of every group declared at this layer, keyed by group name.
    pub groups: BTreeMap<String, ArgumentValues>,
}

/// Decodes every binding of a layer, failing on the first problem in
/// binding order.
pub fn decode_layer(bindings: &[Binding<'_>], declared_groups: &[&str]) -> Result<DecodedLayer> {
    let mut layer = DecodedLayer::default();
    for group in declared_groups {
        layer.groups.entry(group.to_string()).or_default();
    }

    for binding in bindings {
        let Some(value) = decode_binding(binding)? else {
            continue;
        };
        let target = match binding.group {
            Some(group) => layer.groups.entry(group.to_string()).or_default(),
            None => &mut layer.arguments,
        };
        target.insert(&binding.spec.name, value);
    }

    Ok(layer)
}

/// Decodes one binding; `None` means an absent optional with no default.
pub fn decode_binding(binding: &Binding<'_>) -> Result<Option<Value>> {
    let spec = binding.spec;
    let tokens = &binding.tokens;

    if spec.role == ArgumentRole::Flag {
        return Ok(Some(decode_flag(spec, tokens.len())?));
    }

    match spec.arity {
        Arity::Array => {
            if tokens.is_empty() {
                // Arrays never fail when absent, `required` or not.
                let value = spec.default.clone().unwrap_or(Value::Array(Vec::new()));
                return Ok(Some(value));
            }
            let items = tokens
                .iter()
                .map(|t| coerce(spec, t))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Value::Array(items)))
        }
        Arity::Single | Arity::OptionalSingle => match tokens.last() {
            Some(token) => coerce(spec, token).map(Some),
            None => match &spec.default {
                Some(default) => Ok(Some(default.clone())),
                None if spec.required => Err(missing(spec)),
                None => Ok(None),
            },
        },
    }
}

fn decode_flag(spec: &ArgumentSpec, occurrences: usize) -> Result<Value> {
    if occurrences == 0 {
        if let Some(default) = &spec.default {
            return Ok(default.clone());
        }
        if spec.required && spec.arity != Arity::Array {
            return Err(missing(spec));
        }
    }
    Ok(match spec.arity {
        Arity::Array => Value::Integer(i64::try_from(occurrences).unwrap_or(i64::MAX)),
        Arity::Single | Arity::OptionalSingle => Value::Bool(occurrences > 0),
    })
}

fn coerce(spec: &ArgumentSpec, token: &Token) -> Result<Value> {
    match spec.value_kind {
        ValueKind::String => Ok(Value::String(token.raw.clone())),
        ValueKind::Integer => token.raw.parse::<i64>().map(Value::Integer).map_err(|_| {
            ParseFailure::new(FailureKind::InvalidValue)
                .at(token)
                .for_spec(spec)
        }),
    }
}

fn missing(spec: &ArgumentSpec) -> ParseFailure {
    ParseFailure::new(FailureKind::MissingArgument).for_spec(spec)
}
