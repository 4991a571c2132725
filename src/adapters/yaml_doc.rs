// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the YAML-based adapters.
//!
//! Both structured formats are loaded into `serde_yaml::Value` trees rather than
//! typed structs: their schemas are open-ended and unknown keys must be tolerated.
//! JSON input goes through the same path since YAML is a superset of it.

use crate::domain::{ConvertError, Result};
use serde_yaml::{Mapping, Value};

/// Parses a document whose root must be a mapping.
///
/// An empty document is an empty mapping.
pub fn parse_root(content: &str, what: &str) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| ConvertError::from_yaml_error(&format!("Invalid {} document", what), e))?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ConvertError::parse(format!(
            "{} document root must be a mapping, found {}",
            what,
            type_name(&other)
        ))),
    }
}

/// Looks up a key that, when present and not null, must hold a mapping.
pub fn get_mapping<'a>(map: &'a Mapping, key: &str, context: &str) -> Result<Option<&'a Mapping>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(inner)) => Ok(Some(inner)),
        Some(other) => Err(ConvertError::parse(format!(
            "'{}' in {} must be a mapping, found {}",
            key,
            context,
            type_name(other)
        ))),
    }
}

/// Renders a scalar as text. Sequences, mappings and null yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Reads a value that is either one string or a list of strings.
///
/// A single string becomes a one-element list, commas included.
pub fn string_or_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Flattens a nested value into dotted `key=value` pairs, in document order.
///
/// Sequences of scalars are joined with `,`; other sequences are indexed.
pub fn flatten(value: &Value, prefix: &str, result: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (key, val) in map {
                if let Some(key_str) = scalar_to_string(key) {
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    flatten(val, &new_prefix, result);
                }
            }
        }
        Value::Sequence(seq) => {
            let scalars: Option<Vec<String>> = seq.iter().map(scalar_to_string).collect();
            match scalars {
                Some(items) => result.push((prefix.to_string(), items.join(","))),
                None => {
                    for (i, val) in seq.iter().enumerate() {
                        flatten(val, &format!("{}.{}", prefix, i), result);
                    }
                }
            }
        }
        Value::Null => result.push((prefix.to_string(), String::new())),
        scalar => {
            if let Some(text) = scalar_to_string(scalar) {
                result.push((prefix.to_string(), text));
            }
        }
    }
}

/// Inserts `value` at a dotted path, creating intermediate mappings.
///
/// A scalar already sitting on the path is replaced by a mapping.
pub fn insert_path(root: &mut Mapping, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for part in parents {
        let key = Value::String((*part).to_string());
        if !matches!(current.get(&key), Some(Value::Mapping(_))) {
            current.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        current = match current.get_mut(&key) {
            Some(Value::Mapping(inner)) => inner,
            _ => return,
        };
    }
    current.insert(Value::String((*last).to_string()), value);
}

/// Serializes a document, mapping failures to `GenerateError`.
pub fn to_yaml_string(document: &Mapping, format: &str) -> Result<String> {
    serde_yaml::to_string(document).map_err(|e| ConvertError::GenerateError {
        format: format.to_string(),
        message: "Failed to serialize document".to_string(),
        source: Some(Box::new(e)),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
