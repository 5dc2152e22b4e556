//! Schema registry.
//!
//! Every flow input and output is a plain struct deriving `serde`,
//! `schemars::JsonSchema` and `validator::Validate`. [`FlowSchema`] is
//! implemented for all of them and offers the derived JSON schema, a prompt
//! field guide, structural validation of untyped candidates and the
//! field-level rules.
//!
//! # Examples
//!
//! ```
//! use estudio_core::validation::non_blank;
//! use estudio_error::SchemaErrorKind;
//! use estudio_flows::FlowSchema;
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use validator::Validate;
//!
//! #[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
//! #[serde(rename_all = "camelCase")]
//! struct Headline {
//!     /// Texto principal
//!     #[validate(custom(function = "non_blank"))]
//!     main_text: String,
//! }
//!
//! let err = Headline::from_value(json!({})).unwrap_err();
//! assert_eq!(err.field, "mainText");
//! assert_eq!(err.kind, SchemaErrorKind::MissingField);
//!
//! let err = Headline::from_value(json!({"mainText": "  "})).unwrap_err();
//! assert_eq!(err.kind, SchemaErrorKind::Empty);
//! ```

use estudio_core::validation::{CODE_BLANK, CODE_DATA_URI};
use estudio_error::{SchemaErrorKind, SchemaValidationError};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Shape and rules of a flow input or output.
pub trait FlowSchema:
    Serialize + DeserializeOwned + JsonSchema + Validate + Send + Sync + 'static
{
    /// JSON schema derived from the struct definition.
    fn schema_value() -> Value {
        schemars::schema_for!(Self).to_value()
    }

    /// One line per top-level field: name, whether it is required, its
    /// description and, for closed enums, the allowed values.
    fn field_guide() -> String {
        let schema = Self::schema_value();
        let required = required_fields(&schema);
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return String::new();
        };

        properties
            .iter()
            .map(|(name, node)| {
                let mut line = format!("- {}", name);
                if required.iter().any(|r| r == name) {
                    line.push_str(" (obrigatório)");
                }
                if let Some(description) = node.get("description").and_then(Value::as_str) {
                    line.push_str(": ");
                    line.push_str(description);
                }
                let allowed = allowed_values(&schema, node);
                if !allowed.is_empty() {
                    line.push_str(&format!(" [valores: {}]", allowed.join(", ")));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Validate an untyped candidate and convert it.
    ///
    /// Structural checks against the derived schema come first so that the
    /// error names the offending field; typed deserialization and the field
    /// rules follow.
    fn from_value(value: Value) -> Result<Self, SchemaValidationError> {
        let schema = Self::schema_value();
        check_node(&schema, &schema, &value, "")?;
        let typed: Self = serde_json::from_value(value)
            .map_err(|e| SchemaValidationError::new("$", SchemaErrorKind::Invalid(e.to_string())))?;
        typed.check()?;
        Ok(typed)
    }

    /// Run the derived field rules on an already typed value.
    fn check(&self) -> Result<(), SchemaValidationError> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => Err(first_violation(&errors, "")
                .unwrap_or_else(|| SchemaValidationError::new("$", SchemaErrorKind::Invalid(errors.to_string())))),
        }
    }
}

impl<T> FlowSchema for T where
    T: Serialize + DeserializeOwned + JsonSchema + Validate + Send + Sync + 'static
{
}

fn required_fields(node: &Value) -> Vec<String> {
    node.get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn resolve<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
    let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
        return node;
    };
    let name = reference
        .strip_prefix("#/$defs/")
        .or_else(|| reference.strip_prefix("#/definitions/"));
    match name {
        Some(name) => root
            .get("$defs")
            .or_else(|| root.get("definitions"))
            .and_then(|defs| defs.get(name))
            .unwrap_or(node),
        None => node,
    }
}

/// Members of a closed enumeration, in declaration order.
fn allowed_values(root: &Value, node: &Value) -> Vec<String> {
    let node = resolve(root, node);
    if let Some(members) = node.get("enum").and_then(Value::as_array) {
        return members.iter().filter_map(Value::as_str).map(str::to_string).collect();
    }
    if let Some(member) = node.get("const").and_then(Value::as_str) {
        return vec![member.to_string()];
    }
    ["oneOf", "anyOf"]
        .iter()
        .filter_map(|key| node.get(*key).and_then(Value::as_array))
        .flatten()
        .flat_map(|alternative| allowed_values(root, alternative))
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    let found = json_type(value);
    expected == found || (expected == "number" && found == "integer")
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn field_name(path: &str) -> String {
    if path.is_empty() { "$".to_string() } else { path.to_string() }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn accepts_null(root: &Value, node: &Value) -> bool {
    let node = resolve(root, node);
    match node.get("type") {
        Some(Value::String(t)) if t == "null" => return true,
        Some(Value::Array(types)) if types.iter().any(|t| t == "null") => return true,
        _ => {}
    }
    ["anyOf", "oneOf"]
        .iter()
        .filter_map(|key| node.get(*key).and_then(Value::as_array))
        .flatten()
        .any(|alternative| accepts_null(root, alternative))
}

fn check_node(
    root: &Value,
    node: &Value,
    value: &Value,
    path: &str,
) -> Result<(), SchemaValidationError> {
    let node = resolve(root, node);

    if let Some(members) = node.get("enum").and_then(Value::as_array) {
        if members.contains(value) {
            return Ok(());
        }
        return Err(unknown_variant(root, node, value, path));
    }

    if let Some(member) = node.get("const") {
        if member == value {
            return Ok(());
        }
        return Err(unknown_variant(root, node, value, path));
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(alternatives) = node.get(key).and_then(Value::as_array) {
            let mut first_error = None;
            for alternative in alternatives {
                match check_node(root, alternative, value, path) {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        let is_null_branch = resolve(root, alternative)
                            .get("type")
                            .is_some_and(|t| t == "null");
                        if first_error.is_none() && !is_null_branch {
                            first_error = Some(e);
                        }
                    }
                }
            }
            let all_constants = alternatives.iter().all(|alternative| {
                let alternative = resolve(root, alternative);
                alternative.get("const").is_some() || alternative.get("enum").is_some()
            });
            if all_constants {
                return Err(unknown_variant(root, node, value, path));
            }
            return Err(first_error.unwrap_or_else(|| {
                SchemaValidationError::new(field_name(path), SchemaErrorKind::Invalid(key.to_string()))
            }));
        }
    }

    if let Some(expected) = node.get("type") {
        let expected: Vec<&str> = match expected {
            Value::String(t) => vec![t.as_str()],
            Value::Array(types) => types.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !expected.is_empty() && !expected.iter().any(|t| type_matches(t, value)) {
            return Err(SchemaValidationError::new(
                field_name(path),
                SchemaErrorKind::WrongType {
                    expected: expected.join(" or "),
                    found: json_type(value).to_string(),
                },
            ));
        }
    }

    match value {
        Value::Object(fields) => check_object(root, node, fields, path),
        Value::Array(items) => {
            if let Some(item_schema) = node.get("items") {
                for (index, item) in items.iter().enumerate() {
                    check_node(root, item_schema, item, &format!("{}[{}]", field_name(path), index))?;
                }
            }
            match node.get("minItems").and_then(Value::as_u64) {
                Some(min) if (items.len() as u64) < min => Err(SchemaValidationError::new(
                    field_name(path),
                    SchemaErrorKind::Invalid(format!("must have at least {} items", min)),
                )),
                _ => Ok(()),
            }
        }
        Value::String(text) => {
            let length = text.chars().count() as u64;
            let min = node.get("minLength").and_then(Value::as_u64).unwrap_or(0);
            let max = node.get("maxLength").and_then(Value::as_u64).unwrap_or(u64::MAX);
            if length < min {
                let kind = if text.trim().is_empty() {
                    SchemaErrorKind::Empty
                } else {
                    SchemaErrorKind::Invalid(format!("must have at least {} characters", min))
                };
                return Err(SchemaValidationError::new(field_name(path), kind));
            }
            if length > max {
                return Err(SchemaValidationError::new(
                    field_name(path),
                    SchemaErrorKind::Invalid(format!("must have at most {} characters", max)),
                ));
            }
            Ok(())
        }
        Value::Number(number) => {
            let n = number.as_f64().unwrap_or_default();
            if let Some(min) = node.get("minimum").and_then(Value::as_f64) {
                if n < min {
                    return Err(SchemaValidationError::new(
                        field_name(path),
                        SchemaErrorKind::Invalid(format!("must be at least {}", min)),
                    ));
                }
            }
            if let Some(max) = node.get("maximum").and_then(Value::as_f64) {
                if n > max {
                    return Err(SchemaValidationError::new(
                        field_name(path),
                        SchemaErrorKind::Invalid(format!("must be at most {}", max)),
                    ));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_object(
    root: &Value,
    node: &Value,
    fields: &Map<String, Value>,
    path: &str,
) -> Result<(), SchemaValidationError> {
    let properties = node.get("properties").and_then(Value::as_object);

    for name in required_fields(node) {
        let field_schema = properties.and_then(|p| p.get(&name));
        let missing = match fields.get(&name) {
            None => true,
            Some(Value::Null) => !field_schema.is_some_and(|s| accepts_null(root, s)),
            Some(_) => false,
        };
        if missing {
            return Err(SchemaValidationError::new(
                child_path(path, &name),
                SchemaErrorKind::MissingField,
            ));
        }
    }

    if let Some(properties) = properties {
        for (name, field_schema) in properties {
            if let Some(field_value) = fields.get(name) {
                check_node(root, field_schema, field_value, &child_path(path, name))?;
            }
        }
    }
    Ok(())
}

fn unknown_variant(root: &Value, node: &Value, value: &Value, path: &str) -> SchemaValidationError {
    SchemaValidationError::new(
        field_name(path),
        SchemaErrorKind::UnknownVariant {
            value: describe(value),
            allowed: allowed_values(root, node).join(", "),
        },
    )
}

/// `physical_appearance` -> `physicalAppearance`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn first_violation(errors: &ValidationErrors, path: &str) -> Option<SchemaValidationError> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(name, _)| name.to_string());

    for (name, kind) in entries {
        let field = child_path(path, &camel_case(&name.to_string()));
        match kind {
            ValidationErrorsKind::Field(violations) => {
                if let Some(violation) = violations.first() {
                    let kind = match violation.code.as_ref() {
                        CODE_BLANK => SchemaErrorKind::Empty,
                        CODE_DATA_URI => SchemaErrorKind::Invalid(format!(
                            "expected a data:<mime>;base64,<data> URI ({})",
                            violation
                                .message
                                .as_deref()
                                .unwrap_or("malformed")
                        )),
                        code => SchemaErrorKind::Invalid(
                            violation
                                .message
                                .as_deref()
                                .unwrap_or(code)
                                .to_string(),
                        ),
                    };
                    return Some(SchemaValidationError::new(field, kind));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                if let Some(found) = first_violation(nested, &field) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    if let Some(found) = first_violation(nested, &format!("{}[{}]", field, index)) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_converts_snake_names() {
        assert_eq!(camel_case("physical_appearance"), "physicalAppearance");
        assert_eq!(camel_case("name"), "name");
        assert_eq!(camel_case("reference_image_data_uri"), "referenceImageDataUri");
    }

    #[test]
    fn json_types_distinguish_integers() {
        assert!(type_matches("number", &serde_json::json!(3)));
        assert!(!type_matches("integer", &serde_json::json!(3.5)));
        assert!(!type_matches("string", &Value::Null));
    }
}
