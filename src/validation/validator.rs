//! Core validation logic for JSON payloads against model schemas.
//!
//! Validation walks the schema table, looks every field up by its wire name,
//! and rebuilds the object keyed by member names. All failures are collected
//! before anything is reported, so one decode call names every offending path.

use crate::validation::error::ValidationError;
use crate::validation::schema::{FieldType, ModelSchema, WireModel};
use serde::Serialize;
use serde_json::{Map, Value};

/// Validate `payload` against `T::SCHEMA` and deserialize it.
pub fn decode<T: WireModel>(payload: &Value) -> Result<T, ValidationError> {
    let schema = T::SCHEMA;
    let mut errors = Vec::new();

    let normalized = match payload {
        Value::Object(object) => validate_object(object, schema, "", &mut errors),
        other => {
            errors.push(ValidationError::InvalidType {
                field_path: schema.name.to_string(),
                expected: "object".to_string(),
                found: get_type_name(other),
            });
            Value::Null
        }
    };

    if let Some(error) = ValidationError::from_collected(errors) {
        tracing::debug!("{} payload failed validation: {}", schema.name, error);
        return Err(error);
    }

    serde_json::from_value(normalized).map_err(|e| {
        tracing::error!("Failed to deserialize validated {} payload: {}", schema.name, e);
        ValidationError::Deserialize(format!("{}: {}", schema.name, e))
    })
}

/// Serialize `model` and rename its members back to wire names.
pub fn encode<T: WireModel + Serialize>(model: &T) -> Result<Value, ValidationError> {
    let value =
        serde_json::to_value(model).map_err(|e| ValidationError::Deserialize(e.to_string()))?;
    Ok(to_wire(value, T::SCHEMA))
}

fn to_wire(value: Value, schema: &ModelSchema) -> Value {
    let Value::Object(object) = value else {
        return value;
    };

    let mut out = Map::with_capacity(object.len());
    for (member, field_value) in object {
        match schema.by_member(&member) {
            Some(field) => {
                out.insert(field.wire.to_string(), type_to_wire(field_value, &field.field_type));
            }
            None => {
                out.insert(member, field_value);
            }
        }
    }
    Value::Object(out)
}

fn type_to_wire(value: Value, field_type: &FieldType) -> Value {
    match (field_type, value) {
        (FieldType::Model(schema), value) => to_wire(value, schema),
        (FieldType::Array(item), Value::Array(items)) => {
            Value::Array(items.into_iter().map(|v| type_to_wire(v, item)).collect())
        }
        (_, value) => value,
    }
}

/// Validate an object against a schema, returning it keyed by member names
fn validate_object(
    object: &Map<String, Value>,
    schema: &ModelSchema,
    parent_path: &str,
    errors: &mut Vec<ValidationError>,
) -> Value {
    let mut normalized = Map::with_capacity(schema.fields.len());

    for field in schema.fields {
        let field_path = join_path(parent_path, field.wire);

        match object.get(field.wire) {
            None | Some(Value::Null) if !field.required => {}
            None => {
                errors.push(ValidationError::MissingRequiredField { field_path });
            }
            Some(value) => {
                if let Some(checked) = validate_value(value, &field.field_type, &field_path, errors)
                {
                    normalized.insert(field.member.to_string(), checked);
                }
            }
        }
    }

    Value::Object(normalized)
}

/// Validate a single value, returning its normalized form when it matches
fn validate_value(
    value: &Value,
    field_type: &FieldType,
    field_path: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    let mismatch = |errors: &mut Vec<ValidationError>| {
        errors.push(ValidationError::InvalidType {
            field_path: field_path.to_string(),
            expected: field_type.name(),
            found: get_type_name(value),
        });
        None
    };

    match field_type {
        FieldType::String => match value {
            Value::String(_) => Some(value.clone()),
            _ => mismatch(errors),
        },
        FieldType::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            _ => mismatch(errors),
        },
        FieldType::Integer => {
            let Value::Number(n) = value else {
                return mismatch(errors);
            };
            if let Some(i) = n.as_i64() {
                return Some(Value::from(i));
            }
            // Integral floats such as `3.0` are accepted
            let integral = n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
            if !integral {
                return mismatch(errors);
            }
            match n.as_f64() {
                Some(f) if n.is_f64() && f.abs() < i64::MAX as f64 => Some(Value::from(f as i64)),
                _ => {
                    errors.push(ValidationError::InvalidFormat {
                        field_path: field_path.to_string(),
                        expected: "integer".to_string(),
                        reason: format!("{} is out of range for a 64-bit signed integer", n),
                    });
                    None
                }
            }
        }
        FieldType::Float => match value {
            Value::Number(_) => Some(value.clone()),
            _ => mismatch(errors),
        },
        FieldType::Url => {
            let Some(raw) = value.as_str() else {
                return mismatch(errors);
            };
            match url::Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(value.clone()),
                Ok(url) => {
                    errors.push(ValidationError::InvalidFormat {
                        field_path: field_path.to_string(),
                        expected: "URL".to_string(),
                        reason: format!("unsupported scheme '{}'", url.scheme()),
                    });
                    None
                }
                Err(e) => {
                    errors.push(ValidationError::InvalidFormat {
                        field_path: field_path.to_string(),
                        expected: "URL".to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        }
        FieldType::DateTime => {
            let Some(raw) = value.as_str() else {
                return mismatch(errors);
            };
            match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(parsed) => Some(Value::String(parsed.to_rfc3339())),
                Err(e) => {
                    errors.push(ValidationError::InvalidFormat {
                        field_path: field_path.to_string(),
                        expected: "date-time".to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        }
        FieldType::Model(schema) => match value {
            Value::Object(object) => Some(validate_object(object, schema, field_path, errors)),
            _ => mismatch(errors),
        },
        FieldType::Array(item_type) => {
            let Value::Array(items) = value else {
                return mismatch(errors);
            };
            let before = errors.len();
            let checked: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    validate_value(item, item_type, &format!("{}[{}]", field_path, i), errors)
                })
                .collect();
            (errors.len() == before).then_some(Value::Array(checked))
        }
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Get the type name of a JSON value as a string
fn get_type_name(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) if n.is_f64() => "float".to_string(),
        Value::Number(_) => "integer".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
