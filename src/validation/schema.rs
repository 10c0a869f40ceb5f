//! Static schema tables describing API models.
//!
//! Every model that is decoded from a response body carries a [`ModelSchema`]:
//! an explicit table mapping each member name to its wire name and type. The
//! table is consulted at decode time, so a wire name that does not follow the
//! mechanical camelCase rule (see [`to_camel_case`]) is just another entry.

use serde::de::DeserializeOwned;

/// The declared type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Absolute `http`/`https` URL.
    Url,
    /// RFC 3339 date-time.
    DateTime,
    /// Nested object described by its own schema.
    Model(&'static ModelSchema),
    /// JSON array whose items all have the given type.
    Array(&'static FieldType),
}

impl FieldType {
    /// Human readable name used in error messages.
    pub fn name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Url => "URL".to_string(),
            FieldType::DateTime => "date-time".to_string(),
            FieldType::Model(schema) => format!("object ({})", schema.name),
            FieldType::Array(item) => format!("array of {}", item.name()),
        }
    }
}

/// A single member-to-wire mapping.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    /// Rust member name (snake_case)
    pub member: &'static str,
    /// Name used in the JSON payload
    pub wire: &'static str,
    /// Declared type
    pub field_type: FieldType,
    /// Whether the field must be present and non-null
    pub required: bool,
}

impl FieldDefinition {
    /// A required field.
    pub const fn required(member: &'static str, wire: &'static str, field_type: FieldType) -> Self {
        Self {
            member,
            wire,
            field_type,
            required: true,
        }
    }

    /// An optional field; the model's serde default applies when it is absent.
    pub const fn optional(member: &'static str, wire: &'static str, field_type: FieldType) -> Self {
        Self {
            member,
            wire,
            field_type,
            required: false,
        }
    }
}

/// A schema for one model.
#[derive(Debug)]
pub struct ModelSchema {
    /// Model name, used as the path of a payload that is not an object
    pub name: &'static str,
    /// Field definitions in declaration order
    pub fields: &'static [FieldDefinition],
}

impl ModelSchema {
    /// Find a field by its wire name.
    pub fn by_wire(&self, wire: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.wire == wire)
    }

    /// Find a field by its member name.
    pub fn by_member(&self, member: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.member == member)
    }
}

/// A model that can be decoded from a JSON payload through its schema.
pub trait WireModel: DeserializeOwned {
    /// The schema consulted when decoding this model.
    const SCHEMA: &'static ModelSchema;
}

/// Mechanical snake_case to camelCase conversion (`design_title` -> `designTitle`).
pub fn to_camel_case(member: &str) -> String {
    let mut out = String::with_capacity(member.len());
    let mut upper_next = false;
    for c in member.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
