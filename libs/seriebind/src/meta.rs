//! Field metadata annotations.
//!
//! The annotation is a fixed external contract declared on record fields:
//! a comma-free first segment giving the explicit source name (empty means
//! "use the naming convention"), and an optional trailing marker selecting a
//! role. The bare annotation `-` marks a field ignored.
//!
//! Both the decode and encode paths consume the parsed descriptor, never the
//! raw text; descriptor tables are built once per record type and cached.

use crate::names::to_snake;

/// Role marker carried by an annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    None,
    /// String-coerced into the point's tag set on encode.
    Tag,
    /// Supplies the point's timestamp; excluded from tags and fields.
    Time,
    /// Never bound, never encoded.
    Ignore,
}

/// Parsed annotation: explicit source name plus role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub source: Option<String>,
    pub role: Role,
}

impl FieldMeta {
    /// Parse the annotation contract. Unknown markers are treated as no role.
    pub fn parse(annotation: &str) -> Self {
        if annotation == "-" {
            return Self { source: None, role: Role::Ignore };
        }
        let (name, marker) = match annotation.split_once(',') {
            Some((name, marker)) => (name, marker),
            None => (annotation, ""),
        };
        let role = match marker {
            "tag" => Role::Tag,
            "time" => Role::Time,
            "ignore" => Role::Ignore,
            _ => Role::None,
        };
        let source = if name.is_empty() { None } else { Some(name.to_string()) };
        Self { source, role }
    }
}

/// One record field in a descriptor table: declared field name, parsed
/// annotation, and the resolved source column (explicit name, or the
/// convention `to_snake(field)`).
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub field: &'static str,
    pub column: String,
    pub meta: FieldMeta,
}

impl FieldDescriptor {
    pub fn parse(field: &'static str, annotation: &str) -> Self {
        let meta = FieldMeta::parse(annotation);
        let column = match &meta.source {
            Some(source) => source.clone(),
            None => to_snake(field),
        };
        Self { field, column, meta }
    }
}
