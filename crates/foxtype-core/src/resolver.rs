//! Mapping from property definitions to TypeScript type expressions.

use log::warn;

use crate::model::{PropertyDef, PropertyKind};
use crate::registry::ReferenceRegistry;
use crate::utils::{capitalize_first, escape_ts_string, sanitize_type_name};

/// Type emitted wherever a reference or shape cannot be resolved
pub const UNKNOWN_TYPE: &str = "unknown";

/// Name of the hoisted alias for an enum property: `<Owner><Key>`
pub fn enum_alias_name(owner: &str, key: &str) -> String {
    sanitize_type_name(&format!("{}{}", owner, capitalize_first(key)))
}

/// Union of string literals in source order, e.g. `"A" | "B"`
pub fn enum_union(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", escape_ts_string(v)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Resolves property definitions against a finished [`ReferenceRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    registry: &'a ReferenceRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a ReferenceRegistry) -> Self {
        Self { registry }
    }

    /// Type expression for one property.
    ///
    /// With an `owner`, string enums refer to the hoisted `<Owner><Key>` alias.
    /// Without one (parameters, inline bodies) no alias exists, so the enum is
    /// written out as a literal union.
    pub fn resolve(&self, property: &PropertyDef, key: &str, owner: Option<&str>) -> String {
        match &property.kind {
            PropertyKind::String {
                enum_values: Some(values),
            } => match owner {
                Some(owner) => enum_alias_name(owner, key),
                None => enum_union(values),
            },
            PropertyKind::String { enum_values: None } => "string".to_string(),
            PropertyKind::Boolean => "boolean".to_string(),
            PropertyKind::Integer | PropertyKind::Number => "number".to_string(),
            PropertyKind::Array { items } => {
                format!("Array<{}>", self.element_type(items.as_deref(), key))
            }
            PropertyKind::Object {
                additional_properties: Some(values),
                ..
            } if values.has_type() => {
                format!("{{[key: string]: {}}}", self.resolve(values, key, None))
            }
            PropertyKind::Object { .. } => "{[key: string]: object}".to_string(),
            PropertyKind::Ref(target) => self
                .resolve_ref(target, key)
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            PropertyKind::Unknown => UNKNOWN_TYPE.to_string(),
        }
    }

    /// Sanitized schema name for a `$ref`, or `None` when the id is unknown
    pub fn resolve_ref(&self, reference: &str, context: &str) -> Option<String> {
        match self.registry.resolve(reference) {
            Some(name) if !name.is_empty() => Some(sanitize_type_name(name)),
            _ => {
                warn!(
                    "unresolved reference '{}' at '{}', using '{}'",
                    reference, context, UNKNOWN_TYPE
                );
                None
            }
        }
    }

    fn element_type(&self, items: Option<&PropertyDef>, key: &str) -> String {
        let Some(items) = items else {
            return UNKNOWN_TYPE.to_string();
        };
        match &items.kind {
            PropertyKind::String { .. } => "string".to_string(),
            PropertyKind::Integer | PropertyKind::Number => "number".to_string(),
            PropertyKind::Boolean => "boolean".to_string(),
            PropertyKind::Object { .. } => "object".to_string(),
            PropertyKind::Array { .. } => self.resolve(items, key, None),
            PropertyKind::Ref(target) => self
                .resolve_ref(target, key)
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            PropertyKind::Unknown => UNKNOWN_TYPE.to_string(),
        }
    }
}
