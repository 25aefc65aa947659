//! Schema id to display name lookup for `$ref` resolution.
//!
//! Building and reading are separate phases: a [`RegistryBuilder`] collects
//! every schema first and is then frozen into a [`ReferenceRegistry`], which
//! only offers lookups. Nothing can resolve against a half-built registry.

use std::collections::HashMap;

use crate::model::SchemaDef;

/// Mutable registry used while scanning schema definitions
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    names: HashMap<String, String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the display name for an id
    pub fn register(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.names.insert(id.into(), name.into());
        self
    }

    /// Freeze the registry; resolution is only available afterwards
    pub fn build(self) -> ReferenceRegistry {
        ReferenceRegistry { names: self.names }
    }
}

/// Read-only id to name mapping
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    names: HashMap<String, String>,
}

impl ReferenceRegistry {
    /// Scan all schemas and build the registry in one go
    pub fn from_schemas<'a>(schemas: impl IntoIterator<Item = &'a SchemaDef>) -> Self {
        let mut builder = RegistryBuilder::new();
        for schema in schemas {
            builder.register(schema.id.as_str(), schema.name.as_str());
        }
        builder.build()
    }

    /// Resolve a `$ref` string by its trailing path segment.
    ///
    /// `None` means the target is unknown; callers fall back to the `unknown`
    /// type instead of failing.
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let id = reference.rsplit('/').next().unwrap_or(reference);
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
