//! Interface and enum alias declarations for the `Api.Schema` namespace.

use crate::model::{PropertyKind, SchemaDef};
use crate::resolver::{enum_alias_name, enum_union, TypeResolver};
use crate::utils::{doc_text, quote_if_needed, sanitize_type_name};

const DECL_INDENT: &str = "    ";
const MEMBER_INDENT: &str = "      ";

/// Append one interface member with its doc comment
pub(crate) fn push_member(
    out: &mut String,
    indent: &str,
    key: &str,
    type_expr: &str,
    optional: bool,
    description: Option<&str>,
) {
    let marker = if optional { "?" } else { "" };
    out.push_str(&format!(
        "{indent}/** {} */\n{indent}{}{marker}: {type_expr};\n",
        doc_text(description.unwrap_or_default()),
        quote_if_needed(key),
    ));
}

/// Emits the schema document body
#[derive(Debug, Clone, Copy)]
pub struct DeclarationEmitter<'a> {
    resolver: TypeResolver<'a>,
}

impl<'a> DeclarationEmitter<'a> {
    pub fn new(resolver: TypeResolver<'a>) -> Self {
        Self { resolver }
    }

    /// All enum aliases first, then one interface per schema, both in source order
    pub fn emit(&self, schemas: &[SchemaDef]) -> String {
        let mut out = String::new();
        for schema in schemas {
            out.push_str(&self.emit_enum_aliases(schema));
        }
        for schema in schemas {
            out.push_str(&self.emit_interface(schema));
        }
        out
    }

    /// One `type` alias per string-enum property of the schema
    pub fn emit_enum_aliases(&self, schema: &SchemaDef) -> String {
        let owner = sanitize_type_name(&schema.title);
        let mut out = String::new();
        for (key, property) in schema.properties.iter() {
            if let PropertyKind::String {
                enum_values: Some(values),
            } = &property.kind
            {
                out.push_str(&format!(
                    "{DECL_INDENT}/** {} */\n{DECL_INDENT}type {} = {};\n\n",
                    doc_text(property.description.as_deref().unwrap_or_default()),
                    enum_alias_name(&owner, key),
                    enum_union(values),
                ));
            }
        }
        out
    }

    pub fn emit_interface(&self, schema: &SchemaDef) -> String {
        let owner = sanitize_type_name(&schema.title);
        let mut out = format!(
            "{DECL_INDENT}/** {} */\n{DECL_INDENT}interface {} {{\n",
            doc_text(schema.description.as_deref().unwrap_or_default()),
            owner,
        );
        for (key, property) in schema.properties.iter() {
            let type_expr = self.resolver.resolve(property, key, Some(&owner));
            push_member(
                &mut out,
                MEMBER_INDENT,
                key,
                &type_expr,
                !schema.is_required(key, property),
                property.description.as_deref(),
            );
        }
        out.push_str(&format!("{DECL_INDENT}}}\n\n"));
        out
    }
}
