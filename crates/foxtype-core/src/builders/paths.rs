//! `Api.Paths` namespaces with `Request` / `Response` interfaces.

use log::debug;

use super::{doc_block, success_response, EndpointBuilder};
use crate::error::Result;
use crate::model::{is_required_key, EndpointDetail, ParamDef, PropertyDef, PropertyKind};
use crate::naming::NamingState;
use crate::resolver::TypeResolver;
use crate::schema::push_member;

const NS_INDENT: &str = "    ";
const IFACE_INDENT: &str = "      ";
const MEMBER_INDENT: &str = "        ";

/// Builds one `namespace <ApiName> { interface Request; interface Response }`
#[derive(Debug, Clone)]
pub struct PathsBuilder<'a> {
    resolver: TypeResolver<'a>,
    success_name: String,
}

impl<'a> PathsBuilder<'a> {
    pub fn new(resolver: TypeResolver<'a>, success_name: impl Into<String>) -> Self {
        Self {
            resolver,
            success_name: success_name.into(),
        }
    }

    fn request(&self, detail: &EndpointDetail) -> String {
        let mut extends = String::new();
        let mut members = String::new();

        if let Some(body) = detail.request_body.as_ref() {
            if body.is_json() {
                if let Some(schema) = &body.json_schema {
                    extends = self.extends_clause(schema, "request body");
                    self.push_inline_properties(&mut members, schema);
                }
            } else if body.is_form() {
                self.push_params(&mut members, &body.parameters);
            } else if body.content_type != "none" && !body.content_type.is_empty() {
                debug!(
                    "{}: request body type '{}' is not typed",
                    detail.label(),
                    body.content_type
                );
            }
        }

        if let Some(params) = &detail.parameters {
            self.push_params(&mut members, &params.path);
            self.push_params(&mut members, &params.query);
        }

        format!(
            "{IFACE_INDENT}/** Request */\n{IFACE_INDENT}interface Request{extends} {{\n{members}{IFACE_INDENT}}}\n"
        )
    }

    fn response(&self, schema: Option<&PropertyDef>) -> String {
        let Some(schema) = schema else {
            return format!(
                "{IFACE_INDENT}/** Response */\n{IFACE_INDENT}interface Response {{\n{IFACE_INDENT}}}\n"
            );
        };

        // Arrays and primitives cannot be extended, alias them instead
        if matches!(
            schema.kind,
            PropertyKind::Array { .. }
                | PropertyKind::String { .. }
                | PropertyKind::Number
                | PropertyKind::Integer
                | PropertyKind::Boolean
        ) {
            return format!(
                "{IFACE_INDENT}/** Response */\n{IFACE_INDENT}type Response = {};\n",
                self.resolver.resolve(schema, "response", None)
            );
        }

        let extends = self.extends_clause(schema, "response");
        let mut members = String::new();
        self.push_inline_properties(&mut members, schema);
        format!(
            "{IFACE_INDENT}/** Response */\n{IFACE_INDENT}interface Response{extends} {{\n{members}{IFACE_INDENT}}}\n"
        )
    }

    /// ` extends Api.Schema.<Name>` for a resolvable `$ref`, empty otherwise
    fn extends_clause(&self, schema: &PropertyDef, context: &str) -> String {
        schema
            .reference()
            .and_then(|target| self.resolver.resolve_ref(target, context))
            .map(|name| format!(" extends Api.Schema.{name}"))
            .unwrap_or_default()
    }

    fn push_inline_properties(&self, out: &mut String, schema: &PropertyDef) {
        if let PropertyKind::Object {
            properties,
            required,
            ..
        } = &schema.kind
        {
            for (key, property) in properties.iter() {
                let optional = !is_required_key(required.as_ref(), key, property);
                let type_expr = self.resolver.resolve(property, key, None);
                push_member(
                    out,
                    MEMBER_INDENT,
                    key,
                    &type_expr,
                    optional,
                    property.description.as_deref(),
                );
            }
        }
    }

    fn push_params(&self, out: &mut String, params: &[ParamDef]) {
        for param in params.iter().filter(|p| p.is_enabled()) {
            let type_expr = self.resolver.resolve(&param.schema, &param.name, None);
            push_member(
                out,
                MEMBER_INDENT,
                &param.name,
                &type_expr,
                !param.required,
                param.schema.description.as_deref(),
            );
        }
    }
}

impl EndpointBuilder for PathsBuilder<'_> {
    fn build(&self, detail: &EndpointDetail, names: &mut NamingState) -> Result<String> {
        let success = success_response(detail, &self.success_name)?;
        let api_name = names.disambiguate(&detail.path, &detail.method);

        Ok(format!(
            "{}{NS_INDENT}namespace {api_name} {{\n{}\n{}{NS_INDENT}}}\n\n",
            doc_block(detail, NS_INDENT),
            self.request(detail),
            self.response(success.json_schema.as_ref()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::RegistryBuilder;
    use serde_json::json;

    fn build(detail: serde_json::Value) -> Result<String> {
        let mut builder = RegistryBuilder::new();
        builder.register("s1", "User").register("s2", "CreateUser");
        let registry = builder.build();
        let detail: EndpointDetail = serde_json::from_value(detail).unwrap();
        PathsBuilder::new(TypeResolver::new(&registry), "OK").build(&detail, &mut NamingState::new())
    }

    #[test]
    fn test_get_user() {
        let out = build(json!({
            "path": "/users/{id}",
            "method": "get",
            "name": "Get user",
            "parameters": {
                "path": [{"name": "id", "required": true, "type": "string", "description": "user id"}],
                "query": [{"name": "expand", "type": "boolean"}]
            },
            "responses": [{"name": "OK", "jsonSchema": {"$ref": "#/definitions/s1"}}]
        }))
        .unwrap();

        assert!(out.contains("    namespace AGetUsers_Id {\n"));
        assert!(out.contains("      interface Request {\n"));
        assert!(out.contains("        /** user id */\n        id: string;\n"));
        assert!(out.contains("        expand?: boolean;\n"));
        assert!(out.contains("      interface Response extends Api.Schema.User {\n      }\n"));
        assert!(out.contains("     * Path: /users/{id}\n"));
    }

    #[test]
    fn test_json_body_extends_schema() {
        let out = build(json!({
            "path": "/users",
            "method": "post",
            "requestBody": {"type": "application/json", "jsonSchema": {"$ref": "#/definitions/s2"}},
            "responses": [{"name": "OK", "jsonSchema": {"$ref": "#/definitions/s1"}}]
        }))
        .unwrap();
        assert!(out.contains("namespace APostUsers {"));
        assert!(out.contains("interface Request extends Api.Schema.CreateUser {\n      }\n"));
    }

    #[test]
    fn test_form_body_params() {
        let out = build(json!({
            "path": "/files",
            "method": "post",
            "requestBody": {
                "type": "multipart/form-data",
                "parameters": [{"name": "file", "required": true, "type": "string"}]
            },
            "responses": [{"name": "OK", "jsonSchema": {"type": "object", "properties": {
                "url": {"type": "string"},
                "kind": {"type": "string", "enum": ["IMAGE", "DOC"]}
            }, "required": ["url"]}}]
        }))
        .unwrap();
        assert!(out.contains("interface Request {\n        /**  */\n        file: string;\n"));
        assert!(out.contains("        url: string;\n"));
        assert!(out.contains("        kind?: \"IMAGE\" | \"DOC\";\n"));
    }

    #[test]
    fn test_inline_body_without_required_list() {
        let out = build(json!({
            "path": "/users",
            "method": "post",
            "requestBody": {"type": "application/json", "jsonSchema": {"type": "object", "properties": {
                "name": {"type": "string"},
                "nick": {"type": ["string", "null"]}
            }}},
            "responses": [{"name": "OK"}]
        }))
        .unwrap();
        assert!(out.contains("        name: string;\n"));
        assert!(out.contains("        nick?: string;\n"));
    }

    #[test]
    fn test_array_response_is_aliased() {
        let out = build(json!({
            "path": "/users",
            "method": "get",
            "responses": [{"name": "OK", "jsonSchema": {"type": "array", "items": {"$ref": "#/definitions/s1"}}}]
        }))
        .unwrap();
        assert!(out.contains("      type Response = Array<User>;\n"));
    }

    #[test]
    fn test_unresolved_ref_adds_no_extends() {
        let out = build(json!({
            "path": "/ghost",
            "method": "get",
            "responses": [{"name": "OK", "jsonSchema": {"$ref": "#/definitions/missing"}}]
        }))
        .unwrap();
        assert!(out.contains("interface Response {\n"));
    }

    #[test]
    fn test_missing_success_response() {
        let err = build(json!({
            "path": "/users",
            "method": "get",
            "responses": [{"name": "Not Found"}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MissingSuccessResponse { .. }));
    }

    #[test]
    fn test_disabled_params_skipped() {
        let out = build(json!({
            "path": "/users",
            "method": "get",
            "parameters": {"query": [
                {"name": "page", "type": "integer", "required": true},
                {"name": "legacy", "type": "string", "enable": false}
            ]},
            "responses": [{"name": "OK"}]
        }))
        .unwrap();
        assert!(out.contains("        page: number;\n"));
        assert!(!out.contains("legacy"));
        assert!(out.contains("      interface Response {\n      }\n"));
    }
}
