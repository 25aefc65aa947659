//! Per-endpoint emitters for the paths and services documents.
pub mod paths;
pub mod services;

use crate::error::{Error, Result};
use crate::model::{EndpointDetail, ResponseDef};
use crate::naming::NamingState;
use crate::utils::doc_text;

pub use paths::PathsBuilder;
pub use services::ServicesBuilder;

/// Trait for turning one endpoint detail into a fragment of a generated document.
///
/// Each document keeps its own [`NamingState`]; since every builder claims
/// exactly one name per endpoint it emits, replaying the same endpoint order
/// yields the same names in every document.
pub trait EndpointBuilder {
    fn build(&self, detail: &EndpointDetail, names: &mut NamingState) -> Result<String>;
}

/// Look up the success response an endpoint's `Response` type is built from
pub fn success_response<'d>(detail: &'d EndpointDetail, expected: &str) -> Result<&'d ResponseDef> {
    detail
        .responses
        .iter()
        .find(|response| response.name == expected)
        .ok_or_else(|| Error::MissingSuccessResponse {
            endpoint: detail.label(),
            expected: expected.to_string(),
        })
}

/// Documentation block carrying name, path, method and description
pub(crate) fn doc_block(detail: &EndpointDetail, indent: &str) -> String {
    format!(
        "{indent}/**\n\
         {indent} * Name: {}\n\
         {indent} * Path: {}\n\
         {indent} * Method: {}\n\
         {indent} * Description: {}\n\
         {indent} */\n",
        doc_text(&detail.name),
        doc_text(&detail.path),
        doc_text(&detail.method),
        doc_text(&detail.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(responses: serde_json::Value) -> EndpointDetail {
        serde_json::from_value(json!({
            "path": "/users",
            "method": "get",
            "name": "List users",
            "description": "All of them",
            "responses": responses
        }))
        .unwrap()
    }

    #[test]
    fn test_success_response_lookup() {
        let found = detail(json!([{"name": "Bad Request"}, {"name": "OK"}]));
        assert_eq!(success_response(&found, "OK").unwrap().name, "OK");

        let missing = detail(json!([{"name": "Bad Request"}]));
        let err = success_response(&missing, "OK").unwrap_err();
        assert!(matches!(err, Error::MissingSuccessResponse { .. }));
        assert!(err.to_string().contains("GET /users"));
    }

    #[test]
    fn test_doc_block() {
        let block = doc_block(&detail(json!([])), "  ");
        assert_eq!(
            block,
            "  /**\n   * Name: List users\n   * Path: /users\n   * Method: get\n   * Description: All of them\n   */\n"
        );
    }
}
