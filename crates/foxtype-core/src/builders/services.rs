//! Exported request functions, one per endpoint.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{doc_block, success_response, EndpointBuilder};
use crate::error::Result;
use crate::model::EndpointDetail;
use crate::naming::NamingState;
use crate::utils::{escape_ts_string, is_identifier};

static PATH_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("path param pattern is valid"));

/// Rewrite `{name}` tokens into template-literal interpolations of `params`
pub fn interpolate_path(path: &str) -> String {
    let escaped = path.replace('`', "\\`");
    PATH_PARAM_RE
        .replace_all(&escaped, |caps: &Captures| {
            let name = &caps[1];
            if is_identifier(name) {
                format!("${{params.{name}}}")
            } else {
                format!("${{params[\"{}\"]}}", escape_ts_string(name))
            }
        })
        .into_owned()
}

/// Whether the payload goes into the query string rather than the body
pub fn sends_query_params(method: &str) -> bool {
    matches!(method.to_uppercase().as_str(), "GET" | "DELETE")
}

/// Builds `export function <ApiName>(params) { return request(...) }`
#[derive(Debug, Clone)]
pub struct ServicesBuilder {
    success_name: String,
}

impl ServicesBuilder {
    pub fn new(success_name: impl Into<String>) -> Self {
        Self {
            success_name: success_name.into(),
        }
    }
}

impl EndpointBuilder for ServicesBuilder {
    fn build(&self, detail: &EndpointDetail, names: &mut NamingState) -> Result<String> {
        // Same check as the paths document so both skip the same endpoints
        success_response(detail, &self.success_name)?;
        let api_name = names.disambiguate(&detail.path, &detail.method);
        let method = detail.method.to_uppercase();
        let payload = if sends_query_params(&method) {
            "params,"
        } else {
            "data: params,"
        };

        Ok(format!(
            "{}export function {api_name}(params: Api.Paths.{api_name}.Request): Promise<Api.Paths.{api_name}.Response> {{\n  \
             return request<Api.Paths.{api_name}.Response>({{\n    \
             url: `{}`,\n    \
             method: \"{method}\",\n    \
             {payload}\n  \
             }});\n\
             }}\n\n",
            doc_block(detail, ""),
            interpolate_path(&detail.path),
        ))
    }
}
