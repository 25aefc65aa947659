//! Tera templates for the three generated documents.
//!
//! The builders produce the declaration bodies; the templates only wrap them
//! in the surrounding namespaces and imports. Each built-in template can be
//! replaced by a `<name>.tera` file in a template directory.

use std::path::Path;

use log::info;
use tera::{Context, Tera};
use tokio::fs;

use crate::error::Result;
use crate::utils::escape_ts_string;

pub const SCHEMA_TEMPLATE: &str = "schema.d.ts";
pub const PATHS_TEMPLATE: &str = "paths.d.ts";
pub const SERVICES_TEMPLATE: &str = "services.ts";

const SCHEMA_SOURCE: &str = "declare namespace Api {
  namespace Schema {
{{ declarations }}  }
}
";

const PATHS_SOURCE: &str = "declare namespace Api {
  namespace Paths {
{{ declarations }}  }
}
";

const SERVICES_SOURCE: &str = "/** Tip: `request` is not generated, the consuming project must provide it */
import request from \"{{ request_import }}\";

{{ functions }}";

/// The compiled document templates
#[derive(Debug)]
pub struct DocumentTemplates {
    tera: Tera,
}

impl DocumentTemplates {
    /// Templates shipped with the library
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (SCHEMA_TEMPLATE, SCHEMA_SOURCE),
            (PATHS_TEMPLATE, PATHS_SOURCE),
            (SERVICES_TEMPLATE, SERVICES_SOURCE),
        ])?;
        Ok(Self { tera })
    }

    /// Built-in templates, with any `<name>.tera` file in `dir` taking precedence
    pub async fn load(dir: Option<&Path>) -> Result<Self> {
        let mut templates = Self::builtin()?;
        let Some(dir) = dir else {
            return Ok(templates);
        };

        for name in [SCHEMA_TEMPLATE, PATHS_TEMPLATE, SERVICES_TEMPLATE] {
            let path = dir.join(format!("{}.tera", name));
            if fs::try_exists(&path).await? {
                info!("using template override {}", path.display());
                let source = fs::read_to_string(&path).await?;
                templates.tera.add_raw_template(name, &source)?;
            }
        }
        Ok(templates)
    }

    pub fn render_schema(&self, declarations: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("declarations", declarations);
        Ok(self.tera.render(SCHEMA_TEMPLATE, &context)?)
    }

    pub fn render_paths(&self, declarations: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("declarations", declarations);
        Ok(self.tera.render(PATHS_TEMPLATE, &context)?)
    }

    pub fn render_services(&self, functions: &str, request_import: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("functions", functions);
        context.insert("request_import", &escape_ts_string(request_import));
        Ok(self.tera.render(SERVICES_TEMPLATE, &context)?)
    }
}
