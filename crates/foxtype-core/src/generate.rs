//! Two-phase generation pipeline.
//!
//! Phase one reads every schema, freezes the [`ReferenceRegistry`] and emits
//! the schema document. Phase two flattens the endpoint tree, fetches each
//! endpoint detail in order and converts it right away into the paths and
//! services documents.

// Internal imports (std, crate)
use std::path::{Component, Path};

use crate::builders::{EndpointBuilder, PathsBuilder, ServicesBuilder};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::naming::NamingState;
use crate::registry::ReferenceRegistry;
use crate::render::{DocumentTemplates, PATHS_TEMPLATE, SCHEMA_TEMPLATE, SERVICES_TEMPLATE};
use crate::resolver::TypeResolver;
use crate::schema::DeclarationEmitter;
use crate::source::DocumentSource;
use crate::tree::flatten_endpoint_ids;

// External imports (alphabetized)
use log::{info, warn};
use tokio::fs;

/// The three generated documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub schema: String,
    pub paths: String,
    pub services: String,
}

impl GeneratedFiles {
    /// Clear `dir`, recreate it and write the documents into it
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        ensure_clearable(dir)?;

        if fs::try_exists(dir).await? {
            fs::remove_dir_all(dir).await?;
        }
        fs::create_dir_all(dir).await?;

        fs::write(dir.join(SCHEMA_TEMPLATE), &self.schema).await?;
        fs::write(dir.join(PATHS_TEMPLATE), &self.paths).await?;
        fs::write(dir.join(SERVICES_TEMPLATE), &self.services).await?;
        info!("wrote generated files to {}", dir.display());
        Ok(())
    }
}

/// Refuse to wipe directories that are obviously not a dedicated output dir
fn ensure_clearable(dir: &Path) -> Result<()> {
    let has_name = dir
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    let climbs = dir.components().any(|c| matches!(c, Component::ParentDir));
    if !has_name || (climbs && dir.file_name().is_none()) {
        return Err(Error::config(format!(
            "refusing to clear output directory '{}'",
            dir.display()
        )));
    }
    Ok(())
}

/// An endpoint left out of the output because it could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEndpoint {
    pub id: String,
    pub endpoint: String,
    pub reason: String,
}

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of schema interfaces emitted
    pub schemas: usize,
    /// Number of endpoints emitted into both documents
    pub endpoints: usize,
    pub skipped: Vec<SkippedEndpoint>,
}

/// Drives a generation run against a [`DocumentSource`]
#[derive(Debug)]
pub struct Generator {
    config: Config,
    templates: DocumentTemplates,
}

impl Generator {
    /// Create a generator, loading template overrides from the config
    pub async fn new(config: Config) -> Result<Self> {
        let templates = DocumentTemplates::load(config.template_dir.as_deref()).await?;
        Ok(Self { config, templates })
    }

    pub fn with_templates(config: Config, templates: DocumentTemplates) -> Self {
        Self { config, templates }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produce the documents in memory
    pub async fn generate<S>(&self, source: &S) -> Result<(GeneratedFiles, GenerationReport)>
    where
        S: DocumentSource + ?Sized,
    {
        let mut report = GenerationReport::default();

        // Phase one: the registry is complete before anything resolves against it
        let schemas = source.fetch_schemas().await?;
        let registry = ReferenceRegistry::from_schemas(&schemas);
        info!("registered {} schemas", registry.len());
        let resolver = TypeResolver::new(&registry);
        let schema_decls = DeclarationEmitter::new(resolver).emit(&schemas);
        report.schemas = schemas.len();

        // Phase two
        let modules = source.fetch_api_tree().await?;
        let ids = flatten_endpoint_ids(&modules);
        info!("converting {} endpoints", ids.len());

        let paths_builder = PathsBuilder::new(resolver, self.config.success_response.clone());
        let services_builder = ServicesBuilder::new(self.config.success_response.clone());
        let mut path_names = NamingState::new();
        let mut service_names = NamingState::new();
        let mut path_decls = String::new();
        let mut functions = String::new();

        for id in &ids {
            let detail = source.fetch_endpoint(id).await?;

            let paths = match paths_builder.build(&detail, &mut path_names) {
                Ok(paths) => paths,
                Err(err) if err.is_endpoint_local() && !self.config.strict => {
                    warn!("skipping endpoint {}: {}", id, err);
                    report.skipped.push(SkippedEndpoint {
                        id: id.clone(),
                        endpoint: detail.label(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };
            let service = services_builder.build(&detail, &mut service_names)?;

            path_decls.push_str(&paths);
            functions.push_str(&service);
            report.endpoints += 1;
        }

        let files = GeneratedFiles {
            schema: self.templates.render_schema(&schema_decls)?,
            paths: self.templates.render_paths(&path_decls)?,
            services: self
                .templates
                .render_services(&functions, &self.config.request_import)?,
        };
        Ok((files, report))
    }

    /// Generate and write the documents into the configured output directory
    pub async fn run<S>(&self, source: &S) -> Result<GenerationReport>
    where
        S: DocumentSource + ?Sized,
    {
        let (files, report) = self.generate(source).await?;
        files.write_to(&self.config.output_dir).await?;
        Ok(report)
    }
}
