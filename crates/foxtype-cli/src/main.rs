//! foxtype CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use foxtype_core::config::DEFAULT_CONFIG_FILE;
use foxtype_core::{Config, DocumentSource, Generator, HttpSource, SnapshotSource};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "foxtype")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate schema.d.ts, paths.d.ts and services.ts from an Apifox shared doc
    Generate {
        /// Config file (default: ./foxtype.yaml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Id of the shared doc, e.g. the tail of https://www.apifox.cn/apidoc/shared-<id>
        #[arg(long)]
        share_id: Option<String>,
        /// Base URL of the Apifox instance
        #[arg(long)]
        base_url: Option<Url>,
        /// Read documents from a snapshot directory instead of the network
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output directory (cleared on every run)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Module the services import their `request` function from
        #[arg(long)]
        request_import: Option<String>,
        /// Abort when an endpoint has no success response instead of skipping it
        #[arg(long)]
        strict: bool,
    },
    /// Download all documents of a shared doc into a snapshot directory
    Snapshot {
        /// Config file (default: ./foxtype.yaml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        share_id: Option<String>,
        #[arg(long)]
        base_url: Option<Url>,
        /// Directory to write the snapshot into
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a config file with default values
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        #[arg(long)]
        share_id: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Load the explicit config file, else `./foxtype.yaml` if present, else defaults
async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        tracing::debug!("using {}", default_path.display());
        return Config::from_file(default_path)
            .await
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(Config::default())
}

fn apply_source_overrides(config: &mut Config, share_id: Option<String>, base_url: Option<Url>) {
    if let Some(share_id) = share_id {
        config.share_id = Some(share_id);
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            config,
            share_id,
            base_url,
            source,
            output_dir,
            request_import,
            strict,
        } => {
            let mut config = load_config(config.as_deref()).await?;
            apply_source_overrides(&mut config, share_id, base_url);
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(request_import) = request_import {
                config.request_import = request_import;
            }
            config.strict |= strict;

            let source: Box<dyn DocumentSource> = match source {
                Some(dir) => {
                    tracing::info!("Reading documents from snapshot {}", dir.display());
                    Box::new(SnapshotSource::new(dir))
                }
                None => Box::new(
                    HttpSource::from_config(&config)
                        .context("Pass --share-id, --source or set share_id in the config")?,
                ),
            };

            let generator = Generator::new(config)
                .await
                .context("Failed to load templates")?;
            let report = generator
                .run(source.as_ref())
                .await
                .context("Generation failed")?;

            for skipped in &report.skipped {
                tracing::warn!("Skipped {} ({}): {}", skipped.endpoint, skipped.id, skipped.reason);
            }
            println!(
                "✅ Generated {} schemas and {} endpoints in: {}",
                report.schemas,
                report.endpoints,
                generator.config().output_dir.display()
            );
        }
        Commands::Snapshot {
            config,
            share_id,
            base_url,
            out,
        } => {
            let mut config = load_config(config.as_deref()).await?;
            apply_source_overrides(&mut config, share_id, base_url);
            let source = HttpSource::from_config(&config)
                .context("Pass --share-id or set share_id in the config")?;

            let count = foxtype_core::save_snapshot(&source, &out)
                .await
                .with_context(|| format!("Failed to save snapshot to {}", out.display()))?;
            println!("✅ Saved {} endpoints to: {}", count, out.display());
        }
        Commands::Init {
            path,
            share_id,
            force,
        } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
            }
            let mut config = Config::default();
            config.share_id = share_id;
            config
                .save(&path)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Wrote {}", path.display());
        }
    }
    Ok(())
}
