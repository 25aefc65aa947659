//! Document sources for Apifox shared docs.
//!
//! The generator reads three kinds of documents: the schema listing, the
//! endpoint tree and one detail document per endpoint. All of them arrive in
//! the same `{ "success": true, "data": ... }` envelope, either over HTTP from
//! the shared-docs API or from a snapshot directory on disk.
//!
//! # Examples
//!
//! ```no_run
//! use foxtype_core::source::{DocumentSource, HttpSource};
//! use url::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> foxtype_core::Result<()> {
//! let base = Url::parse("https://www.apifox.cn").unwrap();
//! let source = HttpSource::new(&base, "2a4ce230-99a8-411a-9b31-908d607a3e6e")?;
//! let schemas = source.fetch_schemas().await?;
//! println!("{} schemas", schemas.len());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{EndpointDetail, EndpointNode, SchemaDef};
use crate::tree::flatten_endpoint_ids;

// External imports (alphabetized)
use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::fs;
use url::Url;

/// File name of the schema listing inside a snapshot directory
pub const SCHEMAS_FILE: &str = "data-schemas.json";
/// File name of the endpoint tree inside a snapshot directory
pub const API_TREE_FILE: &str = "http-api-tree.json";
/// Directory holding one `<id>.json` per endpoint inside a snapshot directory
pub const APIS_DIR: &str = "http-apis";

/// Where the generator reads its input documents from
pub trait DocumentSource: Send + Sync {
    /// All schema definitions
    fn fetch_schemas(&self) -> BoxFuture<'_, Result<Vec<SchemaDef>>>;

    /// The module / folder / endpoint tree
    fn fetch_api_tree(&self) -> BoxFuture<'_, Result<Vec<EndpointNode>>>;

    /// Detail document of one endpoint
    fn fetch_endpoint<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<EndpointDetail>>;
}

/// Response wrapper used by every shared-docs endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Unwrap the `data` member of an envelope, treating anything else as a transport failure
pub fn parse_envelope<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(content).map_err(|e| {
        Error::transport(format!("Failed to parse document from {}: {}", origin, e))
    })?;

    if envelope.success == Some(false) {
        return Err(Error::transport(format!(
            "{} reported failure: {}",
            origin,
            envelope.error_message.unwrap_or_default()
        )));
    }

    envelope
        .data
        .ok_or_else(|| Error::transport(format!("{} returned no data", origin)))
}

/// Reads documents from the Apifox shared-docs HTTP API
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    docs_url: Url,
}

impl HttpSource {
    /// Create a source for `share_id` below `base_url`
    pub fn new(base_url: &Url, share_id: &str) -> Result<Self> {
        let share_id = share_id.trim();
        if share_id.is_empty() {
            return Err(Error::config("share id must not be empty"));
        }

        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let docs_url = base
            .join(&format!("api/v1/shared-docs/{}/", share_id))
            .map_err(|e| Error::config(format!("Invalid base URL {}: {}", base_url, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            docs_url,
        })
    }

    /// Create a source from the `base_url` and `share_id` of a config
    pub fn from_config(config: &Config) -> Result<Self> {
        let share_id = config
            .share_id
            .as_deref()
            .ok_or_else(|| Error::config("no share id configured"))?;
        Self::new(&config.base_url, share_id)
    }

    /// Absolute URL of a document below the share
    pub fn url(&self, tail: &str) -> Result<Url> {
        self.docs_url
            .join(tail)
            .map_err(|e| Error::config(format!("Invalid document path {}: {}", tail, e)))
    }

    /// Fetch a document body without interpreting it
    pub async fn fetch_raw(&self, tail: &str) -> Result<String> {
        let url = self.url(tail)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            Error::transport(format!("Failed to fetch {}: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    async fn fetch<T: DeserializeOwned>(&self, tail: &str) -> Result<T> {
        let content = self.fetch_raw(tail).await?;
        parse_envelope(&content, &self.url(tail)?.to_string())
    }
}

impl DocumentSource for HttpSource {
    fn fetch_schemas(&self) -> BoxFuture<'_, Result<Vec<SchemaDef>>> {
        async move { self.fetch("data-schemas").await }.boxed()
    }

    fn fetch_api_tree(&self) -> BoxFuture<'_, Result<Vec<EndpointNode>>> {
        async move { self.fetch("http-api-tree").await }.boxed()
    }

    fn fetch_endpoint<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<EndpointDetail>> {
        async move { self.fetch(&format!("http-apis/{}", id)).await }.boxed()
    }
}

/// Reads documents saved by [`save_snapshot`] from a directory
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    root: PathBuf,
}

impl SnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read<T: DeserializeOwned>(&self, relative: &Path) -> Result<T> {
        let path = self.root.join(relative);
        debug!("reading {}", path.display());
        let content = fs::read_to_string(&path).await.map_err(|e| {
            Error::transport(format!("Failed to read {}: {}", path.display(), e))
        })?;
        parse_envelope(&content, &path.display().to_string())
    }
}

impl DocumentSource for SnapshotSource {
    fn fetch_schemas(&self) -> BoxFuture<'_, Result<Vec<SchemaDef>>> {
        async move { self.read(Path::new(SCHEMAS_FILE)).await }.boxed()
    }

    fn fetch_api_tree(&self) -> BoxFuture<'_, Result<Vec<EndpointNode>>> {
        async move { self.read(Path::new(API_TREE_FILE)).await }.boxed()
    }

    fn fetch_endpoint<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<EndpointDetail>> {
        async move {
            let relative = Path::new(APIS_DIR).join(endpoint_file_name(id)?);
            self.read(&relative).await
        }
        .boxed()
    }
}

/// `<id>.json`, for ids that are plain file name stems
fn endpoint_file_name(id: &str) -> Result<String> {
    let plain = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !plain {
        return Err(Error::transport(format!("invalid endpoint id '{}'", id)));
    }
    Ok(format!("{}.json", id))
}

/// Download every document of a share into `dir` in the snapshot layout.
///
/// Bodies are stored as received so a later [`SnapshotSource`] run sees
/// exactly what the API returned. Every document is fetched and parsed
/// before the first write; on any failure `dir` is left untouched.
/// Returns the number of endpoint documents.
pub async fn save_snapshot(source: &HttpSource, dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();

    let schemas = source.fetch_raw("data-schemas").await?;
    parse_envelope::<Vec<SchemaDef>>(&schemas, SCHEMAS_FILE)?;

    let tree = source.fetch_raw("http-api-tree").await?;
    let modules: Vec<EndpointNode> = parse_envelope(&tree, API_TREE_FILE)?;

    let ids = flatten_endpoint_ids(&modules);
    let mut details = Vec::with_capacity(ids.len());
    for id in &ids {
        let file_name = endpoint_file_name(id)?;
        let detail = source.fetch_raw(&format!("http-apis/{}", id)).await?;
        parse_envelope::<EndpointDetail>(&detail, &file_name)?;
        details.push((file_name, detail));
    }

    fs::create_dir_all(dir.join(APIS_DIR)).await?;
    fs::write(dir.join(SCHEMAS_FILE), &schemas).await?;
    fs::write(dir.join(API_TREE_FILE), &tree).await?;
    for (file_name, detail) in &details {
        fs::write(dir.join(APIS_DIR).join(file_name), detail).await?;
    }

    info!("saved snapshot of {} endpoints to {}", ids.len(), dir.display());
    Ok(ids.len())
}
