//! Loading of the alarm configuration document from a local file or a remote
//! HTTP endpoint.

use std::{fs, path::PathBuf};

use indexmap::IndexMap;
use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;
use url::Url;

use crate::models::AlarmSpec;

/// Default configuration file, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "alarms.yml";

/// Errors that can occur while loading the alarm configuration.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Error when reading the configuration file.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Error while retrieving the configuration document over HTTP.
    #[error("Failed to retrieve configuration document: {0}")]
    Fetch(#[from] reqwest_middleware::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("Failed to load document: HTTP status {0}")]
    FetchFailed(reqwest::StatusCode),

    /// Error when parsing the document as YAML.
    #[error("Failed to parse configuration as YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    /// Error when parsing the document as JSON.
    #[error("Failed to parse configuration as JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The configuration file has an unsupported extension.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Where the configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A local YAML or JSON file.
    File(PathBuf),
    /// A document fetched over HTTP(S), parsed as YAML.
    Url(Url),
}

impl ConfigSource {
    /// Classifies a `--config` value as a URL or a file path.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => ConfigSource::Url(url),
            _ => ConfigSource::File(PathBuf::from(value)),
        }
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource::File(PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

/// Loads named alarm entries from a configuration source.
///
/// Entries are returned in the document's natural order, which the
/// reconciliation loop preserves.
pub struct ConfigLoader {
    source: ConfigSource,
    http_client: ClientWithMiddleware,
}

impl ConfigLoader {
    /// Creates a new `ConfigLoader` for the given source.
    pub fn new(source: ConfigSource, http_client: ClientWithMiddleware) -> Self {
        Self { source, http_client }
    }

    /// Loads the configuration document and returns its entries in order.
    pub async fn load(&self) -> Result<Vec<(String, AlarmSpec)>, LoaderError> {
        let entries = match &self.source {
            ConfigSource::File(path) => Self::load_file(path)?,
            ConfigSource::Url(url) => self.load_url(url).await?,
        };
        Ok(entries.into_iter().collect())
    }

    fn load_file(path: &PathBuf) -> Result<IndexMap<String, AlarmSpec>, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.clone()));
        }
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Ok(serde_yaml::from_str(&contents)?),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Err(LoaderError::UnsupportedFormat(path.clone())),
        }
    }

    async fn load_url(&self, url: &Url) -> Result<IndexMap<String, AlarmSpec>, LoaderError> {
        tracing::info!(url = %url, "Retrieving configuration document");
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::FetchFailed(status));
        }
        let body = response.text().await.map_err(reqwest_middleware::Error::from)?;
        // Remote documents are parsed as YAML, of which JSON is a subset.
        Ok(serde_yaml::from_str(&body)?)
    }
}
