//! Where lookup tables come from.
//!
//! [`LookupTableSource`] is either a directory of `{name}.json` files or a
//! remote location templated by table name. Both variants feed the raw
//! bytes through [`LookupTable::parse`], so validation is identical.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;

use super::{LookupTable, TableError};

/// Placeholder replaced by the table name in remote URL templates.
pub const TABLE_PLACEHOLDER: &str = "{table}";

/// Origin of lookup tables.
#[derive(Debug, Clone)]
pub enum LookupTableSource {
    /// Tables read from a local directory.
    Local(LocalTableSource),
    /// Tables fetched over HTTP.
    Remote(RemoteTableSource),
}

impl LookupTableSource {
    /// Loads and validates the named table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotFound`] if the table is absent (or its name
    /// could never denote a table), [`TableError::Invalid`] on malformed
    /// content, and [`TableError::FetchFailed`] on any other read failure.
    pub async fn load(&self, name: &str) -> Result<LookupTable, TableError> {
        if !is_valid_table_name(name) {
            return Err(TableError::NotFound(name.to_string()));
        }
        let raw = match self {
            Self::Local(local) => local.read(name).await?,
            Self::Remote(remote) => remote.fetch(name).await?,
        };
        LookupTable::parse(name, &raw)
    }
}

/// Reads `{dir}/{name}.json`.
#[derive(Debug, Clone)]
pub struct LocalTableSource {
    dir: PathBuf,
}

impl LocalTableSource {
    /// Creates a source rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory tables are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, TableError> {
        let path = self.dir.join(format!("{name}.json"));
        tracing::debug!(table = name, path = %path.display(), "reading local lookup table");
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => TableError::NotFound(name.to_string()),
            _ => TableError::fetch_failed(name, e.to_string()),
        })
    }
}

/// Fetches tables with a GET to a URL template containing `{table}`.
#[derive(Debug, Clone)]
pub struct RemoteTableSource {
    client: reqwest::Client,
    url_template: String,
}

impl RemoteTableSource {
    /// Creates a remote source with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns a [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    /// URL the named table is fetched from.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        self.url_template.replace(TABLE_PLACEHOLDER, name)
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, TableError> {
        let url = self.url_for(name);
        tracing::debug!(table = name, %url, "fetching remote lookup table");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TableError::fetch_failed(name, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TableError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(TableError::fetch_failed(
                name,
                format!("unexpected status {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TableError::fetch_failed(name, e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Table names are plain file stems: ASCII alphanumerics, `_`, `-`, `.`,
/// never `..` and never a leading dot.
fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
