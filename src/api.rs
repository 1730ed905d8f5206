//! Interface boundary to the code-hosting server.
//!
//! [`SourceHost`] is the seam every crawl stage talks through: one
//! implementation speaks the Bitbucket REST API over HTTP (`client`), tests
//! substitute an in-memory tree. The wire structs decode pages defensively:
//! missing pagination metadata reads as "last page" so a malformed response
//! ends a traversal instead of looping it forever.

use anyhow::Result;
use serde::Deserialize;

use crate::feature::leaf;

/// A page-oriented view of the hosting server.
///
/// `start` is the opaque page offset returned by the previous page, `None`
/// for the first request. Implementations must be shareable across the
/// worker pool.
pub trait SourceHost: Send + Sync {
    fn repo_page(&self, start: Option<u64>) -> Result<RepoPage>;

    fn browse_page(&self, repo: &str, path: &str, start: Option<u64>) -> Result<BrowsePage>;

    /// Raw file content, or `None` when the server answers with a
    /// non-success status for this path.
    fn raw_file(&self, repo: &str, path: &str) -> Result<Option<String>>;
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoPage {
    #[serde(default)]
    pub values: Vec<RepoEntry>,
    #[serde(default = "default_true")]
    pub is_last_page: bool,
    #[serde(default)]
    pub next_page_start: Option<u64>,
}

impl Default for RepoPage {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            is_last_page: true,
            next_page_start: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoEntry {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowsePage {
    #[serde(default)]
    pub children: DirectoryPage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPage {
    #[serde(default)]
    pub values: Vec<DirectoryEntry>,
    #[serde(default = "default_true")]
    pub is_last_page: bool,
    #[serde(default)]
    pub next_page_start: Option<u64>,
}

impl Default for DirectoryPage {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            is_last_page: true,
            next_page_start: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub path: EntryPath,
}

impl DirectoryEntry {
    /// Leaf name of the entry, preferring the server-provided component list
    /// over re-splitting the rendered path.
    pub fn leaf_name(&self) -> &str {
        match self.path.components.last() {
            Some(last) => last,
            None => leaf(&self.path.full),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Directory,
    File,
    /// Submodules and anything the server grows later; never traversed.
    #[serde(other)]
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPath {
    #[serde(rename = "toString", default)]
    pub full: String,
    #[serde(default)]
    pub components: Vec<String>,
}

/// Decodes a response body into a page type, degrading malformed bodies to
/// the type's default (an empty, final page).
pub fn decode_page<T>(body: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    serde_json::from_str(body).unwrap_or_default()
}
