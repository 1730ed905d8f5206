//! Bitbucket Server REST client.
//!
//! Thin blocking HTTP layer behind the [`SourceHost`] trait. Every request
//! carries the bearer token; a non-success status on a listing or browse
//! call becomes a [`RequestFailure`] for the calling traversal to surface,
//! while raw-content requests report non-success as absent content.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

use crate::api::{BrowsePage, RepoPage, SourceHost, decode_page};
use crate::config::CrawlConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Non-success answer from the hosting server, kept verbatim for diagnostics.
#[derive(Debug, Error)]
#[error("HTTP {status} for {url}: {body}")]
pub struct RequestFailure {
    pub status: u16,
    pub url: String,
    pub body: String,
}

pub struct RestClient {
    http: Client,
    host: String,
    project: String,
    branch: String,
    token: String,
    repo_prefix: String,
    page_limit: u32,
}

impl RestClient {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            host: config.host.trim_end_matches('/').to_string(),
            project: config.project.clone(),
            branch: config.branch.clone(),
            token: config.token.clone(),
            repo_prefix: config.repo_prefix.clone(),
            page_limit: config.page_limit,
        })
    }

    fn get(&self, url: &str) -> Result<(u16, String)> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .with_context(|| format!("Request failed: {url}"))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok((status, body))
    }

    fn get_page<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let (status, body) = self.get(url)?;
        if !(200..300).contains(&status) {
            return Err(RequestFailure {
                status,
                url: url.to_string(),
                body,
            }
            .into());
        }
        Ok(decode_page(&body))
    }

    fn repos_url(&self, start: Option<u64>) -> String {
        let mut url = format!(
            "{}/rest/api/latest/repos?projectKey={}&name={}&limit={}",
            self.host,
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.repo_prefix),
            self.page_limit
        );
        if let Some(start) = start {
            url.push_str(&format!("&start={start}"));
        }
        url
    }

    fn browse_url(&self, repo: &str, path: &str, start: Option<u64>) -> String {
        let mut url = format!(
            "{}/rest/api/latest/projects/{}/repos/{}/browse/{}?at={}",
            self.host,
            urlencoding::encode(&self.project),
            urlencoding::encode(repo),
            encode_path(path),
            urlencoding::encode(&self.branch)
        );
        if let Some(start) = start {
            url.push_str(&format!("&start={start}"));
        }
        url
    }

    fn raw_url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/rest/api/latest/projects/{}/repos/{}/raw/{}?at={}",
            self.host,
            urlencoding::encode(&self.project),
            urlencoding::encode(repo),
            encode_path(path),
            urlencoding::encode(&self.branch)
        )
    }
}

impl SourceHost for RestClient {
    fn repo_page(&self, start: Option<u64>) -> Result<RepoPage> {
        self.get_page(&self.repos_url(start))
    }

    fn browse_page(&self, repo: &str, path: &str, start: Option<u64>) -> Result<BrowsePage> {
        self.get_page(&self.browse_url(repo, path, start))
    }

    fn raw_file(&self, repo: &str, path: &str) -> Result<Option<String>> {
        let url = self.raw_url(repo, path);
        let (status, body) = self.get(&url)?;
        if (200..300).contains(&status) {
            Ok(Some(body))
        } else {
            Ok(None)
        }
    }
}

/// Percent-encodes a repository path one segment at a time, so the path
/// separators the browse endpoint expects survive.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
