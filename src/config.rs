use anyhow::Result;
use std::env;

use crate::cli::Cli;

/// Resolved, immutable run configuration shared read-only across workers.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub host: String,
    pub project: String,
    pub branch: String,
    pub token: String,
    pub repo_prefix: String,
    pub root_path: String,
    pub namespace: String,
    pub marker: String,
    pub extension: String,
    /// Directory name that marks a test subtree; also the literal the
    /// declared package must contain.
    pub sentinel: String,
    pub page_limit: u32,
    pub workers: usize,
}

pub fn resolve_config(cli: &Cli) -> Result<CrawlConfig> {
    let token = resolve_token(cli)?;

    Ok(CrawlConfig {
        host: cli.host.trim_end_matches('/').to_string(),
        project: cli.project.clone(),
        branch: cli.branch.clone(),
        token,
        repo_prefix: cli.repo_prefix.clone(),
        root_path: cli.root.trim_matches('/').to_string(),
        namespace: cli.namespace.clone(),
        marker: cli.annotation.clone(),
        extension: cli.extension.trim_start_matches('.').to_string(),
        sentinel: cli.test_dir.clone(),
        page_limit: cli.page_limit.max(1),
        workers: cli.threads.max(1),
    })
}

fn resolve_token(cli: &Cli) -> Result<String> {
    if let Some(token) = cli.token.clone()
        && !token.is_empty()
    {
        return Ok(token);
    }

    if let Ok(token) = env::var("BITBUCKET_TOKEN")
        && !token.is_empty()
    {
        return Ok(token);
    }

    anyhow::bail!("No credential: pass --token or set BITBUCKET_TOKEN")
}
