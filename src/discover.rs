use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::api::SourceHost;

#[derive(Debug, Clone, Serialize)]
pub struct Repository {
    pub slug: String,
    pub name: String,
}

/// Lists every repository in the project whose display name starts with
/// `prefix` (case-sensitive), following pagination to the end. The server
/// already narrows by name, but the prefix is re-checked here so matching
/// never depends on server-side filter semantics or page boundaries.
pub fn list_repositories(host: &dyn SourceHost, prefix: &str) -> Result<Vec<Repository>> {
    let mut repositories = Vec::new();
    let mut start = None;

    loop {
        let page = host.repo_page(start)?;
        debug!(
            "repository page: {} entries, last={}",
            page.values.len(),
            page.is_last_page
        );

        for entry in page.values {
            if entry.name.starts_with(prefix) {
                repositories.push(Repository {
                    slug: entry.slug,
                    name: entry.name,
                });
            }
        }

        if page.is_last_page {
            break;
        }
        let Some(next) = page.next_page_start else {
            break;
        };
        start = Some(next);
    }

    Ok(repositories)
}
