//! Crawl orchestration.
//!
//! Discovery fans out into one task per repository; each repository task
//! walks its tree synchronously, then fans out one task per candidate file.
//! All tasks side-effect into the shared [`FeatureIndex`]; a failing
//! repository or file leaves a gap in the output, never aborts the run.

use anyhow::Result;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::aggregate::{FeatureIndex, TestDataMethod};
use crate::api::SourceHost;
use crate::config::CrawlConfig;
use crate::discover::{self, Repository};
use crate::dispatch::{Dispatcher, Task};
use crate::extract;
use crate::walk;

#[derive(Debug, Serialize)]
pub struct CrawlSummary {
    pub repositories: usize,
    pub failed_repositories: usize,
    pub features: usize,
    pub methods: usize,
    pub duration_ms: u64,
}

pub struct Crawler<'a> {
    host: &'a dyn SourceHost,
    config: &'a CrawlConfig,
    dispatcher: Dispatcher,
    index: FeatureIndex,
}

impl<'a> Crawler<'a> {
    pub fn new(host: &'a dyn SourceHost, config: &'a CrawlConfig) -> Result<Self> {
        Ok(Self {
            host,
            config,
            dispatcher: Dispatcher::new(config.workers)?,
            index: FeatureIndex::new(),
        })
    }

    pub fn run(&self) -> Result<CrawlSummary> {
        let start = Instant::now();

        let repositories = discover::list_repositories(self.host, &self.config.repo_prefix)?;
        info!(
            "discovered {} repositories with prefix {:?}",
            repositories.len(),
            self.config.repo_prefix
        );

        let tasks: Vec<Task<'_>> = repositories
            .iter()
            .map(|repo| Box::new(move || self.crawl_repository(repo)) as Task<'_>)
            .collect();
        let failed_repositories = self.dispatcher.run_all("repository", tasks);

        Ok(CrawlSummary {
            repositories: repositories.len(),
            failed_repositories,
            features: self.index.feature_count(),
            methods: self.index.method_count(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn crawl_repository(&self, repo: &Repository) -> Result<()> {
        let marked = walk::find_marked_dirs(
            self.host,
            &repo.slug,
            &self.config.root_path,
            &self.config.sentinel,
        )?;
        debug!("{}: {} marked directories", repo.slug, marked.len());

        let mut files = Vec::new();
        for dir in &marked {
            files.extend(walk::list_source_files(
                self.host,
                &repo.slug,
                dir,
                &self.config.extension,
            )?);
        }
        debug!("{}: {} candidate files", repo.slug, files.len());

        let tasks: Vec<Task<'_>> = files
            .into_iter()
            .map(|path| {
                Box::new(move || {
                    extract::process_file(self.host, &self.index, self.config, &repo.slug, &path)
                }) as Task<'_>
            })
            .collect();
        self.dispatcher.run_all("file", tasks);

        Ok(())
    }

    /// Final grouping, ordered by feature name. Call after [`Crawler::run`].
    pub fn snapshot(&self) -> BTreeMap<String, Vec<TestDataMethod>> {
        self.index.snapshot()
    }
}
