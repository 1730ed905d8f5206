use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "testdata-crawler")]
#[command(about = "Crawl Bitbucket projects for @TestData-annotated test methods grouped by feature")]
pub struct Cli {
    /// Base address of the Bitbucket server, e.g. https://git.example.com
    #[arg(long, value_name = "URL")]
    pub host: String,

    /// Project key to crawl
    #[arg(long, value_name = "KEY")]
    pub project: String,

    /// Branch, tag, or commit to read from
    #[arg(long, value_name = "REF", default_value = "develop")]
    pub branch: String,

    /// Bearer token; falls back to the BITBUCKET_TOKEN environment variable
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Only repositories whose name starts with this prefix are crawled
    #[arg(long, value_name = "PREFIX", default_value = "automation_")]
    pub repo_prefix: String,

    /// Directory the tree walk starts from in every repository
    #[arg(long, value_name = "PATH", default_value = "src/test/java")]
    pub root: String,

    /// Package namespace a source file must declare to be extracted
    #[arg(long, value_name = "SUBSTR", default_value = "")]
    pub namespace: String,

    /// Marker annotation name to collect
    #[arg(long, value_name = "NAME", default_value = "TestData")]
    pub annotation: String,

    /// Source file extension to enumerate
    #[arg(long, value_name = "EXT", default_value = "java")]
    pub extension: String,

    /// Directory name that marks a test-code subtree
    #[arg(long, value_name = "NAME", default_value = "test")]
    pub test_dir: String,

    /// Page size for repository listing requests
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub page_limit: u32,

    /// Worker pool size for repository and file processing
    #[arg(long, value_name = "N", default_value_t = 8)]
    pub threads: usize,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
