//! # testdata-crawler
//!
//! Crawls a Bitbucket project for test methods carrying the `@TestData`
//! marker annotation and groups them by the feature their path belongs to.
//!
//! ## Architecture
//!
//! - **api**: `SourceHost` interface to the hosting server and its paged wire types
//! - **client**: blocking Bitbucket REST implementation with bearer auth and timeouts
//! - **discover**: paginated repository listing with name-prefix filtering
//! - **walk**: depth-first tree traversal locating test directories and source files
//! - **dispatch**: fixed-size worker pool running repository and file batches
//! - **extract**: tree-sitter extraction of marked methods and their attributes
//! - **feature**: feature-name derivation from source file paths
//! - **aggregate**: concurrent feature → methods index
//! - **crawl**: pipeline orchestration and the run summary
//! - **report**: text/JSON rendering of the final grouping

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod crawl;
pub mod discover;
pub mod dispatch;
pub mod extract;
pub mod feature;
pub mod report;
pub mod walk;
