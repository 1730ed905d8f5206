//! Directory-tree traversal over the browse endpoint.
//!
//! Two walkers share the same discipline: depth-first recursion bounded by
//! the real tree depth, each level draining its own page cursor before
//! descending. [`find_marked_dirs`] collects every directory literally named
//! like the sentinel, [`list_source_files`] enumerates source files beneath
//! one marked directory.

use anyhow::Result;
use log::trace;

use crate::api::{EntryKind, SourceHost};

/// Collects the full path of every directory under `root` whose leaf name
/// equals `sentinel`. Recursion continues into every directory — marked or
/// not — so nested sentinel directories are all found.
pub fn find_marked_dirs(
    host: &dyn SourceHost,
    repo: &str,
    root: &str,
    sentinel: &str,
) -> Result<Vec<String>> {
    let mut marked = Vec::new();
    walk_directories(host, repo, root, sentinel, &mut marked)?;
    Ok(marked)
}

fn walk_directories(
    host: &dyn SourceHost,
    repo: &str,
    path: &str,
    sentinel: &str,
    marked: &mut Vec<String>,
) -> Result<()> {
    let mut start = None;

    loop {
        let page = host.browse_page(repo, path, start)?;

        for child in &page.children.values {
            if child.kind != EntryKind::Directory {
                continue;
            }
            let child_path = child.path.full.clone();
            if child.leaf_name() == sentinel {
                trace!("marked directory in {repo}: {child_path}");
                marked.push(child_path.clone());
            }
            walk_directories(host, repo, &child_path, sentinel, marked)?;
        }

        if page.children.is_last_page {
            break;
        }
        let Some(next) = page.children.next_page_start else {
            break;
        };
        start = Some(next);
    }

    Ok(())
}

/// Lists every file with the given extension reachable from `dir`,
/// descending into all subdirectories.
pub fn list_source_files(
    host: &dyn SourceHost,
    repo: &str,
    dir: &str,
    extension: &str,
) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let suffix = format!(".{extension}");
    collect_files(host, repo, dir, &suffix, &mut files)?;
    Ok(files)
}

fn collect_files(
    host: &dyn SourceHost,
    repo: &str,
    dir: &str,
    suffix: &str,
    files: &mut Vec<String>,
) -> Result<()> {
    let mut start = None;

    loop {
        let page = host.browse_page(repo, dir, start)?;

        for child in &page.children.values {
            match child.kind {
                EntryKind::Directory => {
                    collect_files(host, repo, &child.path.full, suffix, files)?;
                }
                EntryKind::File => {
                    if child.path.full.ends_with(suffix) {
                        files.push(child.path.full.clone());
                    }
                }
                EntryKind::Other => {}
            }
        }

        if page.children.is_last_page {
            break;
        }
        let Some(next) = page.children.next_page_start else {
            break;
        };
        start = Some(next);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BrowsePage, DirectoryEntry, DirectoryPage, EntryPath, RepoPage};
    use std::collections::HashMap;

    /// In-memory directory tree serving browse pages of a fixed size.
    struct TreeHost {
        children: HashMap<String, Vec<DirectoryEntry>>,
        page_size: usize,
    }

    impl TreeHost {
        fn new(page_size: usize) -> Self {
            Self {
                children: HashMap::new(),
                page_size,
            }
        }

        fn dir(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
            let values = entries
                .iter()
                .map(|(child_path, kind)| DirectoryEntry {
                    kind: *kind,
                    path: EntryPath {
                        full: child_path.to_string(),
                        components: child_path.split('/').map(str::to_string).collect(),
                    },
                })
                .collect();
            self.children.insert(path.to_string(), values);
            self
        }
    }

    impl SourceHost for TreeHost {
        fn repo_page(&self, _start: Option<u64>) -> Result<RepoPage> {
            unreachable!("walkers never list repositories")
        }

        fn browse_page(&self, _repo: &str, path: &str, start: Option<u64>) -> Result<BrowsePage> {
            let all = self.children.get(path).cloned().unwrap_or_default();
            let offset = start.unwrap_or(0) as usize;
            let end = (offset + self.page_size).min(all.len());
            let is_last_page = end >= all.len();
            Ok(BrowsePage {
                children: DirectoryPage {
                    values: all[offset..end].to_vec(),
                    is_last_page,
                    next_page_start: if is_last_page { None } else { Some(end as u64) },
                },
            })
        }

        fn raw_file(&self, _repo: &str, _path: &str) -> Result<Option<String>> {
            unreachable!("walkers never fetch content")
        }
    }

    const DIR: EntryKind = EntryKind::Directory;
    const FILE: EntryKind = EntryKind::File;

    #[test]
    fn finds_marked_dirs_at_any_depth_including_nested_ones() {
        let host = TreeHost::new(10)
            .dir(
                "root",
                &[("root/checkout", DIR), ("root/login", DIR), ("root/README.md", FILE)],
            )
            .dir("root/checkout", &[("root/checkout/test", DIR)])
            .dir("root/checkout/test", &[("root/checkout/test/test", DIR)])
            .dir("root/checkout/test/test", &[])
            .dir("root/login", &[("root/login/util", DIR)])
            .dir("root/login/util", &[("root/login/util/test", DIR)])
            .dir("root/login/util/test", &[]);

        let mut marked = find_marked_dirs(&host, "r", "root", "test").unwrap();
        marked.sort();
        assert_eq!(
            marked,
            vec![
                "root/checkout/test",
                "root/checkout/test/test",
                "root/login/util/test"
            ]
        );
    }

    #[test]
    fn traversal_paginates_at_every_level() {
        // Page size 1 forces a next-page request for every sibling.
        let host = TreeHost::new(1)
            .dir("root", &[("root/a", DIR), ("root/b", DIR), ("root/c", DIR)])
            .dir("root/a", &[("root/a/test", DIR)])
            .dir("root/a/test", &[])
            .dir("root/b", &[])
            .dir("root/c", &[("root/c/test", DIR)])
            .dir("root/c/test", &[]);

        let marked = find_marked_dirs(&host, "r", "root", "test").unwrap();
        assert_eq!(marked, vec!["root/a/test", "root/c/test"]);
    }

    #[test]
    fn file_listing_filters_by_extension_and_recurses() {
        let host = TreeHost::new(2)
            .dir(
                "t",
                &[("t/PayFlowTest.java", FILE), ("t/notes.txt", FILE), ("t/deep", DIR)],
            )
            .dir("t/deep", &[("t/deep/CartTest.java", FILE)]);

        let mut files = list_source_files(&host, "r", "t", "java").unwrap();
        files.sort();
        assert_eq!(files, vec!["t/PayFlowTest.java", "t/deep/CartTest.java"]);
    }

    #[test]
    fn unknown_entry_kinds_are_ignored() {
        let host = TreeHost::new(10).dir(
            "t",
            &[("t/sub", EntryKind::Other), ("t/A.java", FILE)],
        );

        let files = list_source_files(&host, "r", "t", "java").unwrap();
        assert_eq!(files, vec!["t/A.java"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let host = TreeHost::new(10).dir("t", &[]);
        assert!(find_marked_dirs(&host, "r", "t", "test").unwrap().is_empty());
        assert!(list_source_files(&host, "r", "t", "java").unwrap().is_empty());
    }
}
