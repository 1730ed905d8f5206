//! Marked-method extraction from raw Java sources.
//!
//! A file passes through ordered gates: raw fetch, a cheap `@<marker>`
//! substring pre-filter, a tree-sitter parse, and a package check. Files
//! failing any gate are skipped silently; survivors contribute one record
//! per method carrying the marker annotation. The pre-filter intentionally
//! matches the literal `@<marker>` text, so a file using only a fully
//! qualified annotation written without that literal is not parsed.

use anyhow::Result;
use log::{debug, trace};
use tree_sitter::{Node, Parser};

use crate::aggregate::{FeatureIndex, TestDataMethod};
use crate::api::SourceHost;
use crate::config::CrawlConfig;
use crate::feature::{feature_from_path, leaf, strip_extension};

#[derive(Debug, Clone)]
pub struct SourceOutline {
    pub package: String,
    pub type_name: Option<String>,
    pub methods: Vec<AnnotatedMethod>,
}

#[derive(Debug, Clone)]
pub struct AnnotatedMethod {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

/// Fetches one file and appends its marked methods to the index.
///
/// Every gate short-circuits with `Ok(())`: absent content, missing marker
/// text, unparseable source, and package mismatches are expected and not
/// errors. Only transport-level failures bubble up to the dispatcher.
pub fn process_file(
    host: &dyn SourceHost,
    index: &FeatureIndex,
    config: &CrawlConfig,
    repo: &str,
    path: &str,
) -> Result<()> {
    let Some(raw) = host.raw_file(repo, path)? else {
        trace!("no content for {repo}:{path}");
        return Ok(());
    };
    if raw.is_empty() {
        return Ok(());
    }

    let needle = format!("@{}", config.marker);
    if !raw.contains(&needle) {
        trace!("no {needle} in {repo}:{path}");
        return Ok(());
    }

    let Some(outline) = scan_marked_methods(&raw, &config.marker) else {
        debug!("skipping unparseable file {repo}:{path}");
        return Ok(());
    };

    if !outline.package.contains(&config.namespace) || !outline.package.contains(&config.sentinel) {
        trace!("package {} out of scope for {repo}:{path}", outline.package);
        return Ok(());
    }

    let class_name = outline
        .type_name
        .unwrap_or_else(|| strip_extension(leaf(path), &config.extension).to_string());
    let feature = feature_from_path(path, &config.sentinel);

    let records: Vec<TestDataMethod> = outline
        .methods
        .into_iter()
        .map(|method| TestDataMethod {
            repo: repo.to_string(),
            feature: feature.clone(),
            class_name: class_name.clone(),
            method_name: method.name,
            annotation_attrs: method.attrs,
            path: path.to_string(),
        })
        .collect();

    if !records.is_empty() {
        debug!("{}: {} marked methods in {repo}:{path}", feature, records.len());
        index.append(&feature, records);
    }

    Ok(())
}

/// Parses a source and returns its package, first type declaration, and
/// every method whose annotations include the marker (by simple name or by
/// a qualified name ending in it). `None` means the source does not parse.
pub fn scan_marked_methods(source: &str, marker: &str) -> Option<SourceOutline> {
    if source.trim().is_empty() {
        return None;
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }
    let bytes = source.as_bytes();

    let mut package = String::new();
    let mut type_name = None;

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                package = extract_package(&child, bytes);
            }
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => {
                if type_name.is_none() {
                    type_name = child
                        .child_by_field_name("name")
                        .map(|n| node_text(&n, bytes).to_string());
                }
            }
            _ => {}
        }
    }

    let mut methods = Vec::new();
    collect_marked_methods(&root, bytes, marker, &mut methods);

    Some(SourceOutline {
        package,
        type_name,
        methods,
    })
}

fn extract_package(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
            return node_text(&child, source).to_string();
        }
    }
    String::new()
}

fn collect_marked_methods(node: &Node, source: &[u8], marker: &str, out: &mut Vec<AnnotatedMethod>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "method_declaration"
            && let Some(attrs) = marker_attrs(&child, source, marker)
            && let Some(name) = child.child_by_field_name("name")
        {
            out.push(AnnotatedMethod {
                name: node_text(&name, source).to_string(),
                attrs,
            });
        }
        collect_marked_methods(&child, source, marker, out);
    }
}

/// Attributes of the first marker annotation on a method, or `None` when the
/// method does not carry the marker at all.
fn marker_attrs(method: &Node, source: &[u8], marker: &str) -> Option<Vec<(String, String)>> {
    let mut cursor = method.walk();
    for child in method.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for annotation in child.children(&mut inner) {
            match annotation.kind() {
                "marker_annotation" | "annotation" => {
                    let name = annotation
                        .child_by_field_name("name")
                        .map(|n| node_text(&n, source))
                        .unwrap_or("");
                    if !matches_marker(name, marker) {
                        continue;
                    }
                    if annotation.kind() == "marker_annotation" {
                        return Some(Vec::new());
                    }
                    return Some(annotation_attrs(&annotation, source));
                }
                _ => {}
            }
        }
    }
    None
}

fn matches_marker(name: &str, marker: &str) -> bool {
    name == marker || name.ends_with(&format!(".{marker}"))
}

fn annotation_attrs(annotation: &Node, source: &[u8]) -> Vec<(String, String)> {
    let Some(arguments) = annotation.child_by_field_name("arguments") else {
        return Vec::new();
    };

    let mut attrs = Vec::new();
    let mut cursor = arguments.walk();
    for argument in arguments.children(&mut cursor) {
        match argument.kind() {
            "element_value_pair" => {
                let key = argument
                    .child_by_field_name("key")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_default();
                let value = argument
                    .child_by_field_name("value")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_default();
                attrs.push((key, value));
            }
            "(" | ")" | "," | "line_comment" | "block_comment" => {}
            // A lone element value: @TestData("smoke")
            _ => attrs.push(("value".to_string(), node_text(&argument, source).to_string())),
        }
    }
    attrs
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
