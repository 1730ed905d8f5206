//! Feature-name derivation from source file paths.
//!
//! A test file's feature is the path segment immediately before the last
//! occurrence of the sentinel directory segment (`test` by default), e.g.
//! `.../checkout/test/PayFlowTest.java` belongs to feature `checkout`.
//! Paths without a sentinel segment fall back to [`UNKNOWN_FEATURE`].

pub const UNKNOWN_FEATURE: &str = "unknown";

/// Derives the feature name for a slash-delimited path.
///
/// Matches whole path segments, never substrings: `contest/` does not count
/// as a `test` segment. A sentinel at index 0 has no preceding segment and
/// also yields [`UNKNOWN_FEATURE`].
pub fn feature_from_path(path: &str, sentinel: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    for i in (1..parts.len()).rev() {
        if parts[i] == sentinel {
            return parts[i - 1].to_string();
        }
    }
    UNKNOWN_FEATURE.to_string()
}

pub fn leaf(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    let suffix = format!(".{extension}");
    name.strip_suffix(suffix.as_str()).unwrap_or(name)
}
