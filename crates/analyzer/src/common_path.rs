//! Common-path resolution.
//!
//! Given the final mixed list of `dir://` and `file://` references, find
//! the minimal set of ancestor directories such that every reference
//! lives under exactly one of them. The prefixes drive the destination
//! layout when dataset content is physically copied into the crate.

use provcrate_core::uri::split_uri;
use std::collections::HashSet;

/// Compute the minimal set of shared ancestor directories.
///
/// The grouping scan requires strict ascending order of the URI string
/// form, so the input is sorted internally rather than trusting the
/// caller. Directory references are common paths by themselves; runs of
/// file references are folded left-to-right, widening the current prefix
/// while a real common path exists and flushing it when two neighbours
/// only share the filesystem root. Every returned prefix ends in `/`.
pub fn common_paths(uris: &[String]) -> Vec<String> {
    let mut sorted: Vec<&str> = uris.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut prefixes: Vec<String> = Vec::new();
    if sorted.is_empty() {
        return prefixes;
    }

    // Leading dir:// entries are already common paths; collect them as-is.
    let mut idx = 0;
    while idx < sorted.len() {
        match split_uri(sorted[idx]) {
            Some(parts) if parts.is_dir() => {
                if !prefixes.iter().any(|p| p == parts.path) {
                    prefixes.push(parts.path.to_string());
                }
                idx += 1;
            }
            _ => break,
        }
    }
    if idx == sorted.len() {
        return normalize(prefixes);
    }

    // Seed with the first file's parent directory, then fold.
    let mut current = parent_dir(path_of(sorted[idx]));
    idx += 1;
    for item in &sorted[idx..] {
        // The common path is taken against the full path, filename
        // included: when two files diverge above their immediate parent
        // directories this pulls the boundary up accordingly.
        let path = path_of(item);
        let shared = longest_common_dir(&current, path);
        if shared == "/" {
            // No real commonality: flush the finished group and reseed.
            if !prefixes.contains(&current) {
                prefixes.push(current.clone());
            }
            current = parent_dir(path);
        } else {
            current = shared;
        }
    }
    if !prefixes.contains(&current) {
        prefixes.push(current);
    }

    normalize(prefixes)
}

fn path_of(item: &str) -> &str {
    match split_uri(item) {
        Some(parts) => parts.path,
        None => item,
    }
}

fn parent_dir(path: &str) -> String {
    match std::path::Path::new(path).parent() {
        Some(parent) => parent.to_string_lossy().into_owned(),
        None => "/".to_string(),
    }
}

/// Longest directory path shared by two absolute paths, `/` when they
/// only share the filesystem root.
fn longest_common_dir(a: &str, b: &str) -> String {
    let mut shared: Vec<&str> = Vec::new();
    for (x, y) in a
        .trim_end_matches('/')
        .split('/')
        .zip(b.trim_end_matches('/').split('/'))
    {
        if x != y {
            break;
        }
        shared.push(x);
    }
    let joined = shared.join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Terminate every prefix with `/` and drop duplicates, keeping order.
fn normalize(mut prefixes: Vec<String>) -> Vec<String> {
    for prefix in prefixes.iter_mut() {
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
    }
    let mut seen = HashSet::new();
    prefixes.retain(|p| seen.insert(p.clone()));
    prefixes
}
