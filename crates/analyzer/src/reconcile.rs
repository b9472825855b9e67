//! Dataset reconciliation.
//!
//! Merges the runtime-detected input/output references with the entities
//! the user declared by hand, then prunes redundancy: entries already
//! represented by an ancestor directory, and input files fully captured
//! by an output directory.

use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use provcrate_core::error::{CrateError, CrateResult};
use provcrate_core::types::Role;
use provcrate_core::uri::{self, split_uri};
use provcrate_provider::{expand_user, FsProbe};

/// Merge user-declared dataset paths into a working set for one role.
///
/// Each declared path is resolved against the filesystem and classified
/// as file or directory by probing; a path that does not exist is skipped
/// with a warning, one that exists but is neither a regular file nor a
/// directory aborts the run. The merged set is re-sorted and then pruned
/// of entries subsumed by a registered directory.
pub fn merge_declared(
    role: Role,
    declared: &[String],
    working: &mut Vec<String>,
    host: &str,
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
) -> CrateResult<()> {
    for item in declared {
        let path = expand_user(item);
        if !probe.exists(&path) {
            diags.warn(
                DiagnosticKind::MissingPath,
                format!("a file or directory defined as '{role}' does not exist ({item})"),
            );
            continue;
        }
        let resolved = probe.resolve(&path)?;
        let resolved_str = resolved.to_string_lossy();
        let entity = if probe.is_file(&resolved) {
            uri::file_uri(host, &resolved_str)
        } else if probe.is_dir(&resolved) {
            uri::dir_uri(host, &resolved_str)
        } else {
            return Err(CrateError::Filesystem(format!(
                "a reference is neither a file nor a directory ({})",
                resolved.display()
            )));
        };
        if working.contains(&entity) {
            diags.warn(
                DiagnosticKind::DuplicateEntry,
                format!("a file or directory defined as '{role}' was already part of the dataset ({item})"),
            );
        } else {
            working.push(entity);
        }
    }
    working.sort();

    prune_subsumed(role, working, diags);

    tracing::info!(role = %role, declared = declared.len(), total = working.len(), "manual datasets merged");
    Ok(())
}

/// Drop entries whose path is a strict extension of a registered
/// directory prefix; the prefix-owning directory entries stay.
///
/// Only topmost directories seed the prefix set: a directory nested
/// inside an already-collected one is itself a candidate for removal.
/// When the set holds directories only there is nothing to compare
/// against, and the scan is skipped.
fn prune_subsumed(role: Role, list: &mut Vec<String>, diags: &mut Diagnostics) {
    let mut dir_prefixes: Vec<String> = Vec::new();
    let mut file_found = false;
    for item in list.iter() {
        match split_uri(item) {
            Some(parts) if parts.is_dir() => {
                let path = parts.path;
                if !dir_prefixes.iter().any(|d| path == d || path.starts_with(d.as_str())) {
                    dir_prefixes.push(path.to_string());
                }
            }
            _ => {
                file_found = true;
                break;
            }
        }
    }
    if !file_found {
        return;
    }

    list.retain(|item| {
        let path = path_of(item);
        let subsumed = dir_prefixes
            .iter()
            .any(|d| path != d.as_str() && path.starts_with(d.as_str()));
        if subsumed {
            diags.warn(
                DiagnosticKind::SubsumedEntry,
                format!("item {path} removed as '{role}', since it already belongs to a dataset"),
            );
        }
        !subsumed
    });
}

/// Remove input files that fall under a directory registered as an
/// output: a file the workflow reads inside a directory it writes as a
/// whole is fully captured by the output directory.
///
/// Applies only when the outputs contain at least one directory and the
/// inputs at least one file; short-circuits otherwise.
pub fn fix_inputs_under_output_dirs(
    inputs: &mut Vec<String>,
    outputs: &[String],
    diags: &mut Diagnostics,
) {
    let mut out_dirs: Vec<&str> = Vec::new();
    for item in outputs {
        match split_uri(item) {
            Some(parts) if parts.is_dir() => {
                if !out_dirs.contains(&parts.path) {
                    out_dirs.push(parts.path);
                }
            }
            _ => break,
        }
    }
    if out_dirs.is_empty() {
        return;
    }
    let has_input_file = inputs
        .iter()
        .any(|item| !matches!(split_uri(item), Some(parts) if parts.is_dir()));
    if !has_input_file {
        return;
    }

    inputs.retain(|item| {
        if matches!(split_uri(item), Some(parts) if parts.is_dir()) {
            return true;
        }
        let path = path_of(item);
        let inside = out_dirs.iter().any(|d| path.starts_with(d));
        if inside {
            diags.warn(
                DiagnosticKind::InputInsideOutputDir,
                format!(
                    "metadata of an input file has been removed since it is included at an \
                     output directory: {path}"
                ),
            );
        }
        !inside
    });
}

fn path_of(item: &str) -> &str {
    match split_uri(item) {
        Some(parts) => parts.path,
        None => item,
    }
}
