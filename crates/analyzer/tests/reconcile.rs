//! Dataset reconciliation tests, driven through a fake filesystem probe.

use provcrate_analyzer::{fix_inputs_under_output_dirs, merge_declared};
use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use provcrate_core::error::{CrateError, CrateResult};
use provcrate_core::types::Role;
use provcrate_provider::FsProbe;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const HOST: &str = "node1";

/// In-memory filesystem: declared paths are either files, directories,
/// or "weird" (exist but are neither, e.g. a socket).
#[derive(Default)]
struct FakeFs {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    weird: HashSet<PathBuf>,
}

impl FakeFs {
    fn with_files(paths: &[&str]) -> Self {
        Self {
            files: paths.iter().map(PathBuf::from).collect(),
            ..Self::default()
        }
    }

    fn and_dirs(mut self, paths: &[&str]) -> Self {
        self.dirs.extend(paths.iter().map(PathBuf::from));
        self
    }

    fn and_weird(mut self, paths: &[&str]) -> Self {
        self.weird.extend(paths.iter().map(PathBuf::from));
        self
    }
}

impl FsProbe for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path) || self.weird.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn size(&self, _path: &Path) -> CrateResult<u64> {
        Ok(0)
    }

    fn mtime(&self, _path: &Path) -> CrateResult<SystemTime> {
        Ok(SystemTime::UNIX_EPOCH)
    }

    fn resolve(&self, path: &Path) -> CrateResult<PathBuf> {
        Ok(path.to_path_buf())
    }
}

#[test]
fn declared_path_already_detected_stays_single() {
    let probe = FakeFs::with_files(&["/data/f1"]);
    let mut working = vec!["file://node1/data/f1".to_string()];
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/data/f1".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert_eq!(working, vec!["file://node1/data/f1"]);
    assert_eq!(diags.count_of(DiagnosticKind::DuplicateEntry), 1);
}

#[test]
fn missing_declared_path_is_skipped_with_a_warning() {
    let probe = FakeFs::default();
    let mut working = Vec::new();
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/nowhere/f1".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert!(working.is_empty());
    assert!(diags.has(DiagnosticKind::MissingPath));
}

#[test]
fn path_that_is_neither_file_nor_directory_is_fatal() {
    let probe = FakeFs::default().and_weird(&["/dev/odd"]);
    let mut working = Vec::new();
    let mut diags = Diagnostics::new();

    let err = merge_declared(
        Role::Output,
        &["/dev/odd".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap_err();
    assert!(matches!(err, CrateError::Filesystem(_)));
}

#[test]
fn declared_directory_gets_scheme_and_separator() {
    let probe = FakeFs::default().and_dirs(&["/data/raw"]);
    let mut working = Vec::new();
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/data/raw".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert_eq!(working, vec!["dir://node1/data/raw/"]);
    assert!(diags.is_empty());
}

#[test]
fn file_under_registered_directory_is_pruned() {
    let probe = FakeFs::with_files(&["/data/raw/f1"]).and_dirs(&["/data/raw"]);
    let mut working = vec!["file://node1/data/raw/f1".to_string()];
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/data/raw".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert_eq!(working, vec!["dir://node1/data/raw/"]);
    assert_eq!(diags.count_of(DiagnosticKind::SubsumedEntry), 1);
}

#[test]
fn nested_directory_is_pruned_but_topmost_survives() {
    let probe = FakeFs::with_files(&["/other/f1"]).and_dirs(&["/data", "/data/nested"]);
    let mut working = vec!["file://node1/other/f1".to_string()];
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/data".to_string(), "/data/nested".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert_eq!(
        working,
        vec!["dir://node1/data/", "file://node1/other/f1"]
    );
    assert_eq!(diags.count_of(DiagnosticKind::SubsumedEntry), 1);
}

#[test]
fn similar_prefix_is_not_subsumed() {
    // /inputs.zip is not inside /inputs/ even though the strings share a
    // prefix; the trailing separator on directory paths prevents it.
    let probe = FakeFs::with_files(&["/job/inputs.zip"]).and_dirs(&["/job/inputs"]);
    let mut working = vec!["file://node1/job/inputs.zip".to_string()];
    let mut diags = Diagnostics::new();

    merge_declared(
        Role::Input,
        &["/job/inputs".to_string()],
        &mut working,
        HOST,
        &probe,
        &mut diags,
    )
    .unwrap();

    assert_eq!(
        working,
        vec!["dir://node1/job/inputs/", "file://node1/job/inputs.zip"]
    );
    assert!(!diags.has(DiagnosticKind::SubsumedEntry));
}

// ---------------------------------------------------------------------------
// Cross-role fix-up
// ---------------------------------------------------------------------------

#[test]
fn input_file_inside_output_directory_is_removed() {
    let mut inputs = vec!["file://node1/out/sub/file.txt".to_string()];
    let outputs = vec!["dir:///out/".to_string()];
    let mut diags = Diagnostics::new();

    fix_inputs_under_output_dirs(&mut inputs, &outputs, &mut diags);

    assert!(inputs.is_empty());
    assert_eq!(diags.count_of(DiagnosticKind::InputInsideOutputDir), 1);
}

#[test]
fn input_file_outside_output_directories_survives() {
    let mut inputs = vec!["file://node1/data/in.txt".to_string()];
    let outputs = vec!["dir://node1/out/".to_string()];
    let mut diags = Diagnostics::new();

    fix_inputs_under_output_dirs(&mut inputs, &outputs, &mut diags);

    assert_eq!(inputs, vec!["file://node1/data/in.txt"]);
    assert!(diags.is_empty());
}

#[test]
fn fix_up_short_circuits_without_output_directories() {
    let mut inputs = vec!["file://node1/out/file.txt".to_string()];
    let outputs = vec!["file://node1/out/other.txt".to_string()];
    let mut diags = Diagnostics::new();

    fix_inputs_under_output_dirs(&mut inputs, &outputs, &mut diags);

    assert_eq!(inputs.len(), 1);
    assert!(diags.is_empty());
}

#[test]
fn fix_up_short_circuits_without_input_files() {
    let mut inputs = vec!["dir://node1/out/staging/".to_string()];
    let outputs = vec!["dir://node1/out/".to_string()];
    let mut diags = Diagnostics::new();

    fix_inputs_under_output_dirs(&mut inputs, &outputs, &mut diags);

    assert_eq!(inputs, vec!["dir://node1/out/staging/"]);
    assert!(diags.is_empty());
}
