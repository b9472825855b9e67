//! Source discovery and entry-point resolution tests.

use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use provcrate_core::error::CrateError;
use provcrate_provider::sources::resolve_sources;
use provcrate_provider::{ProvenanceLog, RealFs, RunConfig};
use std::fs;
use std::path::{Path, PathBuf};

fn write_log(dir: &Path, entry: &str) -> PathBuf {
    let path = dir.join("dataprovenance.log");
    fs::write(&path, format!("3.2\n{entry}\nApp_profile.json\n")).unwrap();
    path
}

fn config_from(yaml: &str) -> RunConfig {
    serde_yaml::from_str(yaml).unwrap()
}

fn setup() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    (tmp, root)
}

#[test]
fn detected_entry_is_found_inside_a_sources_directory() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();
    fs::write(root.join("src/nested/helper.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!("sources: [{}/src]\n", root.display()));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();

    assert_eq!(sources.main_path(), root.join("src/main.py"));
    assert_eq!(sources.files.len(), 2);
    assert_eq!(sources.dirs, vec![root.join("src")]);
    assert!(diags.is_empty());
}

#[test]
fn dotted_java_entry_matches_by_translated_path() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src/matmul/files")).unwrap();
    fs::write(root.join("src/matmul/files/Matmul.java"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "matmul.files.Matmul")).unwrap();
    let config = config_from(&format!("sources: [{}/src]\n", root.display()));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(
        sources.main_path(),
        root.join("src/matmul/files/Matmul.java")
    );
}

#[test]
fn sources_main_file_overrides_with_a_mismatch_warning() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();
    fs::write(root.join("src/other.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!(
        "sources: [{root}/src]\nsources_main_file: other.py\n",
        root = root.display()
    ));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.main_path(), root.join("src/other.py"));
    assert!(diags.has(DiagnosticKind::EntryPointMismatch));
}

#[test]
fn unknown_sources_main_file_keeps_the_detected_entry() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!(
        "sources: [{root}/src]\nsources_main_file: missing.py\n",
        root = root.display()
    ));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.main_path(), root.join("src/main.py"));
    assert!(diags.has(DiagnosticKind::EntryPointMismatch));
}

#[test]
fn missing_declared_source_warns_and_continues() {
    let (_tmp, root) = setup();
    fs::write(root.join("main.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!(
        "sources: [{root}/main.py, {root}/nowhere]\n",
        root = root.display()
    ));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.main_path(), root.join("main.py"));
    assert_eq!(diags.count_of(DiagnosticKind::MissingPath), 1);
}

#[test]
fn pycache_subtrees_are_skipped() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src/__pycache__")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();
    fs::write(root.join("src/__pycache__/main.cpython-311.pyc"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!("sources: [{}/src]\n", root.display()));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.files.len(), 1);
}

#[test]
fn duplicate_directory_declaration_warns_once() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!(
        "sources: [{root}/src, {root}/src]\n",
        root = root.display()
    ));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.files.len(), 1);
    assert_eq!(diags.count_of(DiagnosticKind::DuplicateEntry), 1);
}

#[test]
fn no_sources_key_falls_back_to_the_working_directory() {
    let (_tmp, root) = setup();
    fs::write(root.join("main.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from("name: Bare\n");
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.main_path(), root.join("main.py"));
}

#[test]
fn no_sources_key_and_no_entry_in_cwd_is_fatal() {
    let (_tmp, root) = setup();
    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from("name: Bare\n");
    let mut diags = Diagnostics::new();

    let err = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap_err();
    assert!(matches!(err, CrateError::Config(_)));
}

#[test]
fn empty_directory_is_recorded_for_placeholders() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src/empty")).unwrap();
    fs::write(root.join("src/main.py"), "").unwrap();

    let log = ProvenanceLog::read(&write_log(&root, "main.py")).unwrap();
    let config = config_from(&format!("sources: [{}/src]\n", root.display()));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.empty_dirs, vec![root.join("src/empty")]);
}

#[test]
fn backup_entry_is_used_when_nothing_matches() {
    let (_tmp, root) = setup();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/helper.py"), "").unwrap();

    // The detected entry does not exist among the sources.
    let log = ProvenanceLog::read(&write_log(&root, "gone.py")).unwrap();
    let config = config_from(&format!("sources: [{}/src]\n", root.display()));
    let mut diags = Diagnostics::new();

    let sources = resolve_sources(&config, &log, &root, &RealFs, &mut diags).unwrap();
    assert_eq!(sources.main_path(), root.join("src/helper.py"));
    assert!(diags.has(DiagnosticKind::EntryPointMismatch));
}
