//! Application source discovery and entry-point resolution.
//!
//! Declared sources are resolved against the filesystem and flattened into
//! one list of absolute file paths. The workflow entry point is then chosen
//! by reconciling three signals: the entry the runtime detected (log
//! header), the user's `sources_main_file` override, and a backup candidate
//! found while walking the sources.

use crate::config::RunConfig;
use crate::log::ProvenanceLog;
use crate::{expand_user, FsProbe};
use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use provcrate_core::error::{CrateError, CrateResult};
use provcrate_core::types::{SourceFile, SourceRole};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions that make a file a plausible entry point.
const SOURCE_SUFFIXES: [&str; 4] = ["py", "java", "jar", "class"];

/// All resolved application sources for one run.
#[derive(Debug, Clone)]
pub struct SourceSet {
    /// Every source file, absolute; exactly one carries [`SourceRole::Main`].
    pub files: Vec<SourceFile>,
    /// Declared source directories, resolved.
    pub dirs: Vec<PathBuf>,
    /// Empty directories found while walking, kept so the emitted crate
    /// can represent them with placeholder entries.
    pub empty_dirs: Vec<PathBuf>,
}

impl SourceSet {
    /// The workflow entry point.
    pub fn main(&self) -> &SourceFile {
        self.files
            .iter()
            .find(|f| f.is_main())
            .unwrap_or(&self.files[0])
    }

    pub fn main_path(&self) -> &Path {
        &self.main().path
    }
}

/// Resolve declared sources and choose the workflow entry point.
///
/// `cwd` is the directory the workflow ran in; it anchors the fallback
/// lookup of the runtime-detected entry when no sources are declared.
pub fn resolve_sources(
    config: &RunConfig,
    log: &ProvenanceLog,
    cwd: &Path,
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
) -> CrateResult<SourceSet> {
    if !config.has_sources_key() {
        // No sources declared: the runtime-detected entry must exist in
        // the working directory, or there is nothing to describe.
        let candidate = cwd.join(log.entry_filename());
        if probe.is_file(&candidate) {
            let main = probe.resolve(&candidate)?;
            return Ok(SourceSet {
                files: vec![SourceFile {
                    path: main,
                    role: SourceRole::Main,
                }],
                dirs: Vec::new(),
                empty_dirs: Vec::new(),
            });
        }
        return Err(CrateError::Config(format!(
            "no 'sources' defined and the detected entry point ({}) was not found in the working directory",
            log.entry_filename()
        )));
    }

    let mut collected: Vec<PathBuf> = Vec::new();
    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut empty_dirs: Vec<PathBuf> = Vec::new();
    let mut backup: Option<PathBuf> = None;

    for source in config.declared_sources() {
        let path = expand_user(&source);
        if !probe.exists(&path) {
            diags.warn(
                DiagnosticKind::MissingPath,
                format!("a file or directory defined as 'sources' does not exist ({source})"),
            );
            continue;
        }
        let resolved = probe.resolve(&path)?;
        if probe.is_file(&resolved) {
            push_file(&mut collected, &mut backup, resolved, diags);
        } else if probe.is_dir(&resolved) {
            if dirs.contains(&resolved) {
                diags.warn(
                    DiagnosticKind::DuplicateEntry,
                    format!("a directory addition was attempted twice: {}", resolved.display()),
                );
                continue;
            }
            if dirs.iter().any(|d| resolved.starts_with(d)) {
                diags.warn(
                    DiagnosticKind::DuplicateEntry,
                    format!(
                        "a sub-directory addition was attempted twice: {}",
                        resolved.display()
                    ),
                );
                continue;
            }
            if dirs.iter().any(|d| d.starts_with(&resolved)) {
                // A previously added sub-directory will be traversed
                // again; duplicate files are skipped below.
                diags.warn(
                    DiagnosticKind::DuplicateEntry,
                    format!(
                        "a parent directory of a previously added sub-directory is being added: {}",
                        resolved.display()
                    ),
                );
            }
            dirs.push(resolved.clone());
            walk_directory(&resolved, &mut collected, &mut backup, &mut empty_dirs, diags)?;
        } else {
            diags.warn(
                DiagnosticKind::MissingPath,
                format!(
                    "a defined source is neither a directory nor a file ({})",
                    resolved.display()
                ),
            );
        }
    }

    if collected.is_empty() {
        diags.warn(
            DiagnosticKind::EmptySources,
            "unable to find application source files; review the 'sources' definition",
        );
    }
    let backup = backup.or_else(|| collected.first().cloned());

    // Locate the runtime-detected entry among the collected files.
    let target = log.entry_match_path();
    let mut main: Option<PathBuf> = collected
        .iter()
        .find(|f| f.to_string_lossy().ends_with(&target))
        .cloned();

    if let Some(smf) = &config.sources_main_file {
        main = override_main(smf, main, &collected, &dirs, probe, diags)?;
    }

    let main = match main {
        Some(main) => main,
        None => match backup {
            Some(backup) => {
                diags.warn(
                    DiagnosticKind::EntryPointMismatch,
                    format!(
                        "the detected entry point ({target}) does not exist in the list of \
                         application files; setting {} as the workflow entry point",
                        backup.display()
                    ),
                );
                backup
            }
            None => {
                return Err(CrateError::Config(
                    "no workflow entry point could be determined; check 'sources' and \
                     'sources_main_file'"
                        .into(),
                ))
            }
        },
    };

    let mut files: Vec<SourceFile> = collected
        .into_iter()
        .map(|path| {
            let role = if path == main {
                SourceRole::Main
            } else {
                SourceRole::Auxiliary
            };
            SourceFile { path, role }
        })
        .collect();
    if !files.iter().any(|f| f.is_main()) {
        // sources_main_file may point outside the declared sources; the
        // crate still has to carry the workflow file itself.
        files.push(SourceFile {
            path: main,
            role: SourceRole::Main,
        });
    }

    tracing::info!(
        files = files.len(),
        dirs = dirs.len(),
        main = %files.iter().find(|f| f.is_main()).map(|f| f.path.display().to_string()).unwrap_or_default(),
        "application sources resolved"
    );

    Ok(SourceSet {
        files,
        dirs,
        empty_dirs,
    })
}

/// Walk one declared source directory, collecting files and empty dirs.
///
/// `__pycache__` subtrees and names starting with `*` (wildcard symlink
/// leftovers) are skipped. Entries are visited in filename order so the
/// resulting crate layout is deterministic.
fn walk_directory(
    root: &Path,
    collected: &mut Vec<PathBuf>,
    backup: &mut Option<PathBuf>,
    empty_dirs: &mut Vec<PathBuf>,
    diags: &mut Diagnostics,
) -> CrateResult<()> {
    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = entry
            .map_err(|e| CrateError::Filesystem(format!("cannot walk {}: {e}", root.display())))?;
        let path = entry.path();
        if path
            .components()
            .any(|c| c.as_os_str() == "__pycache__")
        {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('*') {
            continue;
        }
        if entry.file_type().is_dir() {
            if dir_is_empty(path)? {
                empty_dirs.push(path.to_path_buf());
            }
        } else if entry.file_type().is_file() {
            push_file(collected, backup, path.to_path_buf(), diags);
        }
    }
    Ok(())
}

fn push_file(
    collected: &mut Vec<PathBuf>,
    backup: &mut Option<PathBuf>,
    path: PathBuf,
    diags: &mut Diagnostics,
) {
    if collected.contains(&path) {
        diags.warn(
            DiagnosticKind::DuplicateEntry,
            format!("a file addition was attempted twice: {}", path.display()),
        );
        return;
    }
    if backup.is_none() && is_source_like(&path) {
        *backup = Some(path.clone());
    }
    collected.push(path);
}

fn is_source_like(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_SUFFIXES.contains(&ext))
}

fn dir_is_empty(path: &Path) -> CrateResult<bool> {
    let mut entries = std::fs::read_dir(path)
        .map_err(|e| CrateError::Filesystem(format!("cannot list {}: {e}", path.display())))?;
    Ok(entries.next().is_none())
}

fn override_main(
    smf: &str,
    detected: Option<PathBuf>,
    files: &[PathBuf],
    dirs: &[PathBuf],
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
) -> CrateResult<Option<PathBuf>> {
    let path = expand_user(smf);
    if probe.is_file(&path) {
        let resolved = probe.resolve(&path)?;
        match &detected {
            None => diags.warn(
                DiagnosticKind::EntryPointMismatch,
                format!(
                    "the file defined at sources_main_file is assigned as the workflow entry \
                     point: {}",
                    resolved.display()
                ),
            ),
            Some(found) if *found != resolved => diags.warn(
                DiagnosticKind::EntryPointMismatch,
                format!(
                    "the file defined at sources_main_file ({}) does not match the automatically \
                     identified entry point ({})",
                    resolved.display(),
                    found.display()
                ),
            ),
            _ => {}
        }
        return Ok(Some(resolved));
    }

    // Not directly a file: resolve against each declared source directory,
    // then fall back to a suffix match anywhere in the collected files.
    for dir in dirs {
        let candidate = dir.join(&path);
        if let Some(found) = files.iter().find(|f| **f == candidate) {
            warn_if_mismatch(found, &detected, diags);
            return Ok(Some(found.clone()));
        }
    }
    if let Some(found) = files.iter().find(|f| f.to_string_lossy().ends_with(smf)) {
        warn_if_mismatch(found, &detected, diags);
        return Ok(Some(found.clone()));
    }

    diags.warn(
        DiagnosticKind::EntryPointMismatch,
        format!("the defined 'sources_main_file' ({smf}) does not exist in the defined 'sources'"),
    );
    Ok(detected)
}

fn warn_if_mismatch(chosen: &Path, detected: &Option<PathBuf>, diags: &mut Diagnostics) {
    if let Some(detected) = detected {
        if detected != chosen {
            diags.warn(
                DiagnosticKind::EntryPointMismatch,
                format!(
                    "the file defined at sources_main_file ({}) does not match the automatically \
                     identified entry point ({})",
                    chosen.display(),
                    detected.display()
                ),
            );
        }
    }
}
