//! Crate emission.
//!
//! Renders the final path sets, the resolved sources, and the user's
//! metadata into a Workflow Run Crate: root dataset, people and
//! organisations, the main workflow file, auxiliary sources, data
//! entities, the run record, and the compliance-profile markers. The
//! package directory is written once, at the very end, after everything
//! in memory has been assembled.

use chrono::{DateTime, SecondsFormat, Utc};
use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use provcrate_core::error::{CrateError, CrateResult};
use provcrate_core::uri::{self, fix_dir_url, split_uri, UriParts};
use provcrate_provider::config::{Author, RunConfig};
use provcrate_provider::log::ProvenanceLog;
use provcrate_provider::sources::SourceSet;
use provcrate_provider::{FsProbe, HostContext};
use provcrate_rocrate::{iso_now, reference, Entity, RoCrate};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

/// The workflow runtime the provenance log comes from.
const RUNTIME_NAME: &str = "COMPSs";
const RUNTIME_LANGUAGE_ID: &str = "https://compss.bsc.es/";

const PROFILES_BASE: &str = "https://w3id.org/ro/wfrun";
const PROFILES_VERSION: &str = "0.1";
const WROC_PROFILE_VERSION: &str = "1.0";

const SOURCES_DIR: &str = "application_sources";
const DATASET_DIR: &str = "dataset";

const PRONOM_JSON: &str = "https://www.nationalarchives.gov.uk/PRONOM/fmt/817";
const PRONOM_YAML: &str = "https://www.nationalarchives.gov.uk/PRONOM/fmt/818";
const PRONOM_PDF: &str = "https://www.nationalarchives.gov.uk/PRONOM/fmt/276";
const PRONOM_SVG: &str = "https://www.nationalarchives.gov.uk/PRONOM/fmt/92";
const PRONOM_JAR: &str = "https://www.nationalarchives.gov.uk/PRONOM/x-fmt/412";
const PRONOM_CLASS: &str = "https://www.nationalarchives.gov.uk/PRONOM/x-fmt/415";

/// Everything the emitter needs to render one run.
pub struct EmitContext<'a> {
    pub config: &'a RunConfig,
    pub config_path: &'a Path,
    pub log: &'a ProvenanceLog,
    pub log_path: &'a Path,
    pub sources: &'a SourceSet,
    pub inputs: &'a [String],
    pub outputs: &'a [String],
    pub common_paths: &'a [String],
    pub persistence: bool,
    pub host: &'a HostContext,
    pub cwd: &'a Path,
}

/// Assemble and write the crate. Returns the package directory.
pub fn emit_crate(
    ctx: &EmitContext<'_>,
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
) -> CrateResult<PathBuf> {
    let mut rocrate = RoCrate::new();

    let (author_ids, org_ids) = add_people(&mut rocrate, ctx.config);
    describe_root(&mut rocrate, ctx, &author_ids, &org_ids);

    let main_dest = add_source_files(&mut rocrate, ctx, probe, diags)?;

    let mut object_ids = Vec::with_capacity(ctx.inputs.len());
    for item in ctx.inputs {
        object_ids.push(add_data_entity(&mut rocrate, item, ctx, probe)?);
    }
    let mut result_ids = Vec::with_capacity(ctx.outputs.len());
    for item in ctx.outputs {
        result_ids.push(add_data_entity(&mut rocrate, item, ctx, probe)?);
    }

    let run_uuid = add_create_action(
        &mut rocrate,
        ctx,
        &main_dest,
        &author_ids,
        &object_ids,
        &result_ids,
        diags,
    );
    add_profiles(&mut rocrate);

    let folder = ctx
        .cwd
        .join(format!("{RUNTIME_NAME}_Workflow_Run_Crate_{run_uuid}"));
    rocrate.write(&folder)?;

    tracing::info!(
        folder = %folder.display(),
        inputs = object_ids.len(),
        outputs = result_ids.len(),
        persistence = ctx.persistence,
        "workflow run crate generated"
    );
    Ok(folder)
}

// ---------------------------------------------------------------------------
// Root dataset, people, organisations
// ---------------------------------------------------------------------------

fn describe_root(rocrate: &mut RoCrate, ctx: &EmitContext<'_>, authors: &[String], orgs: &[String]) {
    let name = ctx
        .config
        .name
        .clone()
        .unwrap_or_else(|| basename(&ctx.sources.main_path().to_string_lossy()));
    let root = rocrate.root_mut();
    root.set("name", json!(name));
    if let Some(description) = &ctx.config.description {
        root.set("description", json!(description));
    }
    if let Some(license) = &ctx.config.license {
        root.set("license", json!(license));
    }
    if !authors.is_empty() {
        let refs: Vec<Value> = authors.iter().map(|id| reference(id)).collect();
        root.set("creator", Value::Array(refs));
    }
    // Preferably organisations publish the crate; authors otherwise.
    let publishers = if !orgs.is_empty() { orgs } else { authors };
    if !publishers.is_empty() {
        let refs: Vec<Value> = publishers.iter().map(|id| reference(id)).collect();
        root.set("publisher", Value::Array(refs));
    }
}

fn add_people(rocrate: &mut RoCrate, config: &RunConfig) -> (Vec<String>, Vec<String>) {
    let mut author_ids: Vec<String> = Vec::new();
    let mut org_ids: Vec<String> = Vec::new();
    for author in &config.authors() {
        if !author_ids.contains(&author.orcid) {
            author_ids.push(author.orcid.clone());
        }
        add_person(rocrate, author, &mut org_ids);
    }
    (author_ids, org_ids)
}

fn add_person(rocrate: &mut RoCrate, person: &Author, org_ids: &mut Vec<String>) {
    let mut entity = Entity::new(&person.orcid, &["Person"]);
    entity.set("name", json!(person.name));
    if let Some(ror) = &person.ror {
        if !org_ids.contains(ror) {
            org_ids.push(ror.clone());
        }
        entity.set("affiliation", reference(ror));
        let mut org = Entity::new(ror, &["Organization"]);
        org.set(
            "name",
            json!(person.organisation_name.as_deref().unwrap_or_default()),
        );
        rocrate.add(org);
    }
    if let Some(email) = &person.email {
        let mailto = format!("mailto:{email}");
        entity.set("contactPoint", reference(&mailto));
        let mut contact = Entity::new(&mailto, &["ContactPoint"]);
        contact
            .set("contactType", json!("Author"))
            .set("email", json!(email))
            .set("identifier", json!(email))
            .set("url", json!(person.orcid));
        rocrate.add(contact);
    }
    rocrate.add(entity);
}

// ---------------------------------------------------------------------------
// Application sources
// ---------------------------------------------------------------------------

/// Add every source file physically to the crate; returns the
/// crate-relative path of the main workflow file.
fn add_source_files(
    rocrate: &mut RoCrate,
    ctx: &EmitContext<'_>,
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
) -> CrateResult<String> {
    let sources = ctx.sources;
    let main_dest = source_dest(sources.main_path(), &sources.dirs);
    let sketch = sketch_path(ctx.log_path);

    for file in &sources.files {
        let dest = source_dest(&file.path, &sources.dirs);
        let suffix = suffix_of(&file.path);
        let types: &[&str] = if file.is_main() {
            &["File", "SoftwareSourceCode", "ComputationalWorkflow"]
        } else if matches!(suffix.as_str(), "py" | "java") {
            &["File", "SoftwareSourceCode"]
        } else {
            &["File"]
        };
        let mut entity = Entity::new(&dest, types);
        entity
            .set("name", json!(basename(&file.path.to_string_lossy())))
            .set("contentSize", json!(probe.size(&file.path)?));
        if let Some((format, context)) = encoding_format(&suffix) {
            entity.set("encodingFormat", format);
            add_format_context(rocrate, context);
        }
        if file.is_main() {
            entity.set("description", json!("Main file of the workflow source files"));
            if probe.is_file(&sketch) {
                entity.set("image", reference("complete_graph.svg"));
            }
            rocrate.add_workflow(
                Some(file.path.as_path()),
                entity,
                RUNTIME_NAME,
                RUNTIME_LANGUAGE_ID,
                &ctx.log.runtime_version,
            );
        } else {
            entity.set("description", json!("Auxiliary File"));
            rocrate.add_file_from(&file.path, entity);
        }
    }

    // Empty directories inside declared sources survive as placeholders.
    for dir in &sources.empty_dirs {
        let dest = format!("{}/.gitkeep", source_dest(dir, &sources.dirs));
        let mut entity = Entity::new(&dest, &["File"]);
        entity.set("name", json!(".gitkeep"));
        rocrate.add_placeholder_file(entity);
    }

    add_run_artifacts(rocrate, ctx, probe, diags, &main_dest)?;
    Ok(main_dest)
}

/// Crate-relative destination of a source file: files under a declared
/// source directory keep its subtree (directory basename included),
/// individually declared files land at the sources root.
fn source_dest(path: &Path, dirs: &[PathBuf]) -> String {
    for dir in dirs {
        if path.starts_with(dir) {
            if let Some(parent) = dir.parent() {
                if let Ok(rel) = path.strip_prefix(parent) {
                    return format!("{SOURCES_DIR}/{}", rel.display());
                }
            }
        }
    }
    format!("{SOURCES_DIR}/{}", basename(&path.to_string_lossy()))
}

/// Run artifacts that travel with the workflow: the runtime-generated
/// graph diagram, the task profile, the submission command line, and the
/// configuration file that produced this crate.
fn add_run_artifacts(
    rocrate: &mut RoCrate,
    ctx: &EmitContext<'_>,
    probe: &dyn FsProbe,
    diags: &mut Diagnostics,
    main_dest: &str,
) -> CrateResult<()> {
    let sketch = sketch_path(ctx.log_path);
    if probe.is_file(&sketch) {
        let mut entity = Entity::new(
            "complete_graph.svg",
            &["File", "ImageObject", "WorkflowSketch"],
        );
        entity
            .set("name", json!("complete_graph.svg"))
            .set("contentSize", json!(probe.size(&sketch)?))
            .set(
                "description",
                json!("The graph diagram of the workflow, automatically generated by the runtime"),
            )
            .set(
                "encodingFormat",
                json!(["image/svg+xml", { "@id": PRONOM_SVG }]),
            )
            .set("about", reference(main_dest));
        add_format_context(rocrate, Some((PRONOM_SVG, "Scalable Vector Graphics")));
        rocrate.add_file_from(&sketch, entity);
    } else {
        diags.warn(
            DiagnosticKind::MissingArtifact,
            "complete_graph.svg not found; the crate is generated without the workflow diagram",
        );
    }

    let profile = ctx.cwd.join(&ctx.log.profile_filename);
    if !ctx.log.profile_filename.is_empty() && probe.is_file(&profile) {
        let mut entity = Entity::new(&ctx.log.profile_filename, &["File"]);
        entity
            .set("name", json!(ctx.log.profile_filename))
            .set("contentSize", json!(probe.size(&profile)?))
            .set("description", json!("Application tasks profile"))
            .set(
                "encodingFormat",
                json!(["application/json", { "@id": PRONOM_JSON }]),
            );
        add_format_context(rocrate, Some((PRONOM_JSON, "JSON Data Interchange Format")));
        rocrate.add_file_from(&profile, entity);
    } else {
        diags.warn(
            DiagnosticKind::MissingArtifact,
            "application profile has not been generated; the crate is generated without \
             profiling information",
        );
    }

    let submission = ctx.cwd.join("compss_submission_command_line.txt");
    if probe.is_file(&submission) {
        let mut entity = Entity::new("compss_submission_command_line.txt", &["File"]);
        entity
            .set("name", json!("compss_submission_command_line.txt"))
            .set("contentSize", json!(probe.size(&submission)?))
            .set(
                "description",
                json!(
                    "Submission command line, including flags and parameters passed to \
                     the application"
                ),
            )
            .set("encodingFormat", json!("text/plain"));
        rocrate.add_file_from(&submission, entity);
    }

    let config_name = ctx
        .config_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ro-crate-info.yaml".to_string());
    let mut entity = Entity::new(&config_name, &["File"]);
    entity
        .set("name", json!(config_name))
        .set("contentSize", json!(probe.size(ctx.config_path)?))
        .set(
            "description",
            json!("Workflow provenance YAML configuration file"),
        )
        .set("encodingFormat", json!(["YAML", { "@id": PRONOM_YAML }]));
    add_format_context(rocrate, Some((PRONOM_YAML, "YAML")));
    rocrate.add_file_from(ctx.config_path, entity);

    Ok(())
}

fn sketch_path(log_path: &Path) -> PathBuf {
    log_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("monitor/complete_graph.svg")
}

// ---------------------------------------------------------------------------
// Data entities
// ---------------------------------------------------------------------------

/// Add one input/output reference and return the id it was registered
/// under: the crate-relative destination when content is persisted, the
/// (scheme-fixed) location URI otherwise.
fn add_data_entity(
    rocrate: &mut RoCrate,
    item: &str,
    ctx: &EmitContext<'_>,
    probe: &dyn FsProbe,
) -> CrateResult<String> {
    let Some(parts) = split_uri(item) else {
        // No scheme at all: keep the reference opaque.
        let mut entity = Entity::new(item, &["File"]);
        entity
            .set("name", json!(basename(item)))
            .set("sdDatePublished", json!(iso_now()));
        rocrate.add_file(item, entity);
        return Ok(item.to_string());
    };

    if parts.is_file() {
        let path = Path::new(parts.path);
        let name = basename(parts.path);
        let modified = iso_timestamp(probe.mtime(path)?);
        let size = probe.size(path)?;
        if ctx.persistence {
            let dest = persist_dest(parts.path, ctx.common_paths, ctx.cwd);
            let mut entity = Entity::new(&dest, &["File"]);
            entity
                .set("name", json!(name))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified))
                .set("contentSize", json!(size));
            rocrate.add_file_from(path, entity);
            Ok(dest)
        } else {
            let mut entity = Entity::new(item, &["File"]);
            entity
                .set("name", json!(name))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified))
                .set("contentSize", json!(size));
            rocrate.add_file(item, entity);
            Ok(item.to_string())
        }
    } else if parts.is_dir() {
        add_directory_entity(rocrate, item, &parts, ctx, probe)
    } else {
        // Remote reference: registered by location only.
        let mut entity = Entity::new(item, &["File"]);
        entity
            .set("name", json!(basename(parts.path)))
            .set("sdDatePublished", json!(iso_now()));
        rocrate.add_file(item, entity);
        Ok(item.to_string())
    }
}

/// Describe a whole directory: one entity per contained file, plus a
/// Dataset entity with `hasPart` for the directory itself. References to
/// sub-directories are not workflow inputs or outputs themselves and
/// only show up when empty, so their existence is not lost.
fn add_directory_entity(
    rocrate: &mut RoCrate,
    item: &str,
    parts: &UriParts<'_>,
    ctx: &EmitContext<'_>,
    probe: &dyn FsProbe,
) -> CrateResult<String> {
    let dir_str = parts.path;
    let dir_path = Path::new(dir_str);
    let dir_name = basename(dir_str);
    let mut has_part: Vec<Value> = Vec::new();

    let walker = WalkDir::new(dir_path).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            CrateError::Filesystem(format!("cannot walk {}: {e}", dir_path.display()))
        })?;
        let path = entry.path();
        if path.components().any(|c| c.as_os_str() == "__pycache__") {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('*') {
            continue;
        }

        if entry.file_type().is_file() {
            let rel = path.strip_prefix(dir_path).map_err(|_| {
                CrateError::Assembly(format!(
                    "walked file {} escapes {}",
                    path.display(),
                    dir_path.display()
                ))
            })?;
            let name = basename(&path.to_string_lossy());
            let modified = iso_timestamp(probe.mtime(path)?);
            let size = probe.size(path)?;
            let id = if ctx.persistence {
                format!("{DATASET_DIR}/{dir_name}/{}", rel.display())
            } else {
                uri::file_uri(parts.host, &path.to_string_lossy())
            };
            let mut entity = Entity::new(&id, &["File"]);
            entity
                .set("name", json!(name))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified))
                .set("contentSize", json!(size));
            if ctx.persistence {
                rocrate.add_file_from(path, entity);
            } else {
                rocrate.add_file(&id, entity);
            }
            has_part.push(reference(&id));
        } else if entry.file_type().is_dir() && path != dir_path && dir_is_empty(path)? {
            let rel = path.strip_prefix(dir_path).map_err(|_| {
                CrateError::Assembly(format!(
                    "walked directory {} escapes {}",
                    path.display(),
                    dir_path.display()
                ))
            })?;
            let modified = iso_timestamp(probe.mtime(path)?);
            if ctx.persistence {
                let dest = format!("{DATASET_DIR}/{dir_name}/{}/.gitkeep", rel.display());
                let mut entity = Entity::new(&dest, &["File"]);
                entity
                    .set("name", json!(".gitkeep"))
                    .set("sdDatePublished", json!(iso_now()))
                    .set("dateModified", json!(modified));
                rocrate.add_placeholder_file(entity);
                has_part.push(reference(&dest));
            } else {
                let id = uri::file_uri(parts.host, &format!("{}/", path.display()));
                let mut entity = Entity::new(&id, &["Dataset"]);
                entity
                    .set("name", json!(basename(&path.to_string_lossy())))
                    .set("sdDatePublished", json!(iso_now()))
                    .set("dateModified", json!(modified));
                rocrate.add_dataset(entity);
                has_part.push(reference(&id));
            }
        }
    }

    let modified = iso_timestamp(probe.mtime(dir_path)?);
    if dir_is_empty(dir_path)? {
        if ctx.persistence {
            let keep = format!("{DATASET_DIR}/{dir_name}/.gitkeep");
            let mut entity = Entity::new(&keep, &["File"]);
            entity
                .set("name", json!(".gitkeep"))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified));
            rocrate.add_placeholder_file(entity);
            has_part.push(reference(&keep));

            let dataset_id = format!("{DATASET_DIR}/{dir_name}/");
            let mut dataset = Entity::new(&dataset_id, &["Dataset"]);
            dataset
                .set("name", json!(dir_name))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified))
                .set("hasPart", Value::Array(has_part));
            rocrate.add_dataset(dataset);
            Ok(dataset_id)
        } else {
            let id = fix_dir_url(item);
            let mut dataset = Entity::new(&id, &["Dataset"]);
            dataset
                .set("name", json!(dir_name))
                .set("sdDatePublished", json!(iso_now()))
                .set("dateModified", json!(modified));
            rocrate.add_dataset(dataset);
            Ok(id)
        }
    } else if ctx.persistence {
        let dataset_id = format!("{DATASET_DIR}/{dir_name}/");
        let mut dataset = Entity::new(&dataset_id, &["Dataset"]);
        dataset
            .set("name", json!(dir_name))
            .set("sdDatePublished", json!(iso_now()))
            .set("dateModified", json!(modified))
            .set("hasPart", Value::Array(has_part));
        rocrate.add_dataset(dataset);
        Ok(dataset_id)
    } else {
        let id = fix_dir_url(item);
        let mut dataset = Entity::new(&id, &["Dataset"]);
        dataset
            .set("name", json!(dir_name))
            .set("sdDatePublished", json!(iso_now()))
            .set("dateModified", json!(modified))
            .set("hasPart", Value::Array(has_part));
        rocrate.add_dataset(dataset);
        Ok(id)
    }
}

/// Crate-relative destination of a persisted file.
///
/// The matching common path decides the layout: content under the
/// working directory maps to the `dataset/` root, every other group gets
/// a sub-folder named after the common path's basename.
fn persist_dest(path: &str, common_paths: &[String], cwd: &Path) -> String {
    let cwd_prefix = format!("{}/", cwd.display());
    for prefix in common_paths {
        if let Some(rest) = path.strip_prefix(prefix.as_str()) {
            if *prefix == cwd_prefix {
                return format!("{DATASET_DIR}/{rest}");
            }
            let group = basename(prefix);
            return format!("{DATASET_DIR}/{group}/{rest}");
        }
    }
    // Every persisted file should match one group; keep the basename as
    // a last resort rather than dropping the file.
    format!("{DATASET_DIR}/{}", basename(path))
}

// ---------------------------------------------------------------------------
// Run record and profiles
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn add_create_action(
    rocrate: &mut RoCrate,
    ctx: &EmitContext<'_>,
    main_dest: &str,
    author_ids: &[String],
    object_ids: &[String],
    result_ids: &[String],
    diags: &mut Diagnostics,
) -> String {
    let run_uuid = Uuid::new_v4().to_string();
    let host = ctx.host;
    let main_name = basename(&ctx.sources.main_path().to_string_lossy());

    let (action_id, action_name) = match &host.job_id {
        Some(job) => (
            format!(
                "#{RUNTIME_NAME}_Workflow_Run_Crate_{}_SLURM_JOB_ID_{job}",
                host.cluster
            ),
            format!(
                "{RUNTIME_NAME} {main_name} execution at {} with JOB_ID {job}",
                host.cluster
            ),
        ),
        None => (
            format!(
                "#{RUNTIME_NAME}_Workflow_Run_Crate_{}_{run_uuid}",
                host.cluster
            ),
            format!("{RUNTIME_NAME} {main_name} execution at {}", host.cluster),
        ),
    };
    rocrate.root_mut().set("mentions", reference(&action_id));

    // The submitting agent: the explicit record, else the first author.
    let agent = if let Some(submitter) = &ctx.config.submitter {
        let mut org_ids = Vec::new();
        add_person(rocrate, submitter, &mut org_ids);
        Some(submitter.orcid.clone())
    } else if let Some(first) = author_ids.first() {
        diags.warn(
            DiagnosticKind::MissingSubmitter,
            "'Submitter' not specified; the first author is used as the submitting agent",
        );
        Some(first.clone())
    } else {
        diags.warn(
            DiagnosticKind::MissingSubmitter,
            "no 'Authors' or 'Submitter' specified; the run record has no agent",
        );
        None
    };

    let mut action = Entity::new(&action_id, &["CreateAction"]);
    action
        .set("instrument", reference(main_dest))
        .set(
            "actionStatus",
            reference("http://schema.org/CompletedActionStatus"),
        )
        .set("endTime", json!(iso_now()))
        .set("name", json!(action_name))
        .set("description", json!(host.description()));
    if let Some(agent) = agent {
        action.set("agent", reference(&agent));
    }
    for id in object_ids {
        action.append_to("object", reference(&fix_dir_url(id)));
    }
    for id in result_ids {
        action.append_to("result", reference(&fix_dir_url(id)));
    }
    // The generated crate is itself a result of the run.
    action.append_to("result", reference("./"));
    rocrate.add(action);

    run_uuid
}

fn add_profiles(rocrate: &mut RoCrate) {
    let mut profile_refs: Vec<Value> = Vec::new();
    for (kind, title) in [("process", "Process"), ("workflow", "Workflow")] {
        let id = format!("{PROFILES_BASE}/{kind}/{PROFILES_VERSION}");
        let mut entity = Entity::new(&id, &["CreativeWork"]);
        entity
            .set("name", json!(format!("{title} Run Crate")))
            .set("version", json!(PROFILES_VERSION));
        rocrate.add(entity);
        profile_refs.push(reference(&id));
    }
    let wroc_id = format!("https://w3id.org/workflowhub/workflow-ro-crate/{WROC_PROFILE_VERSION}");
    let mut wroc = Entity::new(&wroc_id, &["CreativeWork"]);
    wroc.set("name", json!("Workflow RO-Crate"))
        .set("version", json!(WROC_PROFILE_VERSION));
    rocrate.add(wroc);
    profile_refs.push(reference(&wroc_id));

    rocrate.root_mut().set("conformsTo", Value::Array(profile_refs));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn basename(path: &str) -> String {
    Path::new(path.trim_end_matches('/'))
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn iso_timestamp(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn dir_is_empty(path: &Path) -> CrateResult<bool> {
    let mut entries = std::fs::read_dir(path)
        .map_err(|e| CrateError::Filesystem(format!("cannot list {}: {e}", path.display())))?;
    Ok(entries.next().is_none())
}

/// Encoding format (and PRONOM context entity) by file suffix.
fn encoding_format(suffix: &str) -> Option<(Value, Option<(&'static str, &'static str)>)> {
    match suffix {
        "py" | "java" | "c" | "cc" | "cpp" => Some((json!("text/plain"), None)),
        "json" => Some((
            json!(["application/json", { "@id": PRONOM_JSON }]),
            Some((PRONOM_JSON, "JSON Data Interchange Format")),
        )),
        "pdf" => Some((
            json!(["application/pdf", { "@id": PRONOM_PDF }]),
            Some((PRONOM_PDF, "Acrobat PDF 1.7 - Portable Document Format")),
        )),
        "svg" => Some((
            json!(["image/svg+xml", { "@id": PRONOM_SVG }]),
            Some((PRONOM_SVG, "Scalable Vector Graphics")),
        )),
        "jar" => Some((
            json!(["application/java-archive", { "@id": PRONOM_JAR }]),
            Some((PRONOM_JAR, "Java Archive Format")),
        )),
        "class" => Some((
            json!(["application/java", { "@id": PRONOM_CLASS }]),
            Some((PRONOM_CLASS, "Java Compiled Object Code")),
        )),
        _ => None,
    }
}

fn add_format_context(rocrate: &mut RoCrate, context: Option<(&str, &str)>) {
    if let Some((id, name)) = context {
        let mut entity = Entity::new(id, &["WebSite"]);
        entity.set("name", json!(name));
        rocrate.add(entity);
    }
}
