//! CLI for the provcrate Workflow Run Crate generator.
//!
//! Pipeline: load config -> read log -> resolve sources -> classify ->
//! merge manual datasets -> cross-role fix-up -> common paths -> emit.

use clap::Parser;
use provcrate_analyzer::emitter::EmitContext;
use provcrate_core::diagnostics::Diagnostics;
use provcrate_core::types::Role;
use provcrate_provider::{HostContext, ProvenanceLog, RealFs, RunConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "provcrate",
    version,
    about = "Generate a Workflow Run Crate from a workflow runtime provenance log"
)]
struct Cli {
    /// YAML configuration describing the run (ro-crate-info.yaml).
    info: PathBuf,

    /// Provenance log produced by the workflow runtime.
    log: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let t0 = Instant::now();
    let probe = RealFs;
    let mut diags = Diagnostics::new();
    let cwd = std::env::current_dir()?;

    tracing::info!(info = %cli.info.display(), log = %cli.log.display(), "starting generation");

    // 1. User configuration and provenance log.
    let config = RunConfig::load(&cli.info)?;
    let log = ProvenanceLog::read(&cli.log)?;
    tracing::info!(
        version = %log.runtime_version,
        entry = %log.detected_entry,
        records = log.records.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "inputs read"
    );

    // 2. Application sources and workflow entry point.
    let host = HostContext::detect(&mut diags);
    let sources =
        provcrate_provider::sources::resolve_sources(&config, &log, &cwd, &probe, &mut diags)?;

    // 3. Classify accessed files into runtime-detected inputs and outputs.
    let t_classify = Instant::now();
    let (mut inputs, mut outputs) =
        provcrate_analyzer::classify_accesses(&log.records, &host.hostname);
    tracing::info!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        elapsed_ms = t_classify.elapsed().as_millis(),
        "provenance log processed"
    );

    // 4. Merge any manually declared datasets, then drop input files that
    //    an output directory already captures.
    if config.inputs.is_some() {
        provcrate_analyzer::merge_declared(
            Role::Input,
            &config.declared_inputs(),
            &mut inputs,
            &host.hostname,
            &probe,
            &mut diags,
        )?;
    }
    if config.outputs.is_some() {
        provcrate_analyzer::merge_declared(
            Role::Output,
            &config.declared_outputs(),
            &mut outputs,
            &host.hostname,
            &probe,
            &mut diags,
        )?;
    }
    provcrate_analyzer::fix_inputs_under_output_dirs(&mut inputs, &outputs, &mut diags);

    // 5. Common paths drive the payload layout, needed only when dataset
    //    content is physically copied into the crate.
    let common = if config.data_persistence {
        let mut merged = inputs.clone();
        merged.extend(outputs.iter().cloned());
        provcrate_analyzer::common_paths(&merged)
    } else {
        Vec::new()
    };

    // 6. Assemble and write the crate.
    let t_emit = Instant::now();
    let ctx = EmitContext {
        config: &config,
        config_path: &cli.info,
        log: &log,
        log_path: &cli.log,
        sources: &sources,
        inputs: &inputs,
        outputs: &outputs,
        common_paths: &common,
        persistence: config.data_persistence,
        host: &host,
        cwd: &cwd,
    };
    let folder = provcrate_analyzer::emit_crate(&ctx, &probe, &mut diags)?;
    tracing::info!(
        elapsed_ms = t_emit.elapsed().as_millis(),
        "crate written"
    );

    tracing::info!(
        folder = %folder.display(),
        warnings = diags.len(),
        total_ms = t0.elapsed().as_millis(),
        "workflow provenance successfully generated"
    );
    println!(
        "Workflow Run Crate generated in sub-folder:\n\t{}",
        folder.display()
    );

    Ok(())
}
