//! Host and batch-environment introspection.
//!
//! Enriches the run record with where the workflow ran: hostname (or the
//! cluster name under SLURM), kernel identification from one blocking
//! `uname -a` call, and the SLURM job variables worth preserving.

use provcrate_core::diagnostics::{DiagnosticKind, Diagnostics};
use std::process::Command;

/// Batch-scheduler variables copied into the run description.
const BATCH_ENV_PREFIXES: [&str; 3] = ["SLURM_JOB", "SLURM_MEM", "SLURM_SUBMIT"];

/// Facts about the machine the generator runs on.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub hostname: String,
    /// Cluster identifier when running under SLURM, hostname otherwise.
    pub cluster: String,
    pub job_id: Option<String>,
    /// Output of `uname -a`, empty when unavailable.
    pub uname: String,
    /// Preserved batch variables, sorted by name.
    pub batch_env: Vec<(String, String)>,
}

impl HostContext {
    pub fn detect(diags: &mut Diagnostics) -> Self {
        let hostname = match sysinfo::System::host_name() {
            Some(name) => name,
            None => {
                diags.warn(
                    DiagnosticKind::HostIntrospection,
                    "hostname could not be determined; using 'localhost'",
                );
                "localhost".to_string()
            }
        };

        let cluster = std::env::var("SLURM_CLUSTER_NAME").unwrap_or_else(|_| hostname.clone());
        let job_id = std::env::var("SLURM_JOB_ID").ok();

        let uname = match Command::new("uname").arg("-a").output() {
            Ok(out) if out.status.success() => {
                String::from_utf8_lossy(&out.stdout).trim_end().to_string()
            }
            _ => {
                diags.warn(
                    DiagnosticKind::HostIntrospection,
                    "'uname -a' failed; the run description will omit kernel identification",
                );
                String::new()
            }
        };

        let mut batch_env: Vec<(String, String)> = std::env::vars()
            .filter(|(name, _)| {
                BATCH_ENV_PREFIXES.iter().any(|p| name.starts_with(p)) && name != "SLURM_JOBID"
            })
            .collect();
        batch_env.sort();

        tracing::debug!(
            hostname = %hostname,
            cluster = %cluster,
            job_id = job_id.as_deref().unwrap_or("-"),
            batch_vars = batch_env.len(),
            "host context detected"
        );

        Self {
            hostname,
            cluster,
            job_id,
            uname,
            batch_env,
        }
    }

    /// Human-readable description for the run record: kernel line plus the
    /// preserved batch variables.
    pub fn description(&self) -> String {
        let mut description = self.uname.clone();
        for (name, value) in &self.batch_env {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&format!("{name}={value}"));
        }
        description
    }
}
