//! Provenance log reader.
//!
//! The runtime writes one log per run: three fixed header lines (runtime
//! version, main-entry identifier, output-profile filename) followed by one
//! `<uri> <direction-token>` record per accessed file.

use provcrate_core::error::{CrateError, CrateResult};
use provcrate_core::types::{AccessRecord, Direction};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parsed provenance log.
#[derive(Debug, Clone)]
pub struct ProvenanceLog {
    /// Runtime version string (first header line).
    pub runtime_version: String,
    /// Main-entry identifier as reported by the runtime (second header
    /// line): a script filename for Python applications, a dotted class
    /// path otherwise.
    pub detected_entry: String,
    /// Basename of the task-profile file named in the third header line.
    pub profile_filename: String,
    pub records: Vec<AccessRecord>,
}

impl ProvenanceLog {
    /// Read and parse a provenance log.
    ///
    /// A log with fewer than three header lines is a fatal format error.
    /// Record lines that do not split into exactly two space-separated
    /// fields are dismissed.
    pub fn read(path: &Path) -> CrateResult<Self> {
        let file = File::open(path).map_err(|e| {
            CrateError::Log(format!("cannot open {}: {e}", path.display()))
        })?;
        let mut lines = BufReader::new(file).lines();

        let mut header = |what: &str| -> CrateResult<String> {
            match lines.next() {
                Some(line) => Ok(line?.trim_end().to_string()),
                None => Err(CrateError::Log(format!(
                    "{} is truncated: missing {what} header line",
                    path.display()
                ))),
            }
        };

        let runtime_version = header("runtime version")?;
        let detected_entry = header("main entry")?;
        let profile_line = header("output profile")?;
        let profile_filename = Path::new(&profile_line)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            let fields: Vec<&str> = line.trim_end().split(' ').collect();
            if fields.len() != 2 {
                continue;
            }
            // Tokens outside the known set take the conservative
            // read-write policy, like the runtime's INOUT family.
            let direction = fields[1]
                .parse::<Direction>()
                .unwrap_or(Direction::InOut);
            records.push(AccessRecord {
                uri: fields[0].to_string(),
                direction,
            });
        }

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            version = %runtime_version,
            "provenance log parsed"
        );

        Ok(Self {
            runtime_version,
            detected_entry,
            profile_filename,
            records,
        })
    }

    /// Filename to look for in the working directory when no sources are
    /// declared: the script name itself for Python entries, the class
    /// basename with a `.java` suffix otherwise.
    pub fn entry_filename(&self) -> String {
        entry_filename(&self.detected_entry)
    }

    /// Path fragment used to locate the entry among resolved source
    /// files: dotted class paths become nested paths.
    pub fn entry_match_path(&self) -> String {
        entry_match_path(&self.detected_entry)
    }
}

fn entry_filename(detected: &str) -> String {
    if detected.ends_with(".py") {
        detected.to_string()
    } else {
        let basename = detected.rsplit('.').next().unwrap_or(detected);
        format!("{basename}.java")
    }
}

fn entry_match_path(detected: &str) -> String {
    if detected.ends_with(".py") {
        detected.to_string()
    } else {
        format!("{}.java", detected.replace('.', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_entry_is_used_verbatim() {
        assert_eq!(entry_filename("matmul.py"), "matmul.py");
        assert_eq!(entry_match_path("matmul.py"), "matmul.py");
    }

    #[test]
    fn dotted_entry_becomes_a_java_path() {
        assert_eq!(entry_filename("matmul.files.Matmul"), "Matmul.java");
        assert_eq!(
            entry_match_path("matmul.files.Matmul"),
            "matmul/files/Matmul.java"
        );
    }
}
