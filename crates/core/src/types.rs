//! Domain types for the provcrate generator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CrateError;

// ---------------------------------------------------------------------------
// Access records
// ---------------------------------------------------------------------------

/// Access direction of one provenance-log record.
///
/// `In`/`InDelete` mark pure reads, `Out` a pure write. The remaining three
/// are the read-write family: the runtime cannot tell whether the file was
/// read before being written, so classification treats them conservatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    InOut,
    InDelete,
    Commutative,
    Concurrent,
}

impl Direction {
    /// True for the read-write family (`INOUT`, `COMMUTATIVE`, `CONCURRENT`).
    pub fn is_read_write(&self) -> bool {
        matches!(
            self,
            Direction::InOut | Direction::Commutative | Direction::Concurrent
        )
    }
}

impl FromStr for Direction {
    type Err = CrateError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "IN" => Ok(Direction::In),
            "OUT" => Ok(Direction::Out),
            "INOUT" => Ok(Direction::InOut),
            "IN_DELETE" => Ok(Direction::InDelete),
            "COMMUTATIVE" => Ok(Direction::Commutative),
            "CONCURRENT" => Ok(Direction::Concurrent),
            other => Err(CrateError::Log(format!("unknown direction token: {other}"))),
        }
    }
}

/// One accessed-file record from the provenance log.
///
/// Ephemeral: produced per log line and consumed during classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub uri: String,
    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// Dataset roles
// ---------------------------------------------------------------------------

/// Which side of the run a data entity belongs to.
///
/// `Display` renders the configuration-file term (`inputs`/`outputs`) so
/// warnings can name the YAML key the user wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Input,
    Output,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Input => f.write_str("inputs"),
            Role::Output => f.write_str("outputs"),
        }
    }
}

// ---------------------------------------------------------------------------
// Source files
// ---------------------------------------------------------------------------

/// Role of an application source file inside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceRole {
    /// The workflow entry point. Exactly one per run.
    Main,
    Auxiliary,
}

/// A resolved application source file, absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub role: SourceRole,
}

impl SourceFile {
    pub fn is_main(&self) -> bool {
        self.role == SourceRole::Main
    }
}
