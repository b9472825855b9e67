//! Structured warning collector.
//!
//! Best-effort conditions (a declared path that does not exist, a duplicate
//! addition, an entry-point mismatch) do not abort the run. Instead of
//! printing and forgetting, every warning is recorded here and returned
//! alongside results, so callers and tests can assert on them without
//! capturing output streams. Each warning is also mirrored to
//! `tracing::warn!` for the interactive log.

use serde::Serialize;

/// Category of a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A declared source or dataset path does not exist.
    MissingPath,
    /// The same path was added twice (detected + declared, or declared twice).
    DuplicateEntry,
    /// An entry already represented by an ancestor directory was dropped.
    SubsumedEntry,
    /// An input file was dropped because an output directory contains it.
    InputInsideOutputDir,
    /// Declared and detected entry points disagree.
    EntryPointMismatch,
    /// No submitter given; a fallback was chosen (or none at all).
    MissingSubmitter,
    /// Source resolution produced no files.
    EmptySources,
    /// An optional run artifact (profile, workflow sketch) is absent.
    MissingArtifact,
    /// Host introspection fell back to a default.
    HostIntrospection,
}

/// One recorded warning.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Append-only collection of warnings for one generation run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to the tracing log.
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = ?kind, "{message}");
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of warnings of one category.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// True if any warning of the category was recorded.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}
