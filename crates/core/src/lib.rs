//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod diagnostics;
pub mod error;
pub mod types;
pub mod uri;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CrateError, CrateResult};
pub use types::{AccessRecord, Direction, Role, SourceFile, SourceRole};
