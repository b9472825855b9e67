//! Access classification, common-path resolution, dataset reconciliation,
//! and crate emission.

pub mod classify;
pub mod common_path;
pub mod emitter;
pub mod reconcile;

pub use classify::classify_accesses;
pub use common_path::common_paths;
pub use emitter::{emit_crate, EmitContext};
pub use reconcile::{fix_inputs_under_output_dirs, merge_declared};
