//! Accessed-file classification.
//!
//! Turns the flat record stream of the provenance log into the workflow's
//! overall inputs and outputs. A file that is read after having been
//! written is an intermediate file and never a true input.

use provcrate_core::types::{AccessRecord, Direction};
use provcrate_core::uri::{self, split_uri};
use std::collections::HashSet;

/// Classify log records into sorted input and output URI lists.
///
/// Policy per record, in log order:
/// - `IN` / `IN_DELETE`: input unless the URI was already written
///   (intermediate file, silently dropped).
/// - `OUT`: output, unconditionally.
/// - read-write family (`INOUT`, `COMMUTATIVE`, `CONCURRENT`): input only
///   when nothing wrote the URI before; always retained as an output. The
///   runtime cannot tell whether such a file was actually written, so the
///   conservative read keeps it on both sides until later pruning.
///
/// Both lists come back sorted on the URI string form, which places
/// `dir://` entries ahead of `file://` entries, and with every `dir://`
/// entry rewritten to the canonical `dir://<host><path>/` form.
pub fn classify_accesses(records: &[AccessRecord], host: &str) -> (Vec<String>, Vec<String>) {
    let mut inputs: HashSet<&str> = HashSet::new();
    let mut outputs: HashSet<&str> = HashSet::new();

    for record in records {
        let item = record.uri.as_str();
        match record.direction {
            Direction::In | Direction::InDelete => {
                if !outputs.contains(item) {
                    inputs.insert(item);
                }
            }
            Direction::Out => {
                outputs.insert(item);
            }
            Direction::InOut | Direction::Commutative | Direction::Concurrent => {
                if !outputs.contains(item) {
                    inputs.insert(item);
                }
                outputs.insert(item);
            }
        }
    }

    let mut ins: Vec<String> = inputs.into_iter().map(str::to_string).collect();
    let mut outs: Vec<String> = outputs.into_iter().map(str::to_string).collect();
    ins.sort();
    outs.sort();
    fix_dir_entries(&mut ins, host);
    fix_dir_entries(&mut outs, host);

    tracing::info!(inputs = ins.len(), outputs = outs.len(), "accesses classified");

    (ins, outs)
}

/// Rewrite the leading `dir://` entries of a sorted list to the canonical
/// form: local host as authority, trailing path separator.
///
/// The runtime logs directory references without the trailing separator;
/// later prefix matching relies on it being there. The scan stops at the
/// first non-directory entry because `dir://` sorts ahead of `file://`.
fn fix_dir_entries(list: &mut [String], host: &str) {
    for entry in list.iter_mut() {
        let fixed = match split_uri(entry) {
            Some(parts) if parts.is_dir() => uri::dir_uri(host, parts.path),
            _ => break,
        };
        *entry = fixed;
    }
    list.sort();
}
