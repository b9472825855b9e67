//! Classification policy tests: every URI ends up in exactly one of
//! inputs/outputs, except where the read-write family deliberately keeps
//! it in both.

use provcrate_analyzer::classify_accesses;
use provcrate_core::types::AccessRecord;

const HOST: &str = "node1";

fn rec(uri: &str, token: &str) -> AccessRecord {
    AccessRecord {
        uri: uri.to_string(),
        direction: token.parse().unwrap(),
    }
}

#[test]
fn read_write_read_keeps_true_input_and_output_apart() {
    // A read, B written, A read again; A never written.
    let records = vec![
        rec("file://node1/job/A.txt", "IN"),
        rec("file://node1/job/B.txt", "OUT"),
        rec("file://node1/job/A.txt", "IN"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert_eq!(ins, vec!["file://node1/job/A.txt"]);
    assert_eq!(outs, vec!["file://node1/job/B.txt"]);
}

#[test]
fn file_written_then_read_is_intermediate() {
    let records = vec![
        rec("file://node1/job/A.txt", "OUT"),
        rec("file://node1/job/A.txt", "IN"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert!(ins.is_empty());
    assert_eq!(outs, vec!["file://node1/job/A.txt"]);
}

#[test]
fn in_delete_behaves_like_in() {
    let records = vec![
        rec("file://node1/job/A.txt", "OUT"),
        rec("file://node1/job/A.txt", "IN_DELETE"),
        rec("file://node1/job/B.txt", "IN_DELETE"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert_eq!(ins, vec!["file://node1/job/B.txt"]);
    assert_eq!(outs, vec!["file://node1/job/A.txt"]);
}

#[test]
fn inout_with_no_prior_write_lands_on_both_sides() {
    // The runtime cannot prove the file was written elsewhere, so it is
    // conservatively retained as an output even though it may only ever
    // have been read.
    let records = vec![rec("file://node1/job/A.txt", "INOUT")];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert_eq!(ins, vec!["file://node1/job/A.txt"]);
    assert_eq!(outs, vec!["file://node1/job/A.txt"]);
}

#[test]
fn inout_after_out_is_not_an_input() {
    let records = vec![
        rec("file://node1/job/A.txt", "OUT"),
        rec("file://node1/job/A.txt", "INOUT"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert!(ins.is_empty());
    assert_eq!(outs, vec!["file://node1/job/A.txt"]);
}

#[test]
fn commutative_and_concurrent_follow_the_read_write_policy() {
    let records = vec![
        rec("file://node1/job/A.txt", "COMMUTATIVE"),
        rec("file://node1/job/B.txt", "CONCURRENT"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert_eq!(
        ins,
        vec!["file://node1/job/A.txt", "file://node1/job/B.txt"]
    );
    assert_eq!(
        outs,
        vec!["file://node1/job/A.txt", "file://node1/job/B.txt"]
    );
}

#[test]
fn dir_entries_are_canonicalized_and_sort_first() {
    // The runtime logs directories without the trailing separator and
    // with its own authority; both are rewritten.
    let records = vec![
        rec("file://node1/job/z.txt", "IN"),
        rec("dir://node9/job/data", "IN"),
    ];
    let (ins, _) = classify_accesses(&records, HOST);
    assert_eq!(ins, vec!["dir://node1/job/data/", "file://node1/job/z.txt"]);
}

#[test]
fn duplicate_records_collapse() {
    let records = vec![
        rec("file://node1/job/A.txt", "IN"),
        rec("file://node1/job/A.txt", "IN"),
        rec("file://node1/job/B.txt", "OUT"),
        rec("file://node1/job/B.txt", "OUT"),
    ];
    let (ins, outs) = classify_accesses(&records, HOST);
    assert_eq!(ins.len(), 1);
    assert_eq!(outs.len(), 1);
}

#[test]
fn results_come_back_sorted() {
    let records = vec![
        rec("file://node1/job/c.txt", "IN"),
        rec("file://node1/job/a.txt", "IN"),
        rec("file://node1/job/b.txt", "IN"),
    ];
    let (ins, _) = classify_accesses(&records, HOST);
    let mut expected = ins.clone();
    expected.sort();
    assert_eq!(ins, expected);
}
