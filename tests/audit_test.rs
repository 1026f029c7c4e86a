//! Tests for DownlineAuditor

use rstest::rstest;

use refnet::domain::{audit_downline, build_tree, DownlineAuditor, RelationEntry};
use refnet::util::testing::{entry, init_test_setup, sample_entries};

fn wide() -> Vec<RelationEntry> {
    let mut entries = vec![entry("w", None, 1)];
    for i in 0..8 {
        entries.push(entry(&format!("w{}", i), Some("w"), 2));
    }
    entries
}

fn deep() -> Vec<RelationEntry> {
    vec![
        entry("d1", None, 1),
        entry("d2", Some("d1"), 2),
        entry("d3", Some("d2"), 3),
        entry("d4", Some("d3"), 4),
        entry("d5", Some("d4"), 5),
    ]
}

fn two_roots() -> Vec<RelationEntry> {
    vec![
        entry("p", None, 1),
        entry("q", None, 1),
        entry("p1", Some("p"), 2),
        entry("q1", Some("q"), 2),
        entry("q2", Some("q"), 2),
        entry("q11", Some("q1"), 3),
        entry("p11", Some("p1"), 3),
    ]
}

#[test]
fn given_sample_network_when_auditing_root_then_counts_agree() {
    // Arrange
    init_test_setup();
    let entries = sample_entries();
    let tree = build_tree(&entries, 5);

    // Act
    let report = audit_downline(&entries, &tree, "u1");

    // Assert
    assert!(report.found);
    assert_eq!(report.direct_by_relation, 2);
    assert_eq!(report.total_by_relation, 3);
    assert_eq!(report.direct_by_tree, 2);
    assert_eq!(report.total_by_tree, 3);
    assert!(!report.mismatch);
    let direct: Vec<&str> = report.direct_list.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(direct, vec!["u2", "u3"]);
}

#[rstest]
fn given_well_formed_data_when_auditing_every_entry_then_never_mismatches(
    #[values(wide(), deep(), two_roots(), sample_entries())] entries: Vec<RelationEntry>,
) {
    let tree = build_tree(&entries, 5);
    let auditor = DownlineAuditor::new(&entries, &tree);

    for e in &entries {
        let report = auditor.audit(&e.id);
        assert!(report.found);
        assert!(!report.mismatch, "unexpected mismatch: {:?}", report);
        assert_eq!(report.direct_by_relation, report.direct_by_tree);
        assert_eq!(report.total_by_relation, report.total_by_tree);
    }
}

#[test]
fn given_unknown_id_when_auditing_then_reports_not_found() {
    let entries = sample_entries();
    let tree = build_tree(&entries, 5);

    let report = audit_downline(&entries, &tree, "nobody@typo");

    assert!(!report.found);
    assert_eq!(report.direct_by_relation, 0);
    assert_eq!(report.direct_by_tree, 0);
    assert_eq!(report.total_by_relation, 0);
    assert_eq!(report.total_by_tree, 0);
    assert!(!report.mismatch);
    assert!(report.direct_list.is_empty());
}

#[test]
fn given_duplicated_row_with_other_referrer_when_auditing_ancestor_then_reports_mismatch() {
    // Arrange: u4 listed a second time under u3
    let mut entries = sample_entries();
    entries.push(entry("u4", Some("u3"), 3));
    let tree = build_tree(&entries, 5);

    // Act
    let report = audit_downline(&entries, &tree, "u1");

    // Assert: the tree shows u4 twice, the relation counts it once
    assert!(report.mismatch);
    assert_eq!(report.total_by_relation, 3);
    assert_eq!(report.total_by_tree, 4);
    assert!(!report.direct_mismatch());
    assert!(report.total_mismatch());
}

#[test]
fn given_cycle_when_auditing_then_terminates_and_counts_each_id_once() {
    let entries = vec![
        entry("A", Some("C"), 1),
        entry("B", Some("A"), 2),
        entry("C", Some("B"), 3),
    ];
    let tree = build_tree(&entries, 5);

    let report = audit_downline(&entries, &tree, "A");

    assert_eq!(report.direct_by_relation, 1);
    assert_eq!(report.total_by_relation, 2);
    assert_eq!(report.total_by_tree, 2);
    assert!(!report.mismatch);
}

#[test]
fn given_tree_truncated_by_max_depth_when_auditing_then_reports_hidden_downline() {
    // Arrange: d1..d5 built with max depth 2 hides d3..d5
    let entries = deep();
    let tree = build_tree(&entries, 2);

    // Act
    let report = audit_downline(&entries, &tree, "d1");

    // Assert
    assert_eq!(report.direct_by_relation, 1);
    assert_eq!(report.direct_by_tree, 1);
    assert_eq!(report.total_by_relation, 4);
    assert_eq!(report.total_by_tree, 1);
    assert!(report.mismatch);
}

#[test]
fn given_entry_outside_any_tree_when_auditing_then_tree_counts_are_zero() {
    // Arrange: "x" hangs off a referrer missing from the list
    let mut entries = sample_entries();
    entries.push(entry("x", Some("ghost"), 2));
    entries.push(entry("y", Some("x"), 3));
    let tree = build_tree(&entries, 5);

    // Act
    let report = audit_downline(&entries, &tree, "x");

    // Assert
    assert!(report.found);
    assert_eq!(report.direct_by_relation, 1);
    assert_eq!(report.total_by_relation, 1);
    assert_eq!(report.direct_by_tree, 0);
    assert_eq!(report.total_by_tree, 0);
    assert!(report.mismatch);
}

#[test]
fn given_very_long_referrer_chain_when_auditing_root_then_counts_whole_chain() {
    // Arrange: 100k entries in one line, far deeper than any call stack allows
    let len = 100_000;
    let entries: Vec<RelationEntry> = (0..len)
        .map(|i| {
            let referrer = (i > 0).then(|| format!("n{}", i - 1));
            entry(&format!("n{}", i), referrer.as_deref(), i + 1)
        })
        .collect();
    let tree = build_tree(&entries, 5);

    // Act
    let report = audit_downline(&entries, &tree, "n0");

    // Assert
    assert_eq!(report.direct_by_relation, 1);
    assert_eq!(report.total_by_relation, len as usize - 1);
    assert_eq!(report.total_by_tree, 4);
    assert!(report.mismatch);
}
