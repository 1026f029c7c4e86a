//! Tests for the ancestor-preserving tree filter

use refnet::domain::{build_tree, filter_tree, iter_forest, EntryFilter, TreeNode};
use refnet::util::testing::{entry, sample_entries};

fn ids(forest: &[TreeNode]) -> Vec<&str> {
    iter_forest(forest).map(|n| n.id()).collect()
}

#[test]
fn given_chain_with_matching_leaf_when_filtering_then_keeps_ancestor_path() {
    // Arrange: root -> mid -> leaf, only leaf matches
    let entries = vec![
        entry("root", None, 1),
        entry("mid", Some("root"), 2),
        entry("leaf", Some("mid"), 3),
    ];
    let forest = build_tree(&entries, 5);

    // Act
    let filtered = filter_tree(&forest, |e| e.id == "leaf");

    // Assert
    assert_eq!(filtered.len(), 1);
    let root = &filtered[0];
    assert_eq!(root.id(), "root");
    assert_eq!(root.children.len(), 1);
    let mid = &root.children[0];
    assert_eq!(mid.id(), "mid");
    assert_eq!(mid.children.len(), 1);
    assert_eq!(mid.children[0].id(), "leaf");
    assert!(mid.children[0].children.is_empty());
}

#[test]
fn given_always_true_predicate_when_filtering_then_result_equals_input() {
    let forest = build_tree(&sample_entries(), 5);

    let filtered = filter_tree(&forest, |_| true);

    assert_eq!(filtered, forest);
}

#[test]
fn given_filtered_copy_when_mutating_it_then_source_tree_is_unchanged() {
    let forest = build_tree(&sample_entries(), 5);
    let mut filtered = filter_tree(&forest, |_| true);

    filtered[0].children.clear();
    filtered[0].entry.display_name = "changed".to_string();

    assert_eq!(forest[0].children.len(), 2);
    assert_eq!(forest[0].entry.display_name, "Uma One");
}

#[test]
fn given_predicate_matching_nothing_when_filtering_then_result_is_empty() {
    let forest = build_tree(&sample_entries(), 5);

    let filtered = filter_tree(&forest, |_| false);

    assert!(filtered.is_empty());
}

#[test]
fn given_matching_parent_when_filtering_then_non_matching_subtrees_are_dropped_per_child() {
    // Arrange
    // top (match)
    // ├── a        (no match, leaf)      -> dropped
    // └── b        (no match)            -> kept as ancestor
    //     ├── bm   (match)
    //     └── bn   (no match, leaf)      -> dropped
    let entries = vec![
        entry("top", None, 1),
        entry("a", Some("top"), 2),
        entry("b", Some("top"), 2),
        entry("bm", Some("b"), 3),
        entry("bn", Some("b"), 3),
    ];
    let forest = build_tree(&entries, 5);

    // Act
    let filtered = filter_tree(&forest, |e| e.id == "top" || e.id == "bm");

    // Assert
    assert_eq!(ids(&filtered), vec!["top", "b", "bm"]);
}

#[test]
fn given_search_text_when_applying_entry_filter_then_matches_name_or_email() {
    let forest = build_tree(&sample_entries(), 5);

    let by_name = EntryFilter::new().search("uwe").apply(&forest);
    let by_email = EntryFilter::new().search("EXAMPLE.ORG").apply(&forest);

    assert_eq!(ids(&by_name), vec!["u1", "u2", "u4"]);
    assert_eq!(ids(&by_email), vec!["u1", "u3"]);
}

#[test]
fn given_qualifies_filter_when_applying_then_keeps_qualified_and_their_ancestors() {
    let forest = build_tree(&sample_entries(), 5);

    let qualified = EntryFilter::new().qualifies(Some(true)).apply(&forest);
    let unqualified = EntryFilter::new().qualifies(Some(false)).apply(&forest);

    assert_eq!(ids(&qualified), vec!["u1", "u3"]);
    // u1 does not qualify for "false" but stays as ancestor of u2/u4
    assert_eq!(ids(&unqualified), vec!["u1", "u2", "u4"]);
}

#[test]
fn given_search_and_status_when_applying_then_both_must_hold() {
    let forest = build_tree(&sample_entries(), 5);

    let filtered = EntryFilter::new()
        .search("example.com")
        .qualifies(Some(true))
        .apply(&forest);

    // only u1 has an example.com address and qualifies
    assert_eq!(ids(&filtered), vec!["u1"]);
}
