use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fstree_core::{
    collect_entries, diff_trees, prune_named, tree_diff, CompareOptions, EntryInfo, Rank,
};
use fstree_testing::assertions::{
    assert_file_content, assert_tree_matches, assert_trees_equal, assert_trees_equal_with,
};
use fstree_testing::fixtures::{nodes, rfc3339, sample_tree};
use fstree_testing::{init_test_logging, TempTree};

#[test]
fn test_round_trip_keeps_attributes() {
    init_test_logging();
    let expected = sample_tree();
    let tree = TempTree::create(&expected).unwrap();

    let entries = collect_entries(tree.path()).unwrap();
    assert_eq!(entries.len(), expected.len());

    for node in &expected {
        let entry = entries
            .iter()
            .find(|e| e.path == tree.path().join(node.path()))
            .unwrap_or_else(|| panic!("missing {:?}", node.path()));

        assert_eq!(entry.is_dir, node.is_dir());
        #[cfg(unix)]
        assert_eq!(entry.mode, node.perm, "mode of {:?}", node.path());

        let skew = entry
            .modified
            .duration_since(node.time)
            .or_else(|_| node.time.duration_since(entry.modified))
            .unwrap();
        assert!(skew <= Duration::from_millis(5), "time of {:?}", node.path());

        if !node.is_dir() {
            assert_eq!(entry.size, node.body.len() as u64);
        }
    }
}

#[test]
fn test_clone_matches_under_full_chain() {
    let source = TempTree::create(&sample_tree()).unwrap();
    let clone = TempTree::clone_from(source.path()).unwrap();

    assert_trees_equal(source.path(), clone.path(), &Rank::ALL).unwrap();
    assert_trees_equal_with(source.path(), clone.path(), &Rank::ALL, &CompareOptions::strict())
        .unwrap();
}

#[test]
fn test_single_byte_change() {
    let a = TempTree::create(&nodes(
        "2001-01-01T01:01:01Z\t0750\tx/\n2001-01-01T01:01:01Z\t0640\tx/f.txt\thello\n",
    ))
    .unwrap();
    let b = TempTree::clone_from(a.path()).unwrap();

    let chain = [Rank::Name, Rank::Dir, Rank::Size, Rank::Content];
    assert!(tree_diff(a.path(), b.path(), &chain).unwrap().is_empty());

    fs::write(b.path().join("x/f.txt"), "hellp").unwrap();
    assert_file_content(&b.path().join("x/f.txt"), b"hellp").unwrap();

    let diags = tree_diff(a.path(), b.path(), &chain).unwrap();
    assert_eq!(diags.len(), 2);
    assert!(diags[0].contains("f.txt"));
    assert!(diags[1].contains("f.txt"));
}

#[test]
fn test_modified_time_is_detected() {
    let a = TempTree::create(&nodes("2001-01-01T01:01:01Z\t0600\tf\tbody\n")).unwrap();
    let b = TempTree::clone_from(a.path()).unwrap();

    let later = filetime::FileTime::from_system_time(rfc3339("2001-01-01T01:01:02Z"));
    filetime::set_file_mtime(b.path().join("f"), later).unwrap();

    let diff = diff_trees(a.path(), b.path(), &[Rank::Name, Rank::Time]).unwrap();
    assert_eq!(diff.only_left.len(), 1);
    assert_eq!(diff.only_right.len(), 1);
}

#[test]
fn test_pruned_stakes_match_expected_twin() {
    let checked_in = TempTree::create(&nodes(
        "
        2001-01-01T01:01:01Z\t0700\tempty/
        2001-01-01T01:01:01Z\t0600\tempty/.gitkeep
        2001-01-01T01:01:01Z\t0700\tfull/
        2001-01-01T01:01:01Z\t0600\tfull/.gitkeep
        2001-01-01T01:01:01Z\t0600\tfull/data\tpayload
        ",
    ))
    .unwrap();

    let clone = TempTree::clone_from(checked_in.path()).unwrap();
    assert_eq!(prune_named(clone.path(), ".gitkeep").unwrap(), 2);

    assert_tree_matches(
        clone.path(),
        &nodes(
            "
            2001-01-01T01:01:01Z\t0700\tempty/
            2001-01-01T01:01:01Z\t0700\tfull/
            2001-01-01T01:01:01Z\t0600\tfull/data\tpayload
            ",
        ),
        &[Rank::Name, Rank::Dir, Rank::Size, Rank::Perm, Rank::Content],
    )
    .unwrap();
}

fn rel_paths(entries: &[EntryInfo]) -> Vec<PathBuf> {
    entries.iter().map(|e| e.rel_path.clone()).collect()
}

#[test]
fn test_nested_children_differ_in_either_direction() {
    let a = TempTree::create(&nodes(
        "
        2001-01-01T01:01:01Z\t0700\td/
        2001-01-01T01:01:01Z\t0700\td/sub/
        2001-01-01T01:01:01Z\t0600\td/sub/m\tx
        2001-01-01T01:01:01Z\t0600\td/tail\tx
        2001-01-01T01:01:01Z\t0600\te\tx
        ",
    ))
    .unwrap();
    let b = TempTree::create(&nodes(
        "
        2001-01-01T01:01:01Z\t0700\td/
        2001-01-01T01:01:01Z\t0700\td/sub/
        2001-01-01T01:01:01Z\t0600\td/sub/n\tx
        2001-01-01T01:01:01Z\t0600\td/tail\tx
        2001-01-01T01:01:01Z\t0600\te\tx
        ",
    ))
    .unwrap();

    let chain = [Rank::Name, Rank::Dir, Rank::Size];
    let diff = diff_trees(a.path(), b.path(), &chain).unwrap();
    assert_eq!(rel_paths(&diff.only_left), vec![Path::new("d/sub/m")]);
    assert_eq!(rel_paths(&diff.only_right), vec![Path::new("d/sub/n")]);

    let diff = diff_trees(b.path(), a.path(), &chain).unwrap();
    assert_eq!(rel_paths(&diff.only_left), vec![Path::new("d/sub/n")]);
    assert_eq!(rel_paths(&diff.only_right), vec![Path::new("d/sub/m")]);

    let diags = tree_diff(a.path(), b.path(), &chain).unwrap();
    assert_eq!(diags.len(), 2);
    assert!(!diags.iter().any(|d| d.contains("d/tail")));
}

#[test]
fn test_extra_nested_child_before_later_siblings() {
    let full = TempTree::create(&nodes(
        "
        2001-01-01T01:01:01Z\t0700\td/
        2001-01-01T01:01:01Z\t0600\td/z\tx
        2001-01-01T01:01:01Z\t0600\te\tx
        2001-01-01T01:01:01Z\t0600\tf\tx
        ",
    ))
    .unwrap();
    let sparse = TempTree::clone_from(full.path()).unwrap();
    fs::remove_file(sparse.path().join("d/z")).unwrap();

    let chain = [Rank::Name, Rank::Dir, Rank::Size];
    let diff = diff_trees(full.path(), sparse.path(), &chain).unwrap();
    assert_eq!(rel_paths(&diff.only_left), vec![Path::new("d/z")]);
    assert!(diff.only_right.is_empty());

    let diff = diff_trees(sparse.path(), full.path(), &chain).unwrap();
    assert!(diff.only_left.is_empty());
    assert_eq!(rel_paths(&diff.only_right), vec![Path::new("d/z")]);
}
