//! Common assertions for fstree testing

use crate::temp::TempTree;
use anyhow::{Context, Result};
use fstree_core::{diff_trees_with, CompareOptions, Node, Rank};
use std::path::Path;

/// Asserts that two trees have no differences under `ranks`
#[track_caller]
pub fn assert_trees_equal(left: &Path, right: &Path, ranks: &[Rank]) -> Result<()> {
    assert_trees_equal_with(left, right, ranks, &CompareOptions::default())
}

/// Like [`assert_trees_equal`], with explicit comparison options
#[track_caller]
pub fn assert_trees_equal_with(
    left: &Path,
    right: &Path,
    ranks: &[Rank],
    options: &CompareOptions,
) -> Result<()> {
    let diff = diff_trees_with(left, right, ranks, options)
        .with_context(|| format!("Failed to compare {:?} with {:?}", left, right))?;

    assert!(
        diff.is_empty(),
        "Trees differ under {:?}:\n{}",
        ranks,
        diff.diagnostics().join("")
    );

    Ok(())
}

/// Asserts that the tree at `root` matches the tree `expected` describes
#[track_caller]
pub fn assert_tree_matches(root: &Path, expected: &[Node], ranks: &[Rank]) -> Result<()> {
    let twin = TempTree::create(expected)?;
    assert_trees_equal(root, twin.path(), ranks)?;
    twin.close()
}

/// Asserts that a file holds exactly `expected`
#[track_caller]
pub fn assert_file_content(path: &Path, expected: &[u8]) -> Result<()> {
    let content = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;

    assert_eq!(
        content,
        expected,
        "Content mismatch for {:?}: got {:?}",
        path,
        String::from_utf8_lossy(&content)
    );

    Ok(())
}

/// Asserts that an entry has specific permission bits (Unix only)
#[cfg(unix)]
#[track_caller]
pub fn assert_file_permissions(path: &Path, expected: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path)?;
    let mode = metadata.permissions().mode() & 0o7777;

    assert_eq!(
        mode, expected,
        "Permission mismatch for {:?}: expected {:o}, got {:o}",
        path, expected, mode
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_equal_trees_pass() {
        let a = TempTree::new().unwrap();
        let b = TempTree::new().unwrap();
        fs::write(a.path().join("same"), "1").unwrap();
        fs::write(b.path().join("same"), "1").unwrap();

        assert_trees_equal(a.path(), b.path(), &[Rank::Name, Rank::Content]).unwrap();
    }

    #[test]
    #[should_panic(expected = "Trees differ")]
    fn test_different_trees_panic() {
        let a = TempTree::new().unwrap();
        let b = TempTree::new().unwrap();
        fs::write(a.path().join("left"), "").unwrap();

        let _ = assert_trees_equal(a.path(), b.path(), &[Rank::Name]);
    }

    #[test]
    fn test_missing_tree_is_an_error() {
        let a = TempTree::new().unwrap();
        let missing = a.path().join("missing");
        assert!(assert_trees_equal(a.path(), &missing, &[Rank::Name]).is_err());
    }

    #[test]
    fn test_file_content() {
        let a = TempTree::new().unwrap();
        fs::write(a.path().join("f"), "body").unwrap();
        assert_file_content(&a.path().join("f"), b"body").unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let a = TempTree::new().unwrap();
        let path = a.path().join("f");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        assert_file_permissions(&path, 0o640).unwrap();
    }
}
