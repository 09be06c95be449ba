//! Tree differences under a rank chain
//!
//! Both trees are walked into descriptor lists ordered by their path below
//! the root and merged in a single pass. Entries that neither side ranks
//! before the other are treated as a match, so the result only reports what
//! the supplied chain can tell apart: include [`Rank::Content`] to catch
//! same-name, same-size files whose bytes differ. Keep [`Rank::Name`] first;
//! it is the only predicate that follows the order of the lists.

use crate::config::CompareOptions;
use crate::entry::EntryInfo;
use crate::rank::{self, Rank};
use crate::walk::collect_entries;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entries present on one side of a merge but unmatched on the other
pub type Unmatched<'a, T> = (Vec<&'a T>, Vec<&'a T>);

/// Merge two consistently ordered lists and return the unmatched entries of
/// each side, in encounter order.
///
/// At each step the right cursor is checked first: if the left list is used up
/// or `less(right, left)` holds, the right entry is unique. Otherwise, if the
/// right list is used up or `less(left, right)` holds, the left entry is
/// unique. Otherwise both entries are consumed as a match.
///
/// Both inputs must already be ordered consistently with the primary key of
/// `less`; this is not re-checked. The first error from `less` aborts the
/// merge.
pub fn collect_different<'a, T, E, F>(
    left: &'a [T],
    right: &'a [T],
    mut less: F,
) -> std::result::Result<Unmatched<'a, T>, E>
where
    F: FnMut(&T, &T) -> std::result::Result<bool, E>,
{
    let mut only_left = Vec::new();
    let mut only_right = Vec::new();

    let (mut l, mut r) = (0, 0);
    while l < left.len() || r < right.len() {
        if r < right.len() && (l == left.len() || less(&right[r], &left[l])?) {
            only_right.push(&right[r]);
            r += 1;
            continue;
        }

        if l < left.len() && (r == right.len() || less(&left[l], &right[r])?) {
            only_left.push(&left[l]);
            l += 1;
            continue;
        }

        l += 1;
        r += 1;
    }

    Ok((only_left, only_right))
}

/// Result of comparing two trees
#[derive(Debug, Clone)]
pub struct TreeDiff {
    pub left_root: PathBuf,
    pub right_root: PathBuf,
    pub only_left: Vec<EntryInfo>,
    pub only_right: Vec<EntryInfo>,
}

impl TreeDiff {
    /// Whether the chain found nothing unmatched on either side
    pub fn is_empty(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty()
    }

    /// Human-readable notes, one per side that has unmatched entries
    pub fn diagnostics(&self) -> Vec<String> {
        let mut diags = Vec::new();
        if let Some(block) = describe(&self.left_root, &self.only_left) {
            diags.push(block);
        }
        if let Some(block) = describe(&self.right_root, &self.only_right) {
            diags.push(block);
        }
        diags
    }
}

fn describe(root: &Path, entries: &[EntryInfo]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut block = format!("Unique items from {:?}: \n", root);
    for entry in entries {
        block.push_str(&entry.to_string());
        block.push('\n');
    }
    Some(block)
}

/// Compare two trees with the default [`CompareOptions`]
pub fn diff_trees(a: impl AsRef<Path>, b: impl AsRef<Path>, ranks: &[Rank]) -> Result<TreeDiff> {
    diff_trees_with(a, b, ranks, &CompareOptions::default())
}

/// Compare two trees, walking both and merging under `ranks`
pub fn diff_trees_with(
    a: impl AsRef<Path>,
    b: impl AsRef<Path>,
    ranks: &[Rank],
    options: &CompareOptions,
) -> Result<TreeDiff> {
    let (a, b) = (a.as_ref(), b.as_ref());

    let list_a = collect_entries(a)?;
    let list_b = collect_entries(b)?;

    let (only_a, only_b) =
        collect_different(&list_a, &list_b, |x, y| rank::less(x, y, ranks, options))?;

    debug!(
        left = ?a,
        right = ?b,
        ?ranks,
        only_left = only_a.len(),
        only_right = only_b.len(),
        "Compared trees"
    );

    Ok(TreeDiff {
        left_root: a.to_path_buf(),
        right_root: b.to_path_buf(),
        only_left: only_a.into_iter().cloned().collect(),
        only_right: only_b.into_iter().cloned().collect(),
    })
}

/// Compare two trees and describe the differences; empty when they match
pub fn tree_diff(a: impl AsRef<Path>, b: impl AsRef<Path>, ranks: &[Rank]) -> Result<Vec<String>> {
    Ok(diff_trees(a, b, ranks)?.diagnostics())
}
