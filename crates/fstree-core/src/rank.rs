//! Rank predicates over entry descriptors
//!
//! A rank predicate answers a single question: does `left` rank strictly
//! before `right` under one attribute. Predicates are combined into a chain
//! with [`less`], which returns `true` as soon as *any* predicate in the chain
//! says so. This is not a lexicographic multi-key comparison: a later
//! predicate is consulted whenever every earlier one returned `false`, whether
//! or not the earlier attribute was actually equal.
//!
//! A chain only sees what its predicates test. Under `[Rank::Dir]` alone two
//! files with different names never rank either way, so the merge in
//! [`collect_different`](crate::diff::collect_different) pairs them up as a
//! match, while a directory and a file of the same name are reported on both
//! sides. Add [`Rank::Name`] when names must line up.
//!
//! [`Rank::Name`] compares `rel_path`, the path below the walk root, so it
//! agrees with the order [`collect_entries`](crate::walk::collect_entries)
//! produces and the merge stays in step across nested directories.

use crate::config::CompareOptions;
use crate::entry::EntryInfo;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Named rank predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// Paths below the walk root, component by component in byte order
    Name,
    /// Directories before files
    Dir,
    /// Smaller regular files first; never orders a directory
    Size,
    /// Masked permission bits, numerically
    Perm,
    /// Older modification time first, beyond the configured tolerance
    Time,
    /// File bytes, streamed from disk
    Content,
}

impl Rank {
    /// Every predicate, in the order they are usually chained
    pub const ALL: [Rank; 6] = [
        Rank::Name,
        Rank::Dir,
        Rank::Size,
        Rank::Perm,
        Rank::Time,
        Rank::Content,
    ];

    /// Whether `left` ranks strictly before `right` under this predicate alone
    pub fn less(
        &self,
        left: &EntryInfo,
        right: &EntryInfo,
        options: &CompareOptions,
    ) -> Result<bool> {
        let ranked = match self {
            Rank::Name => left.rel_path < right.rel_path,
            Rank::Dir => left.is_dir && !right.is_dir,
            Rank::Size => left.is_file() && right.is_file() && left.size < right.size,
            Rank::Perm => (left.mode & options.mode_mask) < (right.mode & options.mode_mask),
            Rank::Time => match left.modified.checked_add(options.time_tolerance()) {
                Some(shifted) => shifted < right.modified,
                None => false,
            },
            Rank::Content => {
                if left.is_dir || right.is_dir {
                    false
                } else {
                    content_less(&left.path, &right.path)?
                }
            }
        };
        Ok(ranked)
    }
}

/// Apply a rank chain: `true` as soon as any predicate ranks `left` first
pub fn less(
    left: &EntryInfo,
    right: &EntryInfo,
    ranks: &[Rank],
    options: &CompareOptions,
) -> Result<bool> {
    for rank in ranks {
        if rank.less(left, right, options)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Compare two files byte by byte without looking at their sizes first.
///
/// Returns `true` at the first differing byte if the left byte is smaller,
/// and `true` when the right file ends while the left one still has data.
/// A left file that ends first, including on equal content, gives `false`.
/// So `"aaa"` ranks before `"ab"`, and `"ab"` ranks before `"a"`; chain
/// [`Rank::Size`] earlier to consider sizes first.
///
/// Open and read failures are errors, never a verdict.
pub fn content_less(left: &Path, right: &Path) -> Result<bool> {
    let mut left_bytes = open_bytes(left)?;
    let mut right_bytes = open_bytes(right)?;

    loop {
        let l = next_byte(&mut left_bytes, left)?;
        let r = next_byte(&mut right_bytes, right)?;

        match (l, r) {
            (None, _) => return Ok(false),
            (Some(_), None) => return Ok(true),
            (Some(l), Some(r)) if l == r => continue,
            (Some(l), Some(r)) => return Ok(l < r),
        }
    }
}

fn open_bytes(path: &Path) -> Result<std::io::Bytes<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
    Ok(BufReader::new(file).bytes())
}

fn next_byte(bytes: &mut std::io::Bytes<BufReader<File>>, path: &Path) -> Result<Option<u8>> {
    loop {
        match bytes.next() {
            None => return Ok(None),
            Some(Ok(b)) => return Ok(Some(b)),
            Some(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
            Some(Err(e)) => return Err(Error::io("read", path, e)),
        }
    }
}
