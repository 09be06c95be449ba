//! Common test fixtures for fstree testing

use crate::abort::OrAbort;
use fstree_core::{parse_rfc3339, parse_tree_str, Node};
use std::time::SystemTime;

/// A small project layout with a read-only subtree, a tab in a path and
/// multi-line content
pub const SAMPLE_TREE: &str = "
    2001-01-01T01:01:01Z\t0755\tproject/
    2001-01-01T01:01:01Z\t0644\tproject/README.md\t\"# Sample\\n\\nA fixture tree.\\n\"
    2001-01-01T01:01:01Z\t0755\tproject/src/
    2001-01-01T01:01:01Z\t0644\tproject/src/main.rs\t\"fn main() {}\\n\"
    2002-02-02T02:02:02Z\t0550\tproject/vendor/
    2002-02-02T02:02:02Z\t0440\tproject/vendor/LICENSE\tAll rights reserved
    2003-03-03T03:03:03Z\t0700\t\"project/with\\ttab/\"
    2003-03-03T03:03:03Z\t0600\t\"project/with\\ttab/empty\"
";

/// Parse an RFC 3339 timestamp, failing the test if it is malformed
#[track_caller]
pub fn rfc3339(ts: &str) -> SystemTime {
    parse_rfc3339(ts).or_abort(format!("parse timestamp {:?}", ts))
}

/// Parse a tree description, failing the test if it is malformed
#[track_caller]
pub fn nodes(text: &str) -> Vec<Node> {
    parse_tree_str(text).or_abort("parse tree description")
}

/// Nodes of [`SAMPLE_TREE`]
pub fn sample_tree() -> Vec<Node> {
    nodes(SAMPLE_TREE)
}
