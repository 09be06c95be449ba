//! fstree - declarative filesystem trees for test suites
//!
//! This library describes directory trees as lists of [`Node`]s, materializes
//! and copies them with exact permissions and timestamps, and compares two
//! trees under a chain of [`Rank`] predicates.

pub mod config;
pub mod copy;
pub mod create;
pub mod diff;
pub mod entry;
pub mod error;
pub mod node;
pub mod parse;
pub mod prune;
pub mod rank;
pub mod walk;

pub use error::{Error, Result};

// Re-export commonly used types
pub use config::{CompareOptions, Config};
pub use copy::tree_copy;
pub use create::tree_create;
pub use diff::{collect_different, diff_trees, diff_trees_with, tree_diff, TreeDiff};
pub use entry::{entries_from_paths, EntryInfo};
pub use node::Node;
pub use parse::{parse_rfc3339, parse_tree, parse_tree_file, parse_tree_str, unquote};
pub use prune::prune_named;
pub use rank::{less, Rank};
pub use walk::collect_entries;
