//! Turn errors into immediate test failures

use std::fmt::Display;

/// Unwrap a result or fail the current test with a described error.
///
/// The panic message is `"<context>: <error>"`, followed by every cause in
/// the error's source chain that the message does not already include.
///
/// ```
/// use fstree_testing::OrAbort;
///
/// let nodes = fstree_core::parse_tree_str("2001-01-01T01:01:01Z\t0700\tdocs/")
///     .or_abort("parse fixture");
/// assert_eq!(nodes.len(), 1);
/// ```
pub trait OrAbort<T> {
    fn or_abort(self, context: impl Display) -> T;
}

impl<T, E> OrAbort<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    #[track_caller]
    fn or_abort(self, context: impl Display) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("{}: {}", context, describe(&err.into())),
        }
    }
}

fn describe(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.ends_with(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}
