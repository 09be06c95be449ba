//! Parser for the line-oriented tree description format
//!
//! Each non-blank line describes one node with three or four fields
//! separated by one or more tabs:
//!
//! ```text
//! <RFC 3339 time>	<octal permissions>	<path>	[<content>]
//! ```
//!
//! Permissions need a leading `0` and at most four more octal digits. A path
//! ending in `/` is a directory, and directories ignore any content field.
//! A path or content field starting with `"` is unescaped like a Go
//! double-quoted string literal (`\t`, `\n`, `\u263a`, ...); one starting with
//! `` ` `` is taken raw up to the closing back-tick. Either way the quote must
//! close at the end of the field. Unquoted fields are literal.
//!
//! ```
//! let nodes = fstree_core::parse::parse_tree_str(
//!     "2001-01-01T01:01:01Z\t0750\tdocs/\n\
//!      2001-01-01T01:01:01Z\t0640\tdocs/a.txt\t\"two\\nlines\"\n",
//! )
//! .unwrap();
//! assert_eq!(nodes.len(), 2);
//! assert_eq!(nodes[1].body, "two\nlines");
//! ```

use crate::node::Node;
use crate::{Error, Result};
use chrono::DateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Parse every line of a reader into nodes; the first bad line fails the lot
pub fn parse_tree<R: BufRead>(reader: R) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| Error::parse(line_no, format!("failed to read: {}", e)))?;
        if let Some(node) = parse_line(&line).map_err(|message| Error::parse(line_no, message))? {
            nodes.push(node);
        }
    }

    debug!(count = nodes.len(), "Parsed tree description");
    Ok(nodes)
}

/// Parse a tree description held in memory
pub fn parse_tree_str(text: &str) -> Result<Vec<Node>> {
    parse_tree(text.as_bytes())
}

/// Parse a tree description file
pub fn parse_tree_file(path: impl AsRef<Path>) -> Result<Vec<Node>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
    parse_tree(BufReader::new(file)).map_err(|e| Error::in_file(path, e))
}

/// Parse an RFC 3339 timestamp such as `2001-01-01T01:01:01Z`
pub fn parse_rfc3339(ts: &str) -> Result<SystemTime> {
    DateTime::parse_from_rfc3339(ts)
        .map(SystemTime::from)
        .map_err(|e| Error::Time(format!("{:?}: {}", ts, e)))
}

fn parse_line(line: &str) -> std::result::Result<Option<Node>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').filter(|f| !f.is_empty()).collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(format!(
            "expected 3 or 4 tab-separated fields, found {}",
            fields.len()
        ));
    }

    let time = parse_rfc3339(fields[0]).map_err(|e| e.to_string())?;
    let perm = parse_perm(fields[1])?;
    let name = field_value(fields[2]).map_err(|e| format!("path {}", e))?;
    if name.is_empty() {
        return Err("empty path".to_string());
    }
    let body = match fields.get(3) {
        Some(raw) => field_value(raw).map_err(|e| format!("content {}", e))?,
        None => String::new(),
    };

    let node = Node::new(perm, time, name, body);
    node.relative_path().map_err(|e| e.to_string())?;
    Ok(Some(node))
}

fn parse_perm(field: &str) -> std::result::Result<u32, String> {
    let valid = field.starts_with('0')
        && field.len() <= 5
        && field.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if !valid {
        return Err(format!("invalid octal permissions {:?}", field));
    }
    u32::from_str_radix(field, 8)
        .map_err(|e| format!("invalid octal permissions {:?}: {}", field, e))
}

fn field_value(field: &str) -> std::result::Result<String, String> {
    if field.starts_with('"') || field.starts_with('`') {
        unquote(field).map_err(|e| match e {
            Error::Parse { message, .. } => message,
            other => other.to_string(),
        })
    } else {
        Ok(field.to_string())
    }
}

/// Interpret a double-quoted or back-tick quoted string.
///
/// Double-quoted strings accept the escapes `\a \b \f \n \r \t \v \\ \" \'`,
/// `\xHH` and three-digit octal `\ooo` bytes, and `\uHHHH` / `\UHHHHHHHH`
/// code points. The unescaped bytes must form valid UTF-8. Back-tick strings
/// are raw and may not contain a back-tick.
pub fn unquote(s: &str) -> Result<String> {
    let bad = |message: String| Error::parse(0, message);

    let quote = s
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '`')
        .ok_or_else(|| bad(format!("{:?} is not quoted", s)))?;

    if s.len() < 2 || !s.ends_with(quote) {
        return Err(bad(format!("unbalanced quote in {:?}", s)));
    }
    let inner = &s[1..s.len() - 1];

    if quote == '`' {
        if inner.contains('`') {
            return Err(bad(format!("unbalanced quote in {:?}", s)));
        }
        return Ok(inner.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(bad(format!("unescaped quote in {:?}", s))),
            '\n' => return Err(bad(format!("raw newline in {:?}", s))),
            '\\' => unescape(&mut chars, &mut out).map_err(|m| bad(format!("{} in {:?}", m, s)))?,
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(out).map_err(|_| bad(format!("escapes in {:?} are not valid UTF-8", s)))
}

fn unescape(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> std::result::Result<(), String> {
    let c = chars.next().ok_or("dangling backslash")?;
    let simple = match c {
        'a' => Some(0x07),
        'b' => Some(0x08),
        'f' => Some(0x0c),
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'v' => Some(0x0b),
        '\\' => Some(b'\\'),
        '"' => Some(b'"'),
        '\'' => Some(b'\''),
        _ => None,
    };
    if let Some(byte) = simple {
        out.push(byte);
        return Ok(());
    }

    match c {
        'x' => {
            let value = take_digits(chars, 2, 16)?;
            out.push(value as u8);
        }
        '0'..='7' => {
            let rest = take_digits(chars, 2, 8)?;
            let value = (c as u32 - '0' as u32) * 64 + rest;
            if value > 0xff {
                return Err(format!("octal escape \\{:o} out of range", value));
            }
            out.push(value as u8);
        }
        'u' | 'U' => {
            let width = if c == 'u' { 4 } else { 8 };
            let value = take_digits(chars, width, 16)?;
            let ch = char::from_u32(value)
                .ok_or_else(|| format!("invalid code point U+{:X}", value))?;
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
        other => return Err(format!("unknown escape \\{}", other)),
    }
    Ok(())
}

fn take_digits(
    chars: &mut std::str::Chars<'_>,
    count: usize,
    radix: u32,
) -> std::result::Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| format!("escape needs {} base-{} digits", count, radix))?;
        value = value * radix + digit;
    }
    Ok(value)
}
