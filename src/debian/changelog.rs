// src/debian/changelog.rs

//! First-line parser for `debian/changelog`
//!
//! Only the newest entry's header matters here:
//!
//! ```text
//! foo (1.0-1) unstable; urgency=low
//! ```
//!
//! The token before the first space is the source package name and the text
//! inside the first pair of parentheses is the version.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Name and version taken from a changelog header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogHeader {
    pub name: String,
    /// `None` when the line has no `( ... )` pair
    pub version: Option<String>,
}

/// Parse a changelog header line
///
/// `path` is only used to label errors.
pub fn parse_header(line: &str, path: &Path) -> Result<ChangelogHeader> {
    let line = line.trim_end_matches(['\r', '\n']);

    let name = match line.split_once(' ') {
        Some((name, _)) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(Error::metadata(
                path,
                Some(1),
                "Source",
                "first line does not start with '<name> '",
            ))
        }
    };

    Ok(ChangelogHeader {
        name,
        version: version_in_parens(line),
    })
}

fn version_in_parens(line: &str) -> Option<String> {
    let start = line.find('(')?;
    let rest = &line[start + 1..];
    let end = rest.find(')')?;
    Some(rest[..end].to_string())
}

/// Read the first line of a changelog file and parse it
pub fn read_header(path: &Path) -> Result<ChangelogHeader> {
    let file = File::open(path)
        .map_err(|e| Error::metadata(path, None, "changelog", format!("cannot open: {}", e)))?;

    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| Error::metadata(path, Some(1), "changelog", format!("cannot read: {}", e)))?;

    parse_header(&first, path)
}

/// Lightweight name-only pre-parse used to name the staging directory
pub fn provisional_name(path: &Path) -> Result<String> {
    read_header(path).map(|header| header.name)
}
