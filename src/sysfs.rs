//! Raw sysfs attribute access.
//!
//! Every attribute this crate consumes is a small kernel pseudo-file holding
//! either a single integer or a single line of text. Reads are best-effort:
//! a missing file, a directory, an unreadable file, and unparsable content
//! all collapse to the same "unavailable" result (0 or an empty string), so
//! callers never have to handle an error here.

use std::fs;
use std::path::Path;

/// Check that `path` exists and is a regular file.
pub fn is_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Read a sysfs attribute as an unsigned integer, distinguishing
/// "unavailable" (`None`) from a genuine zero reading (`Some(0)`).
///
/// Parses the leading unsigned decimal token after any leading whitespace,
/// the way the kernel formats numeric attributes. Trailing text such as a
/// unit suffix is ignored.
pub fn try_read_u32(path: &Path) -> Option<u32> {
    if !is_file(path) {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    parse_leading_u32(&content)
}

/// Read a sysfs attribute as an unsigned integer, returning 0 when the
/// attribute is missing, unreadable, or unparsable.
///
/// Note the ambiguity this contract carries: 0 is both the failure sentinel
/// and a legitimate reading. Use [`try_read_u32`] where the difference
/// matters.
pub fn read_u32(path: &Path) -> u32 {
    try_read_u32(path).unwrap_or(0)
}

/// Read the first line of a sysfs attribute, without the trailing line
/// terminator. Returns an empty string when the attribute is missing or
/// unreadable.
pub fn read_line(path: &Path) -> String {
    if !is_file(path) {
        return String::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => content.lines().next().unwrap_or("").to_string(),
        Err(_) => String::new(),
    }
}

fn parse_leading_u32(content: &str) -> Option<u32> {
    let trimmed = content.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
