//! Parsing of range API response bodies.
//!
//! Each line of a body is `SUFFIX:COUNT`, where `SUFFIX` is the 35 hex characters
//! following the requested prefix and `COUNT` is how many times that full hash was
//! seen in breaches. Lines may end in `\r\n` or `\n`. Lines that don't fit the
//! format are skipped rather than treated as errors.

/// One parsed line of a range response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// Lowercased suffix.
    pub suffix: String,
    pub count: u64,
}

/// Parses a single response line, returning `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<RangeEntry> {
    let (suffix, count) = split_line(line)?;
    Some(RangeEntry { suffix: suffix.to_ascii_lowercase(), count })
}

/// Iterates over the well-formed entries of a body.
pub fn entries(body: &str) -> impl Iterator<Item = RangeEntry> + '_ {
    body.lines().filter_map(parse_line)
}

/// Returns the count of the first line whose suffix matches `suffix`, ignoring case.
///
/// Single linear scan; range bodies hold at most a few thousand lines.
pub fn find_suffix(body: &str, suffix: &str) -> Option<u64> {
    let suffix = suffix.trim();
    body.lines()
        .filter_map(split_line)
        .find(|(line_suffix, _)| line_suffix.eq_ignore_ascii_case(suffix))
        .map(|(_, count)| count)
}

// Borrowing variant of parse_line used on the lookup path.
#[inline]
fn split_line(line: &str) -> Option<(&str, u64)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (suffix, count) = line.split_once(':')?;
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return None;
    }
    let count = count.trim().parse::<u64>().ok()?;
    Some((suffix, count))
}
