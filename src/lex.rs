//! Line scanning: splits the input buffer into logical `#`-prefixed lines.
//!
//! This is deliberately the thinnest layer in the crate. It does not know
//! about commands, channels, or base-36, only about line termination and
//! the `#` sigil that distinguishes a declaration from everything else.

/// One `#`-prefixed declaration line, with its 1-based source line number
/// and the text following the `#`, whitespace-trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// 1-based line number in the original source.
    pub line_number: usize,
    /// The text after `#`, with leading/trailing whitespace removed.
    pub content: &'a str,
}

/// Iterates `source` as logical lines (handling CR, LF, and CRLF
/// terminators), yielding only the ones that declare something (first
/// non-blank character is `#`). Everything else (blank lines, comments,
/// free text) is skipped silently, matching §4.2.
pub fn scan(source: &str) -> impl Iterator<Item = RawLine<'_>> {
    split_lines(source)
        .enumerate()
        .filter_map(|(i, raw)| {
            let trimmed = raw.trim_matches(is_line_whitespace);
            let content = trimmed.strip_prefix('#')?;
            Some(RawLine {
                line_number: i + 1,
                content,
            })
        })
}

fn is_line_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}')
}

/// Splits `source` into logical lines on any of `\n`, `\r`, or `\r\n`,
/// without merging adjacent terminators of different kinds (so `"a\r\rb"`
/// is three lines, not two) and without producing a trailing empty line for
/// input that already ends with a terminator.
fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(i) => {
                let line = &rest[..i];
                let after = &rest[i..];
                let skip = if after.starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
                Some(line)
            }
            None => {
                done = true;
                if rest.is_empty() {
                    None
                } else {
                    Some(rest)
                }
            }
        }
    })
}
