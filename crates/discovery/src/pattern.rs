//! Compilation of configured patterns and replacement templates.
//!
//! Configuration files shared with PHP tooling such as Strauss use delimited
//! patterns such as `/^Foo\\Bar/i` and `\1` style backreferences. Both forms
//! are accepted here alongside plain `regex` syntax.

use crate::error::{DiscoveryError, Result};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// Delimiters recognised around a pattern
const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|'];

/// Compile a configured pattern, stripping PHP-style delimiters and flags
pub fn compile(raw: &str) -> Result<Regex> {
    let (body, flags) = split_delimited(raw).unwrap_or((Cow::Borrowed(raw), ""));
    let body = if flags.contains('A') {
        Cow::Owned(format!(r"\A(?:{body})"))
    } else {
        body
    };

    let mut builder = RegexBuilder::new(&body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'U' => {
                builder.swap_greed(true);
            }
            // `u` is the default; `A` is handled above and `D` has no equivalent.
            _ => {}
        }
    }

    builder
        .build()
        .map_err(|e| DiscoveryError::configuration(raw, e))
}

/// Split `/body/flags` into body and flags, or `None` when `raw` is not delimited
fn split_delimited(raw: &str) -> Option<(Cow<'_, str>, &str)> {
    let delimiter = raw
        .chars()
        .next()
        .filter(|c| DELIMITERS.contains(c) || *c == '{')?;
    let closing = if delimiter == '{' { '}' } else { delimiter };
    let close = raw.rfind(closing).filter(|&idx| idx > 0)?;
    let flags = &raw[close + 1..];
    if !flags.chars().all(|c| "imsxuUAD".contains(c)) {
        return None;
    }

    let body = &raw[1..close];
    if delimiter == '{' {
        return Some((Cow::Borrowed(body), flags));
    }
    Some((unescape_delimiter(body, delimiter), flags))
}

/// Drop the backslash in front of an escaped delimiter when the delimiter is
/// not itself a regex metacharacter.
fn unescape_delimiter(body: &str, delimiter: char) -> Cow<'_, str> {
    if matches!(delimiter, '|' | '#') || !body.contains('\\') {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == delimiter => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// Translate a replacement template into `regex` expansion syntax.
///
/// `\N`, `$N` and `${N}` become group references, `\\` becomes one backslash,
/// and every other `$` or `\` is kept literally.
pub fn translate_template(template: &str) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let digits = take_digits(&chars, i + 1);
                if !digits.is_empty() {
                    out.push_str(&format!("${{{digits}}}"));
                    i += 1 + digits.len();
                } else if chars.get(i + 1) == Some(&'\\') {
                    out.push('\\');
                    i += 2;
                } else {
                    out.push('\\');
                    i += 1;
                }
            }
            '$' => {
                let digits = take_digits(&chars, i + 1);
                if !digits.is_empty() {
                    out.push_str(&format!("${{{digits}}}"));
                    i += 1 + digits.len();
                } else if chars.get(i + 1) == Some(&'{') {
                    let inner = take_digits(&chars, i + 2);
                    if !inner.is_empty() && chars.get(i + 2 + inner.len()) == Some(&'}') {
                        out.push_str(&format!("${{{inner}}}"));
                        i += 3 + inner.len();
                    } else {
                        out.push_str("$$");
                        i += 1;
                    }
                } else {
                    out.push_str("$$");
                    i += 1;
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn take_digits(chars: &[char], start: usize) -> String {
    // PHP only reads up to two digits for a backreference.
    chars
        .iter()
        .skip(start)
        .take(2)
        .take_while(|c| c.is_ascii_digit())
        .collect()
}

/// A compiled namespace replacement rule
#[derive(Debug, Clone)]
pub struct ReplacementPattern {
    regex: Regex,
    template: String,
}

impl ReplacementPattern {
    pub fn compile(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            regex: compile(pattern)?,
            template: translate_template(replacement),
        })
    }

    /// Substitute every match in `input`
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(input, self.template.as_str())
    }
}
