//! JSON with comments.
//!
//! Settings files allow `//` line comments, `/* */` block comments and
//! trailing commas. They are removed with a small state machine that
//! tracks string literals, so `"http://host"` or `"/* not a comment */"`
//! inside a string are left alone.

use crate::error::{SettingsError, SettingsResult};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    String,
    StringEscape,
    LineComment,
    BlockComment { start_line: usize, newlines: bool },
}

/// Removes `//` and `/* */` comments outside string literals.
///
/// Newlines inside comments are kept so line numbers in later parse errors
/// still match the source. A block comment on a single line becomes one
/// space, so it cannot glue two tokens together.
///
/// # Errors
///
/// Returns [`SettingsError::UnterminatedComment`] if a block comment is
/// never closed.
pub fn strip_comments(input: &str) -> SettingsResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut state = State::Text;
    let mut line = 1;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        state = match state {
            State::Text => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    State::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    State::BlockComment {
                        start_line: line,
                        newlines: false,
                    }
                }
                ('"', _) => {
                    out.push(c);
                    State::String
                }
                _ => {
                    out.push(c);
                    State::Text
                }
            },
            State::String => {
                out.push(c);
                match c {
                    '\\' => State::StringEscape,
                    '"' => State::Text,
                    _ => State::String,
                }
            }
            State::StringEscape => {
                out.push(c);
                State::String
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    State::Text
                } else {
                    State::LineComment
                }
            }
            State::BlockComment {
                start_line,
                newlines,
            } => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    if !newlines {
                        out.push(' ');
                    }
                    State::Text
                } else if c == '\n' {
                    out.push(c);
                    State::BlockComment {
                        start_line,
                        newlines: true,
                    }
                } else {
                    State::BlockComment {
                        start_line,
                        newlines,
                    }
                }
            }
        };
    }

    if let State::BlockComment { start_line, .. } = state {
        return Err(SettingsError::UnterminatedComment { line: start_line });
    }

    Ok(out)
}

/// Removes commas that are followed only by whitespace and then `]` or `}`.
///
/// Expects comment-free input.
#[must_use]
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = input[i + 1..].trim_start().chars().next();
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Parses JSON that may contain comments and trailing commas.
///
/// # Errors
///
/// Returns an error for an unterminated block comment or invalid JSON.
pub fn parse_jsonc(input: &str) -> SettingsResult<Value> {
    let stripped = strip_trailing_commas(&strip_comments(input)?);
    Ok(serde_json::from_str(&stripped)?)
}
