//! Comment stripping for asset definition files.
//!
//! Asset definitions are JSON with `//` and `/* */` comments, which
//! `serde_json` rejects. This strips comments before parsing while leaving
//! string literals untouched, so a URL like `"http://x"` survives.

/// Remove `//` line comments and `/* */` block comments from JSON text.
///
/// Newlines are preserved where a line comment ended so parse errors still
/// point at a meaningful line.
pub fn strip_comments(input: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        InString,
        StringEscape,
        LineComment,
        BlockComment,
        BlockCommentStar,
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Normal;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '"' => {
                    state = State::InString;
                    out.push(c);
                }
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        state = State::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    _ => out.push(c),
                },
                _ => out.push(c),
            },
            State::InString => {
                out.push(c);
                match c {
                    '\\' => state = State::StringEscape,
                    '"' => state = State::Normal,
                    _ => {}
                }
            }
            State::StringEscape => {
                out.push(c);
                state = State::InString;
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' {
                    state = State::BlockCommentStar;
                }
            }
            State::BlockCommentStar => match c {
                '/' => state = State::Normal,
                '*' => {}
                _ => state = State::BlockComment,
            },
        }
    }

    out
}
