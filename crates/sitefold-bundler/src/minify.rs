//! Output compaction.
//!
//! The pipeline treats compaction as an opaque `compact(text) -> text`
//! collaborator invoked once on the fully assembled artifact. Two passes:
//! comment elision, then whitespace squeezing. Both passes track string and
//! template literals so quoted content survives byte-identical, and both
//! are conservative: a construct that cannot be proven safe to drop passes
//! through unchanged. Deterministic; same input, same output.

/// Scanner state while eliding comments.
enum State {
    Code,
    Quoted { delim: char, escaped: bool },
    SlashSeen,
    Line,
    Block,
    BlockStar,
}

/// Remove `/* ... */` and `// ...` comments outside string literals.
fn elide_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut state = State::Code;

    for ch in src.chars() {
        state = match state {
            State::Code => dispatch_code(&mut out, ch),
            State::SlashSeen => match ch {
                '/' => State::Line,
                '*' => State::Block,
                _ => {
                    // Plain slash (division, regex open); keep both chars.
                    out.push('/');
                    dispatch_code(&mut out, ch)
                }
            },
            State::Quoted { delim, escaped } => {
                out.push(ch);
                if escaped {
                    State::Quoted {
                        delim,
                        escaped: false,
                    }
                } else if ch == '\\' {
                    State::Quoted {
                        delim,
                        escaped: true,
                    }
                } else if ch == delim {
                    State::Code
                } else {
                    State::Quoted {
                        delim,
                        escaped: false,
                    }
                }
            }
            State::Line => {
                if ch == '\n' || ch == '\r' {
                    out.push(ch);
                    State::Code
                } else {
                    State::Line
                }
            }
            State::Block => {
                if ch == '*' {
                    State::BlockStar
                } else {
                    State::Block
                }
            }
            State::BlockStar => match ch {
                '/' => State::Code,
                '*' => State::BlockStar,
                _ => State::Block,
            },
        };
    }

    if matches!(state, State::SlashSeen) {
        out.push('/');
    }
    out
}

/// Handle one character in code position, returning the next state.
fn dispatch_code(out: &mut String, ch: char) -> State {
    match ch {
        '\'' | '"' | '`' => {
            out.push(ch);
            State::Quoted {
                delim: ch,
                escaped: false,
            }
        }
        '/' => State::SlashSeen,
        _ => {
            out.push(ch);
            State::Code
        }
    }
}

/// Collapse whitespace runs outside string literals.
///
/// A run becomes a single space only where dropping it would merge two
/// word characters, or would fuse `+ +`/`- -` into an increment or
/// decrement; everywhere else it disappears.
fn squeeze_whitespace(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut quoted: Option<char> = None;
    let mut escaped = false;
    let mut gap = false;

    for ch in src.chars() {
        if let Some(delim) = quoted {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == delim {
                quoted = None;
            }
            continue;
        }

        if ch.is_whitespace() {
            gap = true;
            continue;
        }

        if gap {
            bridge_gap(&mut out, ch);
            gap = false;
        }

        if ch == '\'' || ch == '"' || ch == '`' {
            quoted = Some(ch);
        }
        out.push(ch);
    }

    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Decide whether a removed whitespace run needs a replacement space.
fn bridge_gap(out: &mut String, next: char) {
    let Some(prev) = out.chars().last() else {
        return;
    };

    // `a + ++b` must not become `a+++b`; same for `- --`.
    if (prev == '+' && next == '+') || (prev == '-' && next == '-') {
        out.push(' ');
        return;
    }

    const TIGHT: &[char] = &[
        '(', ')', '[', ']', '{', '}', ',', ';', ':', '=', '+', '-', '*', '/', '%', '&', '|', '^',
        '!', '~', '<', '>', '?', '.',
    ];

    if TIGHT.contains(&prev) || TIGHT.contains(&next) {
        return;
    }

    if is_word_char(prev) && is_word_char(next) {
        out.push(' ');
    }
}

/// Compact assembled output text.
#[must_use]
pub fn compact(text: &str) -> String {
    squeeze_whitespace(&elide_comments(text))
}
