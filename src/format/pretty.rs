//! Lexical pretty-printer for compact object/array text.
//!
//! Works on characters only: it knows about quotes, escapes, braces,
//! brackets and commas, and nothing about the schema being printed.

/// Indent unit used by [`pretty_print`].
pub const DEFAULT_INDENT: &str = "\t";

const NEWLINE: char = '\n';

/// Re-indent `compact` with one tab per nesting level.
pub fn pretty_print(compact: &str) -> String {
    pretty_print_with(compact, DEFAULT_INDENT)
}

/// Re-indent `compact` using `indent` for each nesting level.
///
/// Every comma and opening brace/bracket outside a quoted string is followed
/// by a line break, every closing brace/bracket is preceded by one. Quoted
/// content is copied verbatim.
pub fn pretty_print_with(compact: &str, indent: &str) -> String {
    let mut out = String::with_capacity(compact.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for ch in compact.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                push_break(&mut out, indent, depth);
                out.push(ch);
            }
            '{' | '[' => {
                out.push(ch);
                depth += 1;
                push_break(&mut out, indent, depth);
            }
            ',' => {
                out.push(ch);
                push_break(&mut out, indent, depth);
            }
            _ => out.push(ch),
        }
    }

    out
}

fn push_break(out: &mut String, indent: &str, depth: usize) {
    out.push(NEWLINE);
    for _ in 0..depth {
        out.push_str(indent);
    }
}
