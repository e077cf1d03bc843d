// src/scriptlet.rs
//
// Scriptlet / declaration payload layout.
//
// A statement and brace heuristic, not a Java parser:
//   • string and char literals are protected behind local placeholders;
//   • breaks go after ';' and '{', before and after '}' (except `} else`,
//     `} catch`, `} finally`);
//   • `for (a; b; c)` headers are rejoined onto one line;
//   • lines are re-indented by brace depth, starting one level in.
// Comments, lambdas and braces hidden in unusual places are not understood
// and may come out misindented.
// Layout ignores the surrounding markup: a nested `<%` keeps its structural
// indent, while the payload starts one unit in from column 0 and `%>` sits at
// column 0.

use std::borrow::Cow;

use crate::options::FormatOptions;
use crate::placeholder::ContentTable;

/// Payloads shorter than this (in chars) may stay on one line.
pub const SHORT_PAYLOAD_LIMIT: usize = 60;

const CONTINUATION_KEYWORDS: &[&str] = &["else", "catch", "finally"];

const CLOSER: &str = "%>";

/// Lay out a whole `<% … %>` or `<%! … %>` region. `opener` is the region's
/// opening delimiter.
pub fn reformat_block<'a>(raw: &'a str, opener: &str, options: &FormatOptions) -> Cow<'a, str> {
    if !raw.starts_with(opener) || !raw.ends_with(CLOSER) || raw.len() < opener.len() + CLOSER.len()
    {
        return Cow::Borrowed(raw);
    }
    let inner = &raw[opener.len()..raw.len() - CLOSER.len()];
    if is_short_payload(inner) {
        log::trace!(target: "jspfmt::scriptlet", "short payload kept inline: {inner:?}");
        return Cow::Borrowed(raw);
    }

    let body = reformat_code(inner, options);
    let mut out = String::with_capacity(body.len() + opener.len() + CLOSER.len() + 2);
    out.push_str(opener);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out.push_str(CLOSER);
    Cow::Owned(out)
}

/// Single-line payloads with no block and at most one statement are left
/// alone.
pub fn is_short_payload(inner: &str) -> bool {
    !inner.contains(['\n', '\r'])
        && inner.trim().chars().count() < SHORT_PAYLOAD_LIMIT
        && !inner.contains('{')
        && inner.matches(';').count() <= 1
}

/// Reformat a payload into brace-indented lines (no surrounding delimiters,
/// no trailing newline).
pub fn reformat_code(code: &str, options: &FormatOptions) -> String {
    let mut literals = ContentTable::for_text(code, "str");
    let protected = protect_literals(code, &mut literals);
    let normalized = protected.replace("\r\n", "\n").replace('\r', "\n");
    let broken = insert_breaks(&normalized);
    let joined = join_for_headers(&broken);
    let indented = indent_by_braces(&joined, options);
    log::trace!(
        target: "jspfmt::scriptlet",
        "reformatted payload: {} literal(s) protected",
        literals.len()
    );
    literals.restore(&indented)
}

/* =========================== String literals ============================ */

/// Swap `"…"` and `'…'` literals for placeholders. A literal that reaches a
/// newline before its closing quote is not a literal.
fn protect_literals(code: &str, table: &mut ContentTable) -> String {
    let bytes = code.as_bytes();
    let mut out = String::with_capacity(code.len());
    let mut copied = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'"' && b != b'\'' {
            i += 1;
            continue;
        }
        match literal_end(bytes, i) {
            Some(end) => {
                out.push_str(&code[copied..i]);
                out.push_str(&table.insert(code[i..=end].to_string()));
                i = end + 1;
                copied = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&code[copied..]);
    out
}

fn literal_end(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' | b'\r' => return None,
            b if b == quote => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/* ============================ Line breaking ============================= */

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn skip_blanks(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_blank(chars[i]) {
        i += 1;
    }
    i
}

fn word_at(chars: &[char], i: usize, word: &str) -> bool {
    let len = word.chars().count();
    if i + len > chars.len() || !chars[i..i + len].iter().copied().eq(word.chars()) {
        return false;
    }
    let before_ok = i == 0 || !is_ident(chars[i - 1]);
    let after_ok = chars.get(i + len).map_or(true, |&c| !is_ident(c));
    before_ok && after_ok
}

/// Start a new line at `from` unless one already starts there. Returns the
/// index to resume copying at.
fn break_after(chars: &[char], from: usize, out: &mut String) -> usize {
    let next = skip_blanks(chars, from);
    if next < chars.len() && chars[next] != '\n' {
        out.push('\n');
        next
    } else {
        from
    }
}

fn insert_breaks(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len() + code.len() / 8);
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ';' | '{' => {
                out.push(c);
                i = break_after(&chars, i + 1, &mut out);
            }
            '}' => {
                let kept = out.trim_end_matches([' ', '\t']).len();
                out.truncate(kept);
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push('}');
                let next = skip_blanks(&chars, i + 1);
                if CONTINUATION_KEYWORDS.iter().any(|kw| word_at(&chars, next, kw)) {
                    out.push(' ');
                    i = next;
                } else {
                    i = break_after(&chars, i + 1, &mut out);
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

/// Undo terminator breaks inside `for ( … )` so the three clauses share a
/// line.
fn join_for_headers(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len());
    let mut i = 0usize;
    while i < chars.len() {
        if word_at(&chars, i, "for") {
            let open = skip_blanks(&chars, i + 3);
            if chars.get(open) == Some(&'(') {
                out.extend(&chars[i..open]);
                i = copy_for_header(&chars, open, &mut out);
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn copy_for_header(chars: &[char], open: usize, out: &mut String) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    out.push(c);
                    return i + 1;
                }
            }
            '\n' => {
                let kept = out.trim_end_matches([' ', '\t']).len();
                if out[..kept].ends_with(';') {
                    out.truncate(kept);
                    out.push(' ');
                    i = skip_blanks(chars, i + 1);
                    continue;
                }
            }
            _ => {}
        }
        out.push(c);
        i += 1;
    }
    i
}

/* ============================= Indentation ============================== */

/// Trim every line and indent it by brace depth (starting at one level).
/// Leading and trailing blank lines go; interior runs shrink to one.
fn indent_by_braces(code: &str, options: &FormatOptions) -> String {
    let mut depth = 1usize;
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for raw_line in code.split('\n') {
        let line = raw_line.trim();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        if line.starts_with('}') {
            depth = depth.saturating_sub(1);
        }
        lines.push(format!("{}{}", options.indent(depth), line));
        if line.ends_with('{') {
            depth += 1;
        }
    }

    lines.join("\n")
}
