// src/regions.rs
//
// Region extraction: swap every protected span for a placeholder token before
// the structural pass sees the text.
//
// RULES is applied top to bottom. Order matters: a later rule never matches
// inside a span an earlier rule already swapped out.
//   1. comments          <%-- --%>   <!-- -->
//   2. declarations      <%! %>
//   3. expressions       <%= %>
//   4. scriptlets        <% %>       (not <%-- <%! <%= <%@)
//   5. directives        <%@ %>
//   6. EL fragments      ${ }        #{ }
//   7. raw bodies        <script>…</script>   <style>…</style>
// Unterminated openers are not regions; they stay in the text as-is.

use std::borrow::Cow;

use memchr::memmem;

use crate::directive;
use crate::options::FormatOptions;
use crate::placeholder::ContentTable;
use crate::scriptlet;
use crate::tags::{find_tag_end, is_ws};

/// Delimiter style of an expression-language fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElStyle {
    /// `${…}`, evaluated immediately.
    Dollar,
    /// `#{…}`, deferred evaluation.
    Hash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    Comment,
    Declaration,
    Expression,
    Scriptlet,
    Directive,
    ExpressionLanguage(ElStyle),
    ScriptBody,
    StyleBody,
}

impl RegionKind {
    /// What the region turns into once it is restored.
    pub fn transform<'a>(self, raw: &'a str, options: &FormatOptions) -> Cow<'a, str> {
        match self {
            RegionKind::Comment
            | RegionKind::ExpressionLanguage(_)
            | RegionKind::ScriptBody
            | RegionKind::StyleBody => Cow::Borrowed(raw),
            RegionKind::Expression => collapse_expression(raw),
            RegionKind::Scriptlet => scriptlet::reformat_block(raw, "<%", options),
            RegionKind::Declaration => scriptlet::reformat_block(raw, "<%!", options),
            RegionKind::Directive => directive::reformat(raw, options),
        }
    }
}

/// How a rule finds its regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// `open … close`, skipping openers followed by one of `reject_after`.
    Delimited {
        open: &'static str,
        close: &'static str,
        reject_after: &'static [u8],
    },
    /// `<sigil>{ … }` with nested braces and quotes; `\<sigil>{` is literal.
    Interpolation { sigil: u8 },
    /// The body between `<tag …>` and `</tag`, tag matched case-insensitively.
    RawText { tag: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub kind: RegionKind,
    pub pattern: Pattern,
}

pub const RULES: &[Rule] = &[
    Rule {
        kind: RegionKind::Comment,
        pattern: Pattern::Delimited { open: "<%--", close: "--%>", reject_after: &[] },
    },
    Rule {
        kind: RegionKind::Comment,
        pattern: Pattern::Delimited { open: "<!--", close: "-->", reject_after: &[] },
    },
    Rule {
        kind: RegionKind::Declaration,
        pattern: Pattern::Delimited { open: "<%!", close: "%>", reject_after: &[] },
    },
    Rule {
        kind: RegionKind::Expression,
        pattern: Pattern::Delimited { open: "<%=", close: "%>", reject_after: &[] },
    },
    Rule {
        kind: RegionKind::Scriptlet,
        pattern: Pattern::Delimited { open: "<%", close: "%>", reject_after: b"-!=@" },
    },
    Rule {
        kind: RegionKind::Directive,
        pattern: Pattern::Delimited { open: "<%@", close: "%>", reject_after: &[] },
    },
    Rule {
        kind: RegionKind::ExpressionLanguage(ElStyle::Dollar),
        pattern: Pattern::Interpolation { sigil: b'$' },
    },
    Rule {
        kind: RegionKind::ExpressionLanguage(ElStyle::Hash),
        pattern: Pattern::Interpolation { sigil: b'#' },
    },
    Rule {
        kind: RegionKind::ScriptBody,
        pattern: Pattern::RawText { tag: "script" },
    },
    Rule {
        kind: RegionKind::StyleBody,
        pattern: Pattern::RawText { tag: "style" },
    },
];

/// Run every rule in order. Returns the placeholder skeleton and the table
/// holding each region's transformed content.
pub fn extract(text: &str, options: &FormatOptions) -> (String, ContentTable) {
    let mut table = ContentTable::for_text(text, "jsp");
    let mut skeleton = text.to_string();
    for rule in RULES {
        let before = table.len();
        skeleton = apply_rule(&skeleton, rule, &mut table, options);
        log::trace!(
            target: "jspfmt::regions",
            "{:?}: {} region(s)",
            rule.kind,
            table.len() - before
        );
    }
    log::debug!(target: "jspfmt::regions", "extracted {} region(s)", table.len());
    (skeleton, table)
}

/// Apply a single rule, storing matches in `table`.
pub fn apply_rule(
    text: &str,
    rule: &Rule,
    table: &mut ContentTable,
    options: &FormatOptions,
) -> String {
    let mut replace = |raw: &str| table.insert(rule.kind.transform(raw, options).into_owned());
    match rule.pattern {
        Pattern::Delimited {
            open,
            close,
            reject_after,
        } => scan_delimited(text, open, close, reject_after, &mut replace),
        Pattern::Interpolation { sigil } => scan_interpolation(text, sigil, &mut replace),
        Pattern::RawText { tag } => scan_raw_text(text, tag, &mut replace),
    }
}

/* ============================ Delimited spans =========================== */

fn scan_delimited(
    text: &str,
    open: &str,
    close: &str,
    reject_after: &[u8],
    replace: &mut dyn FnMut(&str) -> String,
) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    let mut copied = 0usize;

    while let Some(off) = memmem::find(&bytes[i..], open.as_bytes()) {
        let start = i + off;
        let body = start + open.len();
        if bytes.get(body).is_some_and(|b| reject_after.contains(b)) {
            i = body;
            continue;
        }
        let Some(close_off) = memmem::find(&bytes[body..], close.as_bytes()) else {
            // unterminated; nothing after this can close either
            break;
        };
        let end = body + close_off + close.len();
        out.push_str(&text[copied..start]);
        out.push_str(&replace(&text[start..end]));
        i = end;
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}

/* ============================ EL interpolation ========================== */

fn scan_interpolation(
    text: &str,
    sigil: u8,
    replace: &mut dyn FnMut(&str) -> String,
) -> String {
    let bytes = text.as_bytes();
    let opener = [sigil, b'{'];
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    let mut copied = 0usize;

    while let Some(off) = memmem::find(&bytes[i..], &opener) {
        let start = i + off;
        if start > 0 && bytes[start - 1] == b'\\' {
            i = start + 2;
            continue;
        }
        let Some(end) = interpolation_end(bytes, start + 2) else {
            i = start + 2;
            continue;
        };
        out.push_str(&text[copied..start]);
        out.push_str(&replace(&text[start..=end]));
        i = end + 1;
        copied = i;
    }
    out.push_str(&text[copied..]);
    out
}

/// Index of the `}` closing an interpolation whose payload starts at `i`.
fn interpolation_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: u8 = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if quote != 0 {
            if b == b'\\' {
                i += 1;
            } else if b == quote {
                quote = 0;
            }
        } else {
            match b {
                b'"' | b'\'' => quote = b,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/* ============================ Raw-text bodies =========================== */

/// Swap the body of every `<tag …>…</tag>` element. The tags themselves stay
/// in the skeleton so they still drive indentation.
fn scan_raw_text(text: &str, tag: &str, replace: &mut dyn FnMut(&str) -> String) -> String {
    let bytes = text.as_bytes();
    let lower = text.to_ascii_lowercase();
    let lower = lower.as_bytes();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    let mut copied = 0usize;

    while let Some(off) = memmem::find(&lower[i..], open.as_bytes()) {
        let start = i + off;
        let after = start + open.len();
        // `<scripts>` is some other element
        if !bytes.get(after).is_some_and(|&b| is_ws(b) || b == b'>' || b == b'/') {
            i = after;
            continue;
        }
        let Some(tag_end) = find_tag_end(bytes, start) else {
            break;
        };
        if bytes[tag_end - 1] == b'/' {
            i = tag_end + 1;
            continue;
        }
        let body_start = tag_end + 1;
        let Some(close_off) = memmem::find(&lower[body_start..], close.as_bytes()) else {
            break;
        };
        let body_end = body_start + close_off;
        if body_end > body_start {
            out.push_str(&text[copied..body_start]);
            out.push_str(&replace(&text[body_start..body_end]));
            copied = body_end;
        }
        i = body_end + close.len();
    }
    out.push_str(&text[copied..]);
    out
}

/* ============================== Expressions ============================= */

/// `<%=  a  +  b %>` → `<%= a + b %>`. Quoted text keeps its spacing.
fn collapse_expression(raw: &str) -> Cow<'_, str> {
    const OPEN: &str = "<%=";
    const CLOSE: &str = "%>";
    if raw.len() < OPEN.len() + CLOSE.len() {
        return Cow::Borrowed(raw);
    }
    let inner = &raw[OPEN.len()..raw.len() - CLOSE.len()];
    let payload = collapse_outside_quotes(inner.trim());
    if payload.is_empty() {
        return Cow::Borrowed(raw);
    }
    let collapsed = format!("{OPEN} {payload} {CLOSE}");
    if collapsed == raw {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(collapsed)
    }
}

fn collapse_outside_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_run = false;
    for c in s.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
            continue;
        }
        in_run = false;
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}
