// src/directive.rs
//
// `<%@ name attr="value" … %>` layout: one line when it is short, otherwise
// the opener on its own line and one attribute per indented line with the
// closer on the last one. Anything that does not scan as `name="value"`
// pairs is returned untouched.

use std::borrow::Cow;

use crate::options::FormatOptions;
use crate::tags::is_ws;

/// Collapsed directives at or under this many columns may stay inline.
pub const INLINE_LENGTH_LIMIT: usize = 120;

/// Directives with more attribute pairs than this always break.
pub const MAX_INLINE_ATTRIBUTES: usize = 3;

const OPENER: &str = "<%@";
const CLOSER: &str = "%>";

/// A scanned directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub name: &'a str,
    /// Normalized `name="value"` pairs, in source order.
    pub attributes: Vec<String>,
}

impl Directive<'_> {
    fn fits_inline(&self, collapsed_len: usize) -> bool {
        self.attributes.len() <= 1
            || (collapsed_len <= INLINE_LENGTH_LIMIT
                && self.attributes.len() <= MAX_INLINE_ATTRIBUTES)
    }
}

pub fn reformat<'a>(raw: &'a str, options: &FormatOptions) -> Cow<'a, str> {
    let Some(directive) = parse(raw) else {
        log::debug!(target: "jspfmt::directive", "unparsable directive left as-is: {raw:?}");
        return Cow::Borrowed(raw);
    };

    let collapsed = collapse_whitespace(raw);
    if directive.fits_inline(collapsed.chars().count()) {
        return if collapsed == raw {
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(collapsed)
        };
    }

    let unit = options.indent_unit();
    let mut out = String::with_capacity(raw.len() + directive.attributes.len() * (unit.len() + 1));
    out.push_str(OPENER);
    out.push(' ');
    out.push_str(directive.name);
    for attr in &directive.attributes {
        out.push('\n');
        out.push_str(&unit);
        out.push_str(attr);
    }
    out.push(' ');
    out.push_str(CLOSER);
    log::trace!(
        target: "jspfmt::directive",
        "broke {} directive over {} lines",
        directive.name,
        directive.attributes.len() + 1
    );
    Cow::Owned(out)
}

/// Scan a directive region. `None` on any malformed piece.
pub fn parse(raw: &str) -> Option<Directive<'_>> {
    if raw.len() < OPENER.len() + CLOSER.len() || !raw.starts_with(OPENER) || !raw.ends_with(CLOSER)
    {
        return None;
    }
    let inner = &raw[OPENER.len()..raw.len() - CLOSER.len()];
    let bytes = inner.as_bytes();
    let n = bytes.len();

    let mut i = skip_ws(bytes, 0);
    let name_start = i;
    if i >= n || !bytes[i].is_ascii_alphabetic() {
        return None;
    }
    while i < n && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'.' | b'-')) {
        i += 1;
    }
    let name = &inner[name_start..i];

    let mut attributes = Vec::new();
    loop {
        i = skip_ws(bytes, i);
        if i >= n {
            break;
        }
        let (attr, next) = scan_attribute(inner, i)?;
        attributes.push(attr);
        i = next;
    }

    Some(Directive { name, attributes })
}

/// `name="value"` or `name:part="value"` at `i`; whitespace around `=` is
/// dropped and whitespace runs in the value collapse to one space.
fn scan_attribute(s: &str, mut i: usize) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let n = bytes.len();

    let name_start = i;
    i = scan_attr_word(bytes, i)?;
    if i < n && bytes[i] == b':' {
        i = scan_attr_word(bytes, i + 1)?;
    }
    let name = &s[name_start..i];

    i = skip_ws(bytes, i);
    if i >= n || bytes[i] != b'=' {
        return None;
    }
    i = skip_ws(bytes, i + 1);
    if i >= n || (bytes[i] != b'"' && bytes[i] != b'\'') {
        return None;
    }
    let quote = bytes[i];
    let value_start = i;
    let close = memchr::memchr(quote, &bytes[i + 1..])? + i + 1;
    let value = collapse_whitespace(&s[value_start..=close]);

    Some((format!("{name}={value}"), close + 1))
}

fn scan_attr_word(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'-'))
    {
        i += 1;
    }
    (i > start).then_some(i)
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_ws(bytes[i]) {
        i += 1;
    }
    i
}

/// Every whitespace run becomes a single space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
