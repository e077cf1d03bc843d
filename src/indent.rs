// src/indent.rs
//
// Structural indentation of the placeholder skeleton.
//
// One counter, one pass, one line at a time:
//   • closing-tag line   → depth -= 1 (clamped at 0), then emit
//   • opening-tag line   → emit, then depth += 1
//   • self-closing/plain → emit
// Void elements never change depth, whether opened or closed.
// Blank lines are emitted empty and leave the depth alone.

use crate::options::FormatOptions;
use crate::tags::{closes_element, find_tag_end, parse_tag_info, role_of, TagRole};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineClass {
    OpeningTag,
    ClosingTag,
    SelfClosingTag,
    PlainText,
}

/// Classify one trimmed skeleton line.
pub fn classify_line(line: &str) -> LineClass {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b'<') {
        return LineClass::PlainText;
    }
    // `<!DOCTYPE`, `<?xml`, stray `<%`, `< 3` …
    if !bytes.get(1).is_some_and(|&b| b == b'/' || b.is_ascii_alphabetic()) {
        return LineClass::PlainText;
    }
    let end = find_tag_end(bytes, 0);
    let info = parse_tag_info(end.map_or(line, |e| &line[..=e]));

    if info.is_end {
        // a void element's closer mirrors its opener and leaves depth alone
        return if role_of(info.name) == TagRole::Void {
            LineClass::SelfClosingTag
        } else {
            LineClass::ClosingTag
        };
    }
    let Some(end) = end else {
        return LineClass::PlainText;
    };
    if info.self_closing {
        return LineClass::SelfClosingTag;
    }
    match role_of(info.name) {
        TagRole::Void => LineClass::SelfClosingTag,
        TagRole::BlockScoped | TagRole::Markup => {
            if closes_element(&line[end + 1..], info.name) {
                // `<td>x</td>` opens and closes on the same line
                LineClass::PlainText
            } else {
                LineClass::OpeningTag
            }
        }
    }
}

/// Running indentation state.
#[derive(Debug, Clone)]
pub struct Indenter {
    unit: String,
    depth: usize,
}

impl Indenter {
    pub fn new(options: &FormatOptions) -> Self {
        Self {
            unit: options.indent_unit(),
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Emit one line (without its newline) into `out`.
    pub fn push_line(&mut self, raw_line: &str, out: &mut String) {
        let line = raw_line.trim();
        if line.is_empty() {
            return;
        }
        let class = classify_line(line);
        if class == LineClass::ClosingTag {
            if self.depth == 0 {
                log::trace!(target: "jspfmt::indent", "unmatched closer clamped: {line:?}");
            }
            self.depth = self.depth.saturating_sub(1);
        }
        for _ in 0..self.depth {
            out.push_str(&self.unit);
        }
        out.push_str(line);
        if class == LineClass::OpeningTag {
            self.depth += 1;
        }
    }
}

/// Re-indent every line of `skeleton`.
pub fn indent_skeleton(skeleton: &str, options: &FormatOptions) -> String {
    let mut indenter = Indenter::new(options);
    let mut out = String::with_capacity(skeleton.len() + skeleton.len() / 4);
    for (n, line) in skeleton.split('\n').enumerate() {
        if n > 0 {
            out.push('\n');
        }
        indenter.push_line(line, &mut out);
    }
    log::debug!(target: "jspfmt::indent", "final depth {}", indenter.depth());
    out
}
