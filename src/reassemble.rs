// src/reassemble.rs
//
// Put protected regions back and normalize the whole document's whitespace.

use crate::options::FormatOptions;
use crate::placeholder::ContentTable;

pub fn reassemble(indented: &str, table: ContentTable, options: &FormatOptions) -> String {
    // capped while regions are still tokens, so their interiors stay verbatim
    let capped = cap_blank_lines(indented, options.blank_line_cap());
    finish(table.restore(&capped))
}

/// Shorten every run of empty lines to at most `cap`. The indenter has
/// already emptied whitespace-only skeleton lines; anything else with
/// whitespace on it is content.
pub fn cap_blank_lines(text: &str, cap: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    let mut dropped = 0usize;
    let mut emitted_any = false;
    for line in text.split('\n') {
        if line.is_empty() {
            run += 1;
            if run > cap {
                dropped += 1;
                continue;
            }
        } else {
            run = 0;
        }
        if emitted_any {
            out.push('\n');
        }
        emitted_any = true;
        out.push_str(line);
    }
    if dropped > 0 {
        log::trace!(target: "jspfmt::reassemble", "dropped {dropped} blank line(s)");
    }
    out
}

/// Trim trailing whitespace and end with exactly one newline. An all-blank
/// document becomes empty.
fn finish(mut text: String) -> String {
    let kept = text.trim_end().len();
    text.truncate(kept);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
