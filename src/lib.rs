// src/lib.rs
//
// jspfmt: structural formatter for JSP documents.
//
// Pipeline, one call, nothing kept between calls:
//   text ─▶ regions::extract ─▶ indent::indent_skeleton ─▶ reassemble ─▶ text
//
// Regions (comments, scriptlets, directives, EL, script/style bodies) are
// swapped for placeholder tokens so the line-oriented indenter only ever sees
// the markup skeleton. Scriptlets and directives get their own layout on the
// way out; everything else comes back verbatim.

pub mod directive;
pub mod indent;
pub mod options;
pub mod placeholder;
pub mod reassemble;
pub mod regions;
pub mod scriptlet;
pub mod tags;

use std::borrow::Cow;
use std::ops::Range;

use memchr::memchr;
use thiserror::Error;

pub use options::{FormatOptions, OptionsError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("range {start}..{end} is outside the {len}-byte document")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Result of a formatting request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The formatted text is byte-identical to the input.
    Unchanged,
    /// Replacement text for the requested span.
    Replace(String),
}

impl FormatOutcome {
    fn compare(original: &str, formatted: String) -> Self {
        if formatted == original {
            FormatOutcome::Unchanged
        } else {
            FormatOutcome::Replace(formatted)
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FormatOutcome::Unchanged)
    }

    /// The text after applying this outcome to `original`.
    pub fn apply<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            FormatOutcome::Unchanged => original,
            FormatOutcome::Replace(text) => text,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Decided by the first line break in the document.
    fn detect(text: &str) -> Self {
        match memchr(b'\n', text.as_bytes()) {
            Some(at) if at > 0 && text.as_bytes()[at - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    fn apply(self, text: String) -> String {
        match self {
            LineEnding::Lf => text,
            LineEnding::CrLf => text.replace('\n', "\r\n"),
        }
    }
}

/// Format a whole document. Never fails; spans it cannot make sense of are
/// left as they were.
pub fn format_document(text: &str, options: &FormatOptions) -> String {
    let ending = LineEnding::detect(text);
    let text: Cow<'_, str> = if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    };

    let (skeleton, table) = regions::extract(&text, options);
    let indented = indent::indent_skeleton(&skeleton, options);
    let formatted = reassemble::reassemble(&indented, table, options);
    log::debug!(
        target: "jspfmt",
        "formatted {} byte(s) into {} byte(s)",
        text.len(),
        formatted.len()
    );
    ending.apply(formatted)
}

/// Format a whole document, reporting [`FormatOutcome::Unchanged`] instead of
/// an identical replacement.
pub fn format_edit(text: &str, options: &FormatOptions) -> FormatOutcome {
    FormatOutcome::compare(text, format_document(text, options))
}

/// Format the byte range `range` of `document` on its own.
///
/// A slice that does not end in a line break gets no trailing newline, so the
/// replacement drops back into place.
pub fn format_range(
    document: &str,
    range: Range<usize>,
    options: &FormatOptions,
) -> Result<FormatOutcome, FormatError> {
    options.validate()?;
    let Range { start, end } = range;
    if start > end || end > document.len() {
        return Err(FormatError::RangeOutOfBounds {
            start,
            end,
            len: document.len(),
        });
    }
    if !document.is_char_boundary(start) || !document.is_char_boundary(end) {
        return Err(FormatError::NotCharBoundary { start, end });
    }

    let slice = &document[start..end];
    let mut formatted = format_document(slice, options);
    if !slice.ends_with('\n') {
        let kept = formatted.trim_end_matches(['\r', '\n']).len();
        formatted.truncate(kept);
    }
    Ok(FormatOutcome::compare(slice, formatted))
}
