// src/options.rs
//
// Formatting options shared by every pipeline stage. One value is built per
// invocation and never mutated while a document is being formatted.

use thiserror::Error;

/// Errors raised when validating [`FormatOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("indent width must be a positive integer")]
    ZeroIndentWidth,
    #[error("wrap length must be a positive integer")]
    ZeroWrapLength,
}

/// Formatter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Columns per indentation level when `insert_spaces` is set.
    pub indent_width: usize,
    /// Indent with a run of spaces; otherwise one tab per level.
    pub insert_spaces: bool,
    /// Keep blank-line runs (capped at `max_consecutive_blank_lines`).
    pub preserve_blank_lines: bool,
    pub max_consecutive_blank_lines: usize,
    /// Soft wrap hint. Read from hosts but not enforced by any stage yet.
    pub wrap_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            insert_spaces: true,
            preserve_blank_lines: true,
            max_consecutive_blank_lines: 2,
            wrap_length: 120,
        }
    }
}

impl FormatOptions {
    /// Options seeded from the host editor's tab settings; the remaining
    /// fields keep their defaults.
    pub fn from_editor(tab_size: usize, insert_spaces: bool) -> Self {
        Self {
            indent_width: tab_size,
            insert_spaces,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.indent_width == 0 {
            return Err(OptionsError::ZeroIndentWidth);
        }
        if self.wrap_length == 0 {
            return Err(OptionsError::ZeroWrapLength);
        }
        Ok(())
    }

    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.indent_width)
        } else {
            "\t".to_string()
        }
    }

    /// Indentation for `depth` levels.
    pub fn indent(&self, depth: usize) -> String {
        self.indent_unit().repeat(depth)
    }

    /// Longest blank-line run the reassembler lets through.
    pub fn blank_line_cap(&self) -> usize {
        if self.preserve_blank_lines {
            self.max_consecutive_blank_lines
        } else {
            0
        }
    }
}
