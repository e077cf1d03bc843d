// src/placeholder.rs
//
// Placeholder tokens and the content table behind them.
//
// A token is `<prefix><n><TOKEN_END>`. The prefix is built from private-use
// code points and grown until it does not occur in the text being protected,
// so a token can never collide with document content. The trailing sentinel
// keeps token 1 from matching inside token 11.

const TOKEN_START: char = '\u{E000}';
const TOKEN_END: char = '\u{E001}';

/// Maps placeholder tokens to the text they stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTable {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl ContentTable {
    /// A table whose tokens cannot occur in `text`.
    pub fn for_text(text: &str, label: &str) -> Self {
        let mut prefix = String::with_capacity(label.len() + 8);
        prefix.push(TOKEN_START);
        prefix.push_str(label);
        while text.contains(prefix.as_str()) {
            prefix.push(TOKEN_START);
        }
        Self {
            prefix,
            entries: Vec::new(),
        }
    }

    /// Store `content` and return the freshly allocated token for it.
    pub fn insert(&mut self, content: String) -> String {
        let token = format!("{}{}{}", self.prefix, self.entries.len(), TOKEN_END);
        self.entries.push((token.clone(), content));
        token
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every token in `text` with its content, each at most once.
    ///
    /// Latest tokens go first: a region extracted late (a `<script>` body,
    /// say) may enclose tokens from earlier passes, which only become visible
    /// once the enclosing token is expanded. Tokens absent from `text` are
    /// skipped.
    pub fn restore(self, text: &str) -> String {
        let mut out = text.to_string();
        for (token, content) in self.entries.into_iter().rev() {
            if let Some(at) = out.find(token.as_str()) {
                out.replace_range(at..at + token.len(), &content);
            }
        }
        out
    }
}
