// src/tags.rs
//
// Tag vocabulary and tag-level scanning.
//
// Two tables drive indentation:
//   • VOID_ELEMENTS / SINGLE_TAG_CUSTOM: elements that never carry a body.
//   • BLOCK_SCOPED: per-prefix custom tags whose open/close forms nest.
// HTML names compare case-insensitively; prefixed custom names are exact.

/// Bumped whenever one of the tables below changes.
pub const VOCABULARY_VERSION: u32 = 1;

/* =============================== Core sets =============================== */

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Custom tags written without a body in practice.
pub const SINGLE_TAG_CUSTOM: &[&str] = &[
    "c:out", "c:set", "c:remove", "c:param",
    "fmt:message", "fmt:param", "fmt:setLocale", "fmt:setBundle", "fmt:setTimeZone",
    "fmt:formatNumber", "fmt:formatDate", "fmt:parseNumber", "fmt:parseDate",
    "fmt:requestEncoding",
    "sql:param", "sql:dateParam", "sql:setDataSource",
    "x:out", "x:set", "x:param",
    "jsp:param", "jsp:getProperty", "jsp:setProperty", "jsp:doBody", "jsp:invoke",
    "jsp:directive.page", "jsp:directive.include", "jsp:directive.taglib",
    "jsp:directive.tag", "jsp:directive.attribute", "jsp:directive.variable",
    "spring:message", "spring:theme", "spring:param", "spring:argument",
    "spring:htmlEscape", "spring:eval",
    "form:input", "form:password", "form:hidden", "form:errors", "form:checkbox",
    "form:checkboxes", "form:radiobutton", "form:radiobuttons", "form:options",
    "tiles:insertAttribute", "tiles:getAsString", "tiles:importAttribute",
    "sec:authentication", "sec:csrfInput", "sec:csrfMetaTags",
];

/// Recognized block-scoped custom tags, by namespace prefix.
pub const BLOCK_SCOPED: &[(&str, &[&str])] = &[
    ("c", &[
        "if", "choose", "when", "otherwise", "forEach", "forTokens", "catch", "import",
        "url", "redirect",
    ]),
    ("fmt", &["bundle", "timeZone"]),
    ("sql", &["query", "update", "transaction"]),
    ("x", &["if", "choose", "when", "otherwise", "forEach", "transform", "parse"]),
    ("jsp", &[
        "root", "body", "attribute", "element", "useBean", "include", "forward", "plugin",
        "params", "fallback", "text", "scriptlet", "declaration", "expression", "output",
    ]),
    ("spring", &["bind", "nestedPath", "hasBindErrors", "escapeBody", "url", "transform"]),
    ("form", &["form", "select", "textarea", "label", "button", "option"]),
    ("tiles", &["insertDefinition", "insertTemplate", "putAttribute", "putListAttribute",
        "addListAttribute"]),
    ("sec", &["authorize", "accesscontrollist"]),
];

/// How the indenter treats an element name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagRole {
    /// Never opens a scope.
    Void,
    /// Recognized custom tag whose open/close forms nest.
    BlockScoped,
    /// Anything else; generic markup rule.
    Markup,
}

pub fn is_void(name: &str) -> bool {
    if name.contains(':') {
        SINGLE_TAG_CUSTOM.contains(&name)
    } else {
        VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
    }
}

pub fn is_block_scoped(name: &str) -> bool {
    let Some((prefix, local)) = name.split_once(':') else {
        return false;
    };
    BLOCK_SCOPED
        .iter()
        .find(|(p, _)| *p == prefix)
        .is_some_and(|(_, locals)| locals.contains(&local))
}

pub fn role_of(name: &str) -> TagRole {
    if is_void(name) {
        TagRole::Void
    } else if is_block_scoped(name) {
        TagRole::BlockScoped
    } else {
        TagRole::Markup
    }
}

/* ============================ Utility predicates ========================= */

#[inline]
pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':' || b == b'.'
}

#[inline]
pub(crate) fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r'
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TagInfo<'a> {
    pub name: &'a str,
    pub is_end: bool,
    pub self_closing: bool,
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
pub(crate) fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Extract tag name, end/self-closing flags from a raw `<...>` slice.
pub(crate) fn parse_tag_info(tag: &str) -> TagInfo<'_> {
    let bytes = tag.as_bytes();
    let n = bytes.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && bytes[i] == b'/' {
        is_end = true;
        i += 1;
    }
    while i < n && is_ws(bytes[i]) {
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(bytes[i]) {
        i += 1;
    }
    let name = &tag[start..i];

    // self-closing? check before '>'
    let mut j = n.saturating_sub(1);
    while j > 0 && is_ws(bytes[j - 1]) {
        j -= 1;
    }
    let self_closing = j >= 2 && bytes[j - 1] == b'/';

    TagInfo {
        name,
        is_end,
        self_closing,
    }
}

/// True if `rest` contains `</name` followed by a non-name byte.
pub(crate) fn closes_element(rest: &str, name: &str) -> bool {
    let hay = rest.as_bytes();
    let mut from = 0;
    while let Some(off) = memchr::memmem::find(&hay[from..], b"</") {
        let at = from + off + 2;
        let end = at + name.len();
        if end <= hay.len()
            && hay[at..end].eq_ignore_ascii_case(name.as_bytes())
            && hay.get(end).map_or(true, |&b| !is_name_char(b))
        {
            return true;
        }
        from = at;
    }
    false
}
