use jspfmt::{format_document, format_edit, FormatOptions, FormatOutcome};
use rstest::rstest;

fn two_spaces() -> FormatOptions {
    FormatOptions::from_editor(2, true)
}

fn assert_lines(actual: &str, expected: &[&str]) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    assert_eq!(expected, actual_lines.as_slice());
}

const PAGE: &str = r#"<%@ page language="java" contentType="text/html; charset=UTF-8" pageEncoding="UTF-8" session="true" %>
<%@ taglib prefix="c" uri="http://java.sun.com/jsp/jstl/core" %>
<!DOCTYPE html>
<html>
<head>
<title>${title}</title>
<style>
  body { margin: 0; }
</style>
</head>
<body>
<%-- greeting --%>
<c:choose>
<c:when test="${user != null}">
<p>Hello, <c:out value="${user.name}"/></p>
</c:when>
<c:otherwise>
<a href="login.jsp">Log in</a>
</c:otherwise>
</c:choose>
<ul>
<c:forEach items="${items}" var="item">
<li>${item}</li>
</c:forEach>
</ul>
<% int x=1; if(x>0){ out.println(x); } %>
<script>
var n = ${count};
</script>
</body>
</html>
"#;

const PAGE_FORMATTED: &[&str] = &[
    "<%@ page",
    "  language=\"java\"",
    "  contentType=\"text/html; charset=UTF-8\"",
    "  pageEncoding=\"UTF-8\"",
    "  session=\"true\" %>",
    "<%@ taglib prefix=\"c\" uri=\"http://java.sun.com/jsp/jstl/core\" %>",
    "<!DOCTYPE html>",
    "<html>",
    "  <head>",
    "    <title>${title}</title>",
    "    <style>",
    "  body { margin: 0; }",
    "</style>",
    "  </head>",
    "  <body>",
    "    <%-- greeting --%>",
    "    <c:choose>",
    "      <c:when test=\"${user != null}\">",
    "        <p>Hello, <c:out value=\"${user.name}\"/></p>",
    "      </c:when>",
    "      <c:otherwise>",
    "        <a href=\"login.jsp\">Log in</a>",
    "      </c:otherwise>",
    "    </c:choose>",
    "    <ul>",
    "      <c:forEach items=\"${items}\" var=\"item\">",
    "        <li>${item}</li>",
    "      </c:forEach>",
    "    </ul>",
    "    <%",
    "  int x=1;",
    "  if(x>0){",
    "    out.println(x);",
    "  }",
    "%>",
    "    <script>",
    "var n = ${count};",
    "</script>",
    "  </body>",
    "</html>",
];

#[test]
fn formats_full_page() {
    let output = format_document(PAGE, &two_spaces());
    println!("actual_data: {:?}", output.lines().collect::<Vec<_>>());
    assert_lines(&output, PAGE_FORMATTED);
    assert!(output.ends_with("</html>\n"));
}

#[test]
fn full_page_is_idempotent() {
    let once = format_document(PAGE, &two_spaces());
    let twice = format_document(&once, &two_spaces());
    assert_eq!(once, twice);
    assert_eq!(format_edit(&once, &two_spaces()), FormatOutcome::Unchanged);
}

#[test]
fn directive_with_many_attributes_breaks() {
    let input = r#"<%@ page language="java" contentType="text/html; charset=UTF-8" pageEncoding="UTF-8" session="true" %>"#;
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<%@ page",
            "    language=\"java\"",
            "    contentType=\"text/html; charset=UTF-8\"",
            "    pageEncoding=\"UTF-8\"",
            "    session=\"true\" %>",
        ],
    );
}

#[test]
fn block_tag_nests_void_element_and_text() {
    let input = "<div>\n<c:if test=\"${show}\">\n<br>\nHello\n</c:if>\n</div>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<div>",
            "    <c:if test=\"${show}\">",
            "        <br>",
            "        Hello",
            "    </c:if>",
            "</div>",
        ],
    );
}

#[test]
fn single_statement_scriptlet_stays_on_one_line() {
    let input = "<div>\n<% int x = 1; %>\n</div>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_eq!(output, "<div>\n    <% int x = 1; %>\n</div>\n");
}

#[test]
fn multi_statement_scriptlet_is_split_and_brace_indented() {
    let input = "<% int x=1; if(x>0){ out.println(x); } %>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<%",
            "    int x=1;",
            "    if(x>0){",
            "        out.println(x);",
            "    }",
            "%>",
        ],
    );
}

#[test]
fn nested_scriptlet_payload_ignores_markup_depth() {
    let input = "<div>\n<% if (a) { b(); } %>\n</div>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &["<div>", "    <%", "    if (a) {", "        b();", "    }", "%>", "</div>"],
    );
}

#[test]
fn declaration_blocks_use_scriptlet_layout() {
    let input = "<%! private int n = 0; int next() { return ++n; } %>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<%!",
            "    private int n = 0;",
            "    int next() {",
            "        return ++n;",
            "    }",
            "%>",
        ],
    );
}

#[test]
fn blank_line_runs_are_capped() {
    let input = "<div>\n\n\n\n\n\ntext\n</div>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_eq!(output, "<div>\n\n\n    text\n</div>\n");
}

#[test]
fn blank_lines_removed_when_not_preserved() {
    let opts = FormatOptions {
        preserve_blank_lines: false,
        ..FormatOptions::default()
    };
    let output = format_document("<p>a</p>\n\n<p>b</p>\n", &opts);
    assert_eq!(output, "<p>a</p>\n<p>b</p>\n");
}

#[test]
fn void_elements_do_not_nest_siblings() {
    let input = "<div>\n<img src=\"a.png\">\n<input type=\"text\">\n<span>x</span>\n</div>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<div>",
            "    <img src=\"a.png\">",
            "    <input type=\"text\">",
            "    <span>x</span>",
            "</div>",
        ],
    );
}

#[test]
fn unmatched_closers_do_not_underflow() {
    let input = "</div>\n</div>\n<section>\ntext\n</section>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &["</div>", "</div>", "<section>", "    text", "</section>"],
    );
}

#[test]
fn unterminated_regions_pass_through() {
    let input = "<%@ page language=\"java\"\n<div>\n<%-- open comment\ntext\n</div>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<%@ page language=\"java\"",
            "<div>",
            "    <%-- open comment",
            "    text",
            "</div>",
        ],
    );
}

#[test]
fn malformed_directive_is_left_alone() {
    let input = "<%@   page   language=java %>\n";
    assert_eq!(format_document(input, &FormatOptions::default()), input);
}

#[rstest]
#[case::jsp_comment("<%--\n      keep   this\n  --%>")]
#[case::html_comment("<!--  <div>\n   not markup -->")]
#[case::el_dollar("${  fn:length(items)  }")]
#[case::el_hash("#{bean.value}")]
#[case::script_body("<script>\n  if (a < b) {\n      go();\n  }\n</script>")]
#[case::style_body("<style>\n    p { color: red }\n</style>")]
#[case::short_scriptlet("<%   request.setAttribute(\"a\", 1);   %>")]
#[case::script_blank_line("<script>\nvar a = 1;\n\nvar b = 2;\n</script>")]
#[case::script_whitespace_line("<script>\n  a();\n    \n  b();\n</script>")]
#[case::comment_whitespace_line("<!--\n   \nnote\n-->")]
#[case::comment_blank_run("<%--\n\n\n\n\nlong gap\n--%>")]
fn protected_regions_survive_verbatim(#[case] region: &str) {
    let input = format!("<div>\n<p>\n{region}\n</p>\n</div>\n");
    for opts in [
        FormatOptions::default(),
        FormatOptions {
            preserve_blank_lines: false,
            ..FormatOptions::default()
        },
    ] {
        let output = format_document(&input, &opts);
        assert!(
            output.contains(region),
            "region missing from output:\n{output}"
        );
    }
}

#[test]
fn blank_lines_dropped_around_but_not_inside_script() {
    let opts = FormatOptions {
        preserve_blank_lines: false,
        ..FormatOptions::default()
    };
    let input = "<p>a</p>\n\n<script>\nvar a = 1;\n\nvar b = 2;\n</script>\n";
    assert_eq!(
        format_document(input, &opts),
        "<p>a</p>\n<script>\nvar a = 1;\n\nvar b = 2;\n</script>\n"
    );
}

#[test]
fn body_of_single_tag_custom_element_keeps_siblings_aligned() {
    let input = "<div>\n<p>\n<fmt:message key=\"greet\">\n<fmt:param value=\"${n}\"/>\n</fmt:message>\n</p>\n<span>x</span>\n</div>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(
        &output,
        &[
            "<div>",
            "    <p>",
            "        <fmt:message key=\"greet\">",
            "        <fmt:param value=\"${n}\"/>",
            "        </fmt:message>",
            "    </p>",
            "    <span>x</span>",
            "</div>",
        ],
    );
}

#[rstest]
#[case::tabs(FormatOptions::from_editor(4, false), "<ul>\n\t<li>x</li>\n</ul>\n")]
#[case::two(FormatOptions::from_editor(2, true), "<ul>\n  <li>x</li>\n</ul>\n")]
#[case::eight(FormatOptions::from_editor(8, true), "<ul>\n        <li>x</li>\n</ul>\n")]
fn indentation_follows_options(#[case] opts: FormatOptions, #[case] expected: &str) {
    assert_eq!(format_document("<ul>\n<li>x</li>\n</ul>", &opts), expected);
}

#[test]
fn expressions_collapse_whitespace() {
    let input = "<span><%=   user.getName(  )   %></span>\n";
    let output = format_document(input, &FormatOptions::default());
    assert_eq!(output, "<span><%= user.getName( ) %></span>\n");
}

#[test]
fn multi_line_tags_are_plain_text() {
    let input = "<div\nclass=\"a\">\ntext\n</div>";
    let output = format_document(input, &FormatOptions::default());
    assert_lines(&output, &["<div", "class=\"a\">", "text", "</div>"]);
}

#[test]
fn trailing_whitespace_and_newlines_are_normalized() {
    let output = format_document("<p>x</p>   \n\n\n\n", &FormatOptions::default());
    assert_eq!(output, "<p>x</p>\n");
}
