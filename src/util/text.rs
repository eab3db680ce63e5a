use scraper::{Html, Node};
use std::borrow::Cow;

/// Ellipsis appended to truncated text (a single character, U+2026).
const ELLIPSIS: char = '…';

/// Collapses whitespace and caps the result at `max_chars` characters.
///
/// Every run of whitespace (spaces, tabs, newlines, and other Unicode
/// whitespace) becomes a single ASCII space and the ends are trimmed. When the
/// collapsed text is longer than `max_chars`, the first `max_chars - 1`
/// characters are kept and [`ELLIPSIS`] is appended, so the output is exactly
/// `max_chars` characters long.
///
/// Lengths are counted in `char`s, never bytes, so multi-byte text is never
/// split inside a code point.
///
/// # Examples
///
/// ```
/// use daily_drop::util::clean_text;
///
/// assert_eq!(clean_text("a\n\n  b\tc", 180), "a b c");
/// assert_eq!(clean_text("", 180), "");
///
/// let long = "x".repeat(500);
/// let cleaned = clean_text(&long, 180);
/// assert_eq!(cleaned.chars().count(), 180);
/// assert!(cleaned.ends_with('…'));
/// ```
pub fn clean_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    // max_chars == 0 cannot hold even the ellipsis
    if max_chars == 0 {
        return String::new();
    }

    let mut out: String = collapsed.chars().take(max_chars - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Elements whose boundaries separate words in rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "blockquote", "section", "table", "tr", "td", "th",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "pre",
];

/// Elements whose text content is never shown.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

fn is_block(node: &Node) -> bool {
    node.as_element().is_some_and(|el| BLOCK_ELEMENTS.contains(&el.name()))
}

/// Converts feed-supplied HTML into plain text.
///
/// Markup is parsed as an HTML fragment, so character references
/// (`&amp;`, `&#8217;`, `&nbsp;`) come out decoded. Inline tags vanish
/// without a trace (`co<em>op</em>` stays one word); block elements such
/// as `<p>` and `<br>` become line breaks. Whitespace is otherwise kept
/// verbatim for [`clean_text`] to collapse.
///
/// Returns `Cow::Borrowed` when the input has neither `<` nor `&` (the
/// common case for plain-text RSS descriptions).
pub fn html_to_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '&']) {
        return Cow::Borrowed(s);
    }

    let fragment = Html::parse_fragment(s);
    let mut out = String::with_capacity(s.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|parent| parent.value().as_element())
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()));
                if hidden {
                    continue;
                }
                // text right after a closed block starts a new line
                if node.prev_sibling().is_some_and(|sib| is_block(sib.value())) {
                    out.push('\n');
                }
                out.push_str(text);
            }
            other if is_block(other) => out.push('\n'),
            _ => {}
        }
    }

    Cow::Owned(out)
}
