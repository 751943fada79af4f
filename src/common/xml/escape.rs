use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\""])
        .expect("Failed to build XML attribute escaper")
});

/// Escape a value for use inside a double-quoted XML attribute.
///
/// # Examples
///
/// ```
/// use rtfflow::common::xml::escape_xml_attr;
/// assert_eq!(escape_xml_attr("a & b"), "a &amp; b");
/// assert_eq!(escape_xml_attr("x?q=\"1\"&r=<2>"), "x?q=&quot;1&quot;&amp;r=&lt;2&gt;");
/// ```
#[inline]
pub fn escape_xml_attr(s: &str) -> String {
    XML_ATTR_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;"])
}

/// Append `text` to `out` as XML character content.
///
/// `&`, `<` and `>` become entity references and form feed becomes the
/// numeric reference `&#xc;`. Tab and every character at or above space pass
/// through; all other control characters are dropped.
///
/// # Examples
///
/// ```
/// use rtfflow::common::xml::append_encoded;
/// let mut out = String::from("> ");
/// append_encoded(&mut out, "a<b&c>d\td\u{0}");
/// assert_eq!(out, "> a&lt;b&amp;c&gt;d\td");
/// ```
pub fn append_encoded(out: &mut String, text: &str) {
    out.reserve(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push('\t'),
            '\u{c}' => out.push_str("&#xc;"),
            c if c >= ' ' => out.push(c),
            _ => {},
        }
    }
}
