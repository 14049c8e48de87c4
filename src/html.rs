//! HTML serializer – writes a [`Document`] back to markup through html5ever's
//! serializer and, when asked, hands the markup to minify-html.
//!
//! The tree is written as-is. Minification (whitespace collapsing, optional
//! comment removal, attribute quoting) is left to the minifier, which knows
//! where whitespace is significant.

use std::io;

use html5ever::serialize::{
    serialize as write_html, Serialize, SerializeOpts, Serializer, TraversalScope,
};
use html5ever::{LocalName, Namespace, QualName};

use crate::dom::{Document, DomNode, ElementNode};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Serializer switches.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Run the markup through the HTML minifier (default: true).
    pub minify: bool,
    /// Keep `<!-- ... -->` comments when minifying (default: false).
    pub keep_comments: bool,
    /// Let the minifier rewrite `<style>` contents too (default: true).
    pub minify_css: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            minify: true,
            keep_comments: false,
            minify_css: true,
        }
    }
}

impl SerializeOptions {
    /// Verbatim output: no whitespace changes, comments kept.
    pub fn pretty() -> Self {
        Self {
            minify: false,
            keep_comments: true,
            minify_css: false,
        }
    }
}

/// Serialize a document to a string.
pub fn serialize(doc: &Document, options: &SerializeOptions) -> String {
    if !options.minify {
        return write_markup(&doc.children);
    }
    let markup = if options.keep_comments {
        write_markup(&doc.children)
    } else {
        let mut children = doc.children.clone();
        strip_comments(&mut children);
        write_markup(&children)
    };
    minify_markup(&markup, options)
}

/// Remove comment nodes and join the text nodes they separated, so the
/// whitespace on both sides collapses as one run.
fn strip_comments(nodes: &mut Vec<DomNode>) {
    let mut merged: Vec<DomNode> = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        match &mut node {
            DomNode::Comment(_) => continue,
            DomNode::Element(el) => strip_comments(&mut el.children),
            _ => {}
        }
        if let (DomNode::Text(text), Some(DomNode::Text(prev))) = (&node, merged.last_mut()) {
            prev.push_str(text);
            continue;
        }
        merged.push(node);
    }
    *nodes = merged;
}

fn write_markup(nodes: &[DomNode]) -> String {
    let mut bytes = Vec::new();
    if let Err(e) = write_html(&mut bytes, &Markup(nodes), SerializeOpts::default()) {
        log::warn!("HTML serialization stopped early: {e}");
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn minify_markup(markup: &str, options: &SerializeOptions) -> String {
    let cfg = minify_html::Cfg {
        keep_comments: options.keep_comments,
        minify_css: options.minify_css,
        keep_closing_tags: true,
        keep_html_and_head_opening_tags: true,
        ..minify_html::Cfg::default()
    };
    let minified = minify_html::minify(markup.as_bytes(), &cfg);
    match String::from_utf8(minified) {
        Ok(out) => {
            log::trace!("minified HTML {} -> {} bytes", markup.len(), out.len());
            out
        }
        Err(_) => {
            log::warn!("HTML minifier produced invalid UTF-8; keeping unminified markup");
            markup.to_string()
        }
    }
}

/// Elements whose first newline is swallowed by the parser.
fn drops_leading_newline(name: &str) -> bool {
    matches!(name, "pre" | "textarea" | "listing")
}

fn element_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name))
}

/// Adapter that lets html5ever's serializer walk our owned tree.
struct Markup<'a>(&'a [DomNode]);

impl Serialize for Markup<'_> {
    fn serialize<S>(&self, serializer: &mut S, _scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        write_nodes(self.0, serializer)
    }
}

fn write_nodes<S: Serializer>(nodes: &[DomNode], serializer: &mut S) -> io::Result<()> {
    for node in nodes {
        match node {
            DomNode::Doctype(name) => serializer.write_doctype(name)?,
            DomNode::Comment(text) => serializer.write_comment(text)?,
            DomNode::Text(text) => serializer.write_text(text)?,
            DomNode::Element(el) => write_element(el, serializer)?,
        }
    }
    Ok(())
}

fn write_element<S: Serializer>(el: &ElementNode, serializer: &mut S) -> io::Result<()> {
    let name = element_name(&el.name);
    let attr_names: Vec<QualName> = el
        .attributes
        .iter()
        .map(|a| QualName::new(None, Namespace::from(""), LocalName::from(a.name.as_str())))
        .collect();
    let attrs = attr_names
        .iter()
        .zip(el.attributes.iter().map(|a| a.value.as_str()));
    serializer.start_elem(name.clone(), attrs)?;

    // Re-emit the newline the parser will drop so a leading one survives.
    if drops_leading_newline(&el.name) {
        if let Some(DomNode::Text(text)) = el.children.first() {
            if text.starts_with('\n') {
                serializer.write_text("\n")?;
            }
        }
    }

    write_nodes(&el.children, serializer)?;
    serializer.end_elem(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn minified(html: &str) -> String {
        serialize(&parse_html(html), &SerializeOptions::default())
    }

    fn pretty(html: &str) -> String {
        serialize(&parse_html(html), &SerializeOptions::pretty())
    }

    fn first<'a>(doc: &'a Document, name: &str) -> &'a ElementNode {
        doc.find_element(name)
            .unwrap_or_else(|| panic!("no <{name}> in {doc:?}"))
    }

    #[test]
    fn pretty_output_is_verbatim() {
        assert_eq!(
            pretty("<!DOCTYPE html><p>a  b<!-- c --></p>"),
            "<!DOCTYPE html><html><head></head><body><p>a  b<!-- c --></p></body></html>"
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let out = pretty(r#"<p>a<br>b<img src="x.png" alt=""></p>"#);
        assert!(out.contains(r#"<p>a<br>b<img src="x.png" alt=""></p>"#), "{out}");
    }

    #[test]
    fn escapes_text_and_attributes() {
        let out = pretty(r#"<p title="a &quot;q&quot; &amp; b">1 &lt; 2 &amp;&nbsp;3</p>"#);
        assert!(
            out.contains(r#"<p title="a &quot;q&quot; &amp; b">1 &lt; 2 &amp;&nbsp;3</p>"#),
            "{out}"
        );
    }

    #[test]
    fn raw_text_is_not_escaped() {
        let out = pretty("<script>if (a < b && c) {}</script>");
        assert!(out.contains("<script>if (a < b && c) {}</script>"), "{out}");
    }

    #[test]
    fn leading_newline_in_pre_survives_round_trip() {
        for html in ["<pre>\n\nline</pre>", "<textarea>\nfirst</textarea>", "<pre>\nx</pre>"] {
            let before = parse_html(html);
            for options in [SerializeOptions::pretty(), SerializeOptions::default()] {
                let again = parse_html(&serialize(&before, &options));
                let name = if html.starts_with("<pre>") { "pre" } else { "textarea" };
                assert_eq!(
                    first(&before, name).text_content(),
                    first(&again, name).text_content(),
                    "{html} with {options:?}"
                );
            }
        }
    }

    #[test]
    fn minified_output_drops_comments_and_collapses_whitespace() {
        let html = "<!DOCTYPE html>\n<html>\n  <head>\n    <title>T</title>\n  </head>\n  <body>\n    <!-- c -->\n    <div>\n      <p>Hello   world</p>\n    </div>\n  </body>\n</html>\n";
        let out = minified(html);
        assert!(!out.contains("<!--"), "{out}");
        assert!(out.len() < html.len());
        let doc = parse_html(&out);
        assert_eq!(first(&doc, "p").text_content().trim(), "Hello world");
        assert_eq!(first(&doc, "title").text_content(), "T");
    }

    #[test]
    fn whitespace_around_removed_comment_collapses_to_one_space() {
        let doc = parse_html(&minified("<p>a <!-- x --> b</p>"));
        assert_eq!(first(&doc, "p").text_content(), "a b");
    }

    #[test]
    fn stripping_comments_joins_adjacent_text() {
        let mut doc = parse_html("<p>a <!-- x --> b<!--y--></p>");
        strip_comments(&mut doc.children);
        assert_eq!(
            doc.find_element("p").map(|p| p.children.clone()),
            Some(vec![DomNode::Text("a  b".to_string())])
        );
    }

    #[test]
    fn minifying_keeps_inline_spacing_and_raw_text() {
        let out = minified(
            "<p>Hello <b>bold</b>  <i>it</i> end</p><pre>  a\n   b </pre><script>if (a < b) { x(); }</script>",
        );
        let doc = parse_html(&out);
        assert_eq!(first(&doc, "p").text_content(), "Hello bold it end");
        assert_eq!(first(&doc, "pre").text_content(), "  a\n   b ");
        assert_eq!(first(&doc, "script").text_content(), "if (a < b) { x(); }");
    }

    #[test]
    fn minifying_preserves_attribute_and_text_values() {
        let out = minified(r#"<p title="a &quot;q&quot; &amp; b">1 &lt; 2 &amp;&nbsp;3</p>"#);
        let doc = parse_html(&out);
        let p = first(&doc, "p");
        assert_eq!(p.attr("title"), Some(r#"a "q" & b"#));
        assert_eq!(p.text_content(), "1 < 2 &\u{a0}3");
    }

    #[test]
    fn keep_comments_option() {
        let options = SerializeOptions {
            keep_comments: true,
            ..SerializeOptions::default()
        };
        let out = serialize(&parse_html("<p>a<!-- keep --></p>"), &options);
        let doc = parse_html(&out);
        assert!(first(&doc, "p")
            .children
            .iter()
            .any(|n| matches!(n, DomNode::Comment(c) if c.trim() == "keep")));
    }
}
