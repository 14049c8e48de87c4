//! CSS minifier – re-prints stylesheets through lightningcss with the
//! minifying printer.
//!
//! Only the printer minifies: rules are never merged or reordered, so the
//! generated stylesheet keeps its class order.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use crate::dom::{Document, DomNode};

/// Minify a stylesheet. Never fails: invalid rules and declarations are
/// skipped by the parser, and input it cannot handle at all is returned
/// trimmed.
pub fn minify_css(css: &str) -> String {
    let parsed = StyleSheet::parse(
        css,
        ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        },
    );
    let printed = match parsed {
        Ok(sheet) => sheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map(|result| result.code)
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match printed {
        Ok(minified) => {
            log::trace!("minified CSS {} -> {} bytes", css.len(), minified.len());
            minified
        }
        Err(e) => {
            log::warn!("leaving unparseable stylesheet as-is: {e}");
            css.trim().to_string()
        }
    }
}

/// Minify the contents of every `<style>` element in place. Returns the
/// number of style elements rewritten.
pub fn minify_style_elements(doc: &mut Document) -> usize {
    let mut count = 0;
    doc.for_each_element_mut(|el| {
        if el.name != "style" {
            return;
        }
        let source = el.text_content();
        let minified = minify_css(&source);
        el.children = if minified.is_empty() {
            Vec::new()
        } else {
            vec![DomNode::Text(minified)]
        };
        count += 1;
    });
    count
}
