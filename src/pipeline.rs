//! Pipeline – ties together parsing, deduplication, CSS minification and
//! HTML serialization into a single function call.

use crate::css::{minify_css, minify_style_elements};
use crate::dedup::{DedupOptions, StyleDeduplicator};
use crate::dom::{parse_html, DomNode, ElementNode};
use crate::html::{serialize, SerializeOptions};
use crate::report::DedupReport;

/// Configuration for the processing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Class naming options for the deduplicator.
    pub dedup: DedupOptions,
    /// HTML serializer options.
    pub serialize: SerializeOptions,
    /// Minify the generated stylesheet and existing `<style>` blocks
    /// (default: true).
    pub minify_css: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dedup: DedupOptions::default(),
            serialize: SerializeOptions::default(),
            minify_css: true,
        }
    }
}

impl PipelineConfig {
    /// Deduplicate only; leave whitespace, comments and CSS formatting alone.
    pub fn unminified() -> Self {
        Self {
            serialize: SerializeOptions::pretty(),
            minify_css: false,
            ..Self::default()
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Final markup.
    pub html: String,
    /// Generated stylesheet as injected into the document.
    pub stylesheet: String,
    /// Per-element declaration-set classes created.
    pub generated: usize,
    /// Shared single-declaration classes created.
    pub shared: usize,
    pub report: DedupReport,
}

/// Full pipeline: HTML string → deduplicated, minified HTML string.
pub fn process_html(html: &str, config: &PipelineConfig) -> PipelineOutput {
    // 1. Parse
    let mut doc = parse_html(html);

    // 2. Deduplicate inline styles
    let outcome = StyleDeduplicator::new(&config.dedup).deduplicate(&mut doc);

    // 3. Minify CSS; existing <style> blocks first so the injected one is
    //    not processed twice.
    let raw = outcome.stylesheet.to_string();
    let stylesheet = if config.minify_css {
        let rewritten = minify_style_elements(&mut doc);
        log::debug!("minified {rewritten} existing style elements");
        minify_css(&raw)
    } else {
        raw
    };

    // 4. Inject
    if !stylesheet.is_empty() {
        let mut style = ElementNode::new("style");
        style.children.push(DomNode::Text(stylesheet.clone()));
        doc.append_to_head(DomNode::Element(style));
    }

    // 5. Serialize
    let serialize_options = SerializeOptions {
        minify_css: config.minify_css,
        ..config.serialize.clone()
    };
    let output = serialize(&doc, &serialize_options);

    let report = DedupReport {
        input_bytes: html.len(),
        output_bytes: output.len(),
        styled_elements: outcome.styled_elements,
        shared_classes: outcome.shared,
        generated_classes: outcome.generated,
        rules: outcome.stylesheet.rules.len(),
        stylesheet_bytes: stylesheet.len(),
    };
    log::info!(
        "processed {} -> {} bytes ({} generated, {} shared classes)",
        report.input_bytes,
        report.output_bytes,
        report.generated_classes,
        report.shared_classes
    );

    PipelineOutput {
        html: output,
        stylesheet,
        generated: outcome.generated,
        shared: outcome.shared,
        report,
    }
}

/// Convenience: process with the default configuration and return only the
/// markup.
pub fn minify_html(html: &str) -> String {
    process_html(html, &PipelineConfig::default()).html
}
