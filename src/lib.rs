//! # style-forge – inline style deduplication and HTML minification
//!
//! This crate turns repeated inline `style="..."` attributes into a compact
//! set of generated classes plus one stylesheet, then minifies the result.
//! The pipeline stages are:
//!
//! 1. **Parse** – HTML string → DOM tree ([`dom`])
//! 2. **Deduplicate** – inline styles → classes + stylesheet ([`dedup`])
//! 3. **Minify CSS** – generated and existing stylesheets ([`css`], lightningcss)
//! 4. **Serialize** – DOM → markup, minified by minify-html ([`html`])
//! 5. **Render** – optional fixed-width PDF via headless Chromium (`pdf`,
//!    behind the `pdf` feature)
//!
//! ```
//! let out = style_forge::minify_html(r#"<p style="color:red">a</p><p style="color:red">b</p>"#);
//! let doc = style_forge::dom::parse_html(&out);
//! assert_eq!(doc.find_element("p").and_then(|p| p.attr("class")), Some("a"));
//! assert_eq!(doc.find_element("style").map(|s| s.text_content()), Some(".a{color:red}".to_string()));
//! ```

pub mod css;
pub mod dedup;
pub mod dom;
pub mod error;
pub mod html;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod templates;

// Re-exports for convenience
pub use dedup::{deduplicate, DedupOptions, DedupOutcome, StyleDeduplicator};
pub use error::{Error, Result};
pub use pipeline::{minify_html, process_html, PipelineConfig, PipelineOutput};
