//! PDF export – renders final markup to a single fixed-width page whose
//! height follows the content, using a headless Chromium.
//!
//! The page is loaded from a temporary file so relative URLs and large
//! documents behave the same as when opened from disk.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};

use crate::error::{Error, Result};

/// CSS pixels per inch, as used by Chromium when printing.
const CSS_PX_PER_INCH: f64 = 96.0;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct PdfConfig {
    /// Page and viewport width in CSS pixels (default: 800).
    pub width_px: u32,
    /// Chromium binary; `None` lets headless_chrome locate or fetch one.
    pub chrome_path: Option<PathBuf>,
    /// Print background colours and images (default: true).
    pub print_background: bool,
    /// How long the browser may stay idle before it is torn down.
    pub timeout: Duration,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            width_px: 800,
            chrome_path: None,
            print_background: true,
            timeout: Duration::from_secs(30),
        }
    }
}

fn pdf_err(e: impl std::fmt::Display) -> Error {
    Error::Pdf(e.to_string())
}

/// Render `html` to PDF bytes.
pub fn render_pdf(html: &str, config: &PdfConfig) -> Result<Vec<u8>> {
    if config.width_px == 0 {
        return Err(Error::InvalidInput("page width must be positive".to_string()));
    }

    let mut file = tempfile::Builder::new()
        .prefix("style-forge-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    let url = format!("file://{}", file.path().display());

    let launch = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .path(config.chrome_path.clone())
        .window_size(Some((config.width_px, 1000)))
        .idle_browser_timeout(config.timeout)
        .build()
        .map_err(pdf_err)?;
    log::debug!("launching headless browser for {url}");
    let browser = Browser::new(launch).map_err(pdf_err)?;
    let tab = browser.new_tab().map_err(pdf_err)?;
    tab.navigate_to(&url)
        .map_err(pdf_err)?
        .wait_until_navigated()
        .map_err(pdf_err)?;

    let height_px = tab
        .evaluate(
            "Math.max(document.documentElement.scrollHeight, document.body ? document.body.scrollHeight : 0)",
            false,
        )
        .map_err(pdf_err)?
        .value
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
        .max(1.0);
    log::debug!("measured content height {height_px}px");

    let options = PrintToPdfOptions {
        print_background: Some(config.print_background),
        paper_width: Some(f64::from(config.width_px) / CSS_PX_PER_INCH),
        // One extra pixel keeps rounding from spilling onto a second page.
        paper_height: Some((height_px.ceil() + 1.0) / CSS_PX_PER_INCH),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        prefer_css_page_size: Some(false),
        ..Default::default()
    };
    let bytes = tab.print_to_pdf(Some(options)).map_err(pdf_err)?;
    log::info!("rendered PDF ({} bytes, {}x{height_px}px)", bytes.len(), config.width_px);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = PdfConfig::default();
        assert_eq!(cfg.width_px, 800);
        assert!(cfg.print_background);
        assert!(cfg.chrome_path.is_none());
    }

    #[test]
    fn zero_width_is_rejected_before_launch() {
        let cfg = PdfConfig {
            width_px: 0,
            ..PdfConfig::default()
        };
        assert!(matches!(
            render_pdf("<p>x</p>", &cfg),
            Err(Error::InvalidInput(_))
        ));
    }
}
