//! forge – command-line inline style deduplicator and HTML minifier.
//!
//! Usage:
//!   forge <input.html> [output.html] [--css out.css] [--pdf out.pdf]
//!
//! If `output.html` is omitted the result is written next to the input file
//! with a `.min.html` suffix (e.g. `report.html` → `report.min.html`). Pass
//! `-` to write to stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use style_forge::dedup::DedupOptions;
use style_forge::html::SerializeOptions;
use style_forge::pipeline::{process_html, PipelineConfig};
use style_forge::templates;

#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "Deduplicate inline styles into classes and minify HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    forge page.html                  Write page.min.html
    forge page.html - --report       Print HTML to stdout, JSON stats after it
    forge page.html out.html --pdf out.pdf --width 1024")]
struct Cli {
    /// HTML file to process
    #[arg(value_name = "INPUT", required_unless_present = "sample")]
    input: Option<PathBuf>,

    /// Output file, or `-` for stdout (default: <INPUT stem>.min.html)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Process a built-in sample document instead of INPUT
    #[arg(long, value_name = "NAME", value_parser = templates::TEMPLATE_NAMES)]
    sample: Option<String>,

    /// Also write the generated stylesheet to this file
    #[arg(long, value_name = "PATH")]
    css: Option<PathBuf>,

    /// Render the result to a PDF (requires the `pdf` feature)
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,

    /// PDF page width in CSS pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Chromium executable used for PDF rendering
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Prefix for generated class names
    #[arg(long, default_value = "")]
    prefix: String,

    /// Keep HTML comments
    #[arg(long)]
    keep_comments: bool,

    /// Deduplicate only; do not minify HTML or CSS
    #[arg(long)]
    no_minify: bool,

    /// Print a JSON report of the run on stdout
    #[arg(long)]
    report: bool,

    /// Suppress the summary line
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> style_forge::Result<()> {
    let html = match (&cli.sample, &cli.input) {
        (Some(name), _) => templates::by_name(name)
            .ok_or_else(|| style_forge::Error::InvalidInput(format!("unknown sample '{name}'")))?
            .to_string(),
        (None, Some(input)) => fs::read_to_string(input)?,
        (None, None) => {
            return Err(style_forge::Error::InvalidInput("no input file specified".to_string()))
        }
    };

    let config = PipelineConfig {
        dedup: DedupOptions {
            class_prefix: cli.prefix.clone(),
        },
        serialize: SerializeOptions {
            minify: !cli.no_minify,
            keep_comments: cli.keep_comments || cli.no_minify,
            minify_css: !cli.no_minify,
        },
        minify_css: !cli.no_minify,
    };
    let out = process_html(&html, &config);

    let output = cli.output.clone().or_else(|| cli.input.as_deref().map(default_output));
    match output.as_deref() {
        Some(path) if path != Path::new("-") => write_file(path, out.html.as_bytes())?,
        _ => println!("{}", out.html),
    }

    if let Some(css_path) = &cli.css {
        write_file(css_path, out.stylesheet.as_bytes())?;
    }

    if let Some(pdf_path) = &cli.pdf {
        let bytes = render_pdf(&out.html, cli)?;
        write_file(pdf_path, &bytes)?;
        if !cli.quiet {
            eprintln!("Wrote '{}' ({} bytes)", pdf_path.display(), bytes.len());
        }
    }

    if cli.report {
        println!("{}", out.report.to_json());
    }

    if !cli.quiet {
        let target = output
            .as_deref()
            .filter(|p| *p != Path::new("-"))
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string());
        eprintln!(
            "Wrote '{}' ({} bytes, {} generated class{}, {} shared)",
            target,
            out.html.len(),
            out.generated,
            if out.generated == 1 { "" } else { "es" },
            out.shared
        );
    }
    Ok(())
}

/// `dir/page.html` → `dir/page.min.html`.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}.min.html"))
}

fn write_file(path: &Path, bytes: &[u8]) -> style_forge::Result<()> {
    // Create output directory if necessary.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(feature = "pdf")]
fn render_pdf(html: &str, cli: &Cli) -> style_forge::Result<Vec<u8>> {
    let config = style_forge::pdf::PdfConfig {
        width_px: cli.width,
        chrome_path: cli.chrome.clone(),
        ..Default::default()
    };
    style_forge::pdf::render_pdf(html, &config)
}

#[cfg(not(feature = "pdf"))]
fn render_pdf(_html: &str, _cli: &Cli) -> style_forge::Result<Vec<u8>> {
    Err(style_forge::Error::Pdf(
        "this build of forge was compiled without the `pdf` feature".to_string(),
    ))
}
