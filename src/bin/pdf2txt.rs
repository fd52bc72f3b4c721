//! CLI binary for bangla-pdf2txt.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use bangla_pdf2txt::{
    extract, extract_to_file, inspect, ExtractionConfig, ExtractionProgressCallback, OcrPolicy,
    PageSelection, ProgressCallback, TesseractEngine, TextSource, UnicodeWordTokenizer,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── Terminal styling ─────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Tint {
    Ok,
    Faint,
    Strong,
    Note,
}

impl Tint {
    fn paint(self, s: &str) -> String {
        let sgr = match self {
            Tint::Ok => "32",
            Tint::Faint => "2",
            Tint::Strong => "1",
            Tint::Note => "36",
        };
        format!("\x1b[{sgr}m{s}\x1b[0m")
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    ocr_pages: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_extraction_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            ocr_pages: AtomicUsize::new(0),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
        self.bar.reset_eta();
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, source: TextSource, chars: usize) {
        let via = match source {
            TextSource::Embedded => Tint::Faint.paint("text layer"),
            TextSource::Ocr => {
                self.ocr_pages.fetch_add(1, Ordering::SeqCst);
                Tint::Note.paint("OCR")
            }
        };
        self.bar.println(format!(
            "  {} Processing page {:>3}/{:<3}  {:<10}  {}",
            Tint::Ok.paint("✓"),
            page_num,
            total,
            via,
            Tint::Faint.paint(&format!("{chars:>6} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages extracted ({} via OCR)",
            Tint::Ok.paint("✔"),
            Tint::Strong.paint(&total_pages.to_string()),
            self.ocr_pages.load(Ordering::SeqCst),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract to a file
  pdf2txt bangla.pdf -o bangla_text_cleaned.txt

  # Print to stdout, pages 3 to 10 only
  pdf2txt --pages 3-10 bangla.pdf

  # Force OCR on every page at 400 DPI
  pdf2txt --ocr always --dpi 400 scanned.pdf -o scanned.txt

  # Use the Unicode word tokenizer instead of the spacing rules
  pdf2txt --tokenizer unicode bangla.pdf

  # Inspect PDF metadata (no Tesseract needed)
  pdf2txt --inspect-only bangla.pdf

ENVIRONMENT VARIABLES:
  TESSERACT_PATH     Path to the tesseract binary
  PDFIUM_LIB_PATH    Path to libpdfium (file or directory)
  RUST_LOG           Log filter, overrides --verbose/--quiet

SETUP:
  Debian/Ubuntu:  apt install tesseract-ocr tesseract-ocr-ben
  macOS:          brew install tesseract tesseract-lang
  Windows:        UB-Mannheim installer; C:\Program Files\Tesseract-OCR is found automatically
  PDFium:         download from bblanchon/pdfium-binaries and set PDFIUM_LIB_PATH
"#;

/// Extract Bangla text from PDF files, with OCR for scanned pages.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2txt",
    version,
    about = "Extract Bangla text from PDF files, with OCR for scanned pages",
    long_about = "Extract Bangla and mixed Bangla/English text from a PDF. Pages with a usable \
embedded text layer are read directly; the rest are rasterised and recognised with Tesseract \
(ben+eng). The result is normalised to repair spacing artefacts in Bangla script.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write text to this file instead of stdout.
    #[arg(short, long, env = "PDF2TXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI for OCR'd pages (72–600).
    #[arg(long, env = "PDF2TXT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Pages with at most this many embedded characters are OCR'd.
    #[arg(long, env = "PDF2TXT_MIN_TEXT_CHARS", default_value_t = 50)]
    min_text_chars: usize,

    /// When to run OCR: auto, always, never.
    #[arg(long, env = "PDF2TXT_OCR", value_enum, default_value = "auto")]
    ocr: OcrArg,

    /// Path to the tesseract binary.
    #[arg(long = "tesseract", env = "TESSERACT_PATH")]
    tesseract_path: Option<PathBuf>,

    /// Tesseract language string.
    #[arg(long = "lang", env = "PDF2TXT_LANG", default_value = "ben+eng")]
    languages: String,

    /// Tesseract OCR engine mode.
    #[arg(long, default_value_t = 3)]
    oem: u8,

    /// Tesseract page segmentation mode.
    #[arg(long, default_value_t = 6)]
    psm: u8,

    /// Word splitting: rules (Bangla spacing heuristic) or unicode (UAX #29 tokenizer).
    #[arg(long, env = "PDF2TXT_TOKENIZER", value_enum, default_value = "rules")]
    tokenizer: TokenizerArg,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TXT_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2TXT_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium (file or directory).
    #[arg(long = "pdfium-lib", env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Directory for temporary page images.
    #[arg(long, env = "PDF2TXT_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Output structured JSON (ExtractionOutput) instead of text.
    #[arg(long, env = "PDF2TXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TXT_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TXT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OcrArg {
    Auto,
    Always,
    Never,
}

impl From<OcrArg> for OcrPolicy {
    fn from(v: OcrArg) -> Self {
        match v {
            OcrArg::Auto => OcrPolicy::Auto,
            OcrArg::Always => OcrPolicy::Always,
            OcrArg::Never => OcrPolicy::Never,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum TokenizerArg {
    Rules,
    Unicode,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports each page; keep library INFO logs
    // out of its way unless --verbose asks for everything.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let meta = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // A missing OCR engine is not fatal up front: text-layer PDFs never need it.
    if config.ocr_policy != OcrPolicy::Never && !cli.quiet {
        let engine = TesseractEngine::new(config.resolved_ocr_binary());
        if !engine.is_available() {
            eprintln!(
                "{} tesseract not found at '{}'; scanned pages will fail",
                Tint::Note.paint("⚠"),
                engine.binary().display()
            );
        }
    }

    // ── Run extraction ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let output = extract_to_file(&cli.input, output_path, &config)
            .await
            .context("Extraction failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        }
        if !cli.quiet {
            eprintln!(
                "{}  Text extraction and cleaning complete  {} chars  {}ms  →  {}",
                Tint::Ok.paint("✔"),
                output.stats.cleaned_chars,
                output.stats.total_duration_ms,
                Tint::Strong.paint(&output_path.display().to_string()),
            );
        }
    } else {
        let output = extract(&cli.input, &config)
            .await
            .context("Extraction failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.text.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !show_progress && !cli.json {
            eprintln!(
                "Text extraction and cleaning complete: {} pages ({} OCR) in {}ms",
                output.stats.processed_pages, output.stats.ocr_pages, output.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .min_text_chars(cli.min_text_chars)
        .ocr_policy(cli.ocr.clone().into())
        .ocr_languages(cli.languages.clone())
        .ocr_engine_mode(cli.oem)
        .ocr_page_segmentation_mode(cli.psm)
        .pages(pages);

    if let Some(ref path) = cli.tesseract_path {
        builder = builder.ocr_binary_path(path);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(ref dir) = cli.temp_dir {
        builder = builder.temp_dir(dir);
    }
    if let TokenizerArg::Unicode = cli.tokenizer {
        builder = builder.tokenizer(Arc::new(UnicodeWordTokenizer));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }

    if let Some((first, last)) = s.split_once('-') {
        let (first, last) = (page_number(first)?, page_number(last)?);
        if first > last {
            anyhow::bail!("Page range {first}-{last} runs backwards");
        }
        return Ok(PageSelection::Range(first, last));
    }

    let mut pages = s.split(',').map(page_number).collect::<Result<Vec<_>>>()?;
    Ok(match pages.len() {
        1 => PageSelection::Single(pages.remove(0)),
        _ => PageSelection::Set(pages),
    })
}

/// One 1-based page number.
fn page_number(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(0) => anyhow::bail!("Page numbers start at 1 (got 0)"),
        Ok(n) => Ok(n),
        Err(e) => Err(e).with_context(|| format!("'{raw}' is not a page number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_forms() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(parse_pages(" 5 ").unwrap(), PageSelection::Single(5)));
        assert!(matches!(parse_pages("3-15").unwrap(), PageSelection::Range(3, 15)));
        match parse_pages("1,3,5").unwrap() {
            PageSelection::Set(v) => assert_eq!(v, vec![1, 3, 5]),
            other => panic!("expected Set, got {other:?}"),
        }
    }

    #[test]
    fn parse_pages_rejects_bad_input() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-3").is_err());
        assert!(parse_pages("1,x").is_err());
        assert!(parse_pages("0,2").is_err());
        assert!(parse_pages("-4").is_err());
        assert!(parse_pages("").is_err());
    }

    #[test]
    fn cli_defaults_build_reference_config() {
        let cli = Cli::parse_from(["pdf2txt", "bangla.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 300);
        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.ocr_policy, OcrPolicy::Auto);
        assert!(config.tokenizer.is_none());
    }

    #[test]
    fn cli_tokenizer_flag_installs_unicode_tokenizer() {
        let cli = Cli::parse_from(["pdf2txt", "--tokenizer", "unicode", "bangla.pdf"]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.tokenizer.map(|t| t.name().to_string()), Some("unicode".into()));
    }
}
