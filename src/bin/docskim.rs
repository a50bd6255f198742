//! CLI binary for docskim.
//!
//! A thin shim over the library crate that maps subcommands and flags to the
//! config builders and prints reports.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docskim::pipeline::input::has_pdf_extension;
use docskim::render::{
    render_extraction, render_fetch, render_pdf_info, render_report, render_url_inspection,
};
use docskim::{
    analyze_path, analyze_pdf, extract_pdf, fetch_url, inspect_url, pdf_info, AnalysisConfig,
    ExtractConfig, ExtractProgressCallback, FetchConfig, FormatHint, PageSelection,
    ProgressCallback, Window,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for PDF page extraction: a bar sized once the
/// selection is known, cleared when extraction ends.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, selected_pages: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        self.bar.set_length(selected_pages as u64);
        self.bar.set_prefix("Extracting");
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, selected_pages: usize, emitted_pages: usize) {
        self.bar.finish_and_clear();
        if emitted_pages < selected_pages {
            eprintln!(
                "{} {}/{} pages extracted (character limit reached)",
                yellow("⚠"),
                emitted_pages,
                selected_pages
            );
        } else {
            eprintln!("{} {} pages extracted", green("✔"), emitted_pages);
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Structure report for a text file
  docskim structure notes.md

  # Force a format and emit JSON
  docskim structure --format plain --json report.txt

  # PDF outline and page sampling plan
  docskim structure book.pdf

  # Extract pages 1-10 and 50-60 of a PDF, at most 5000 characters
  docskim pdf book.pdf --pages 1-10,50-60 --max-chars 5000

  # PDF metadata and suggested page windows
  docskim pdf book.pdf --info

  # Fetch a page as text, skipping the first 2000 characters
  docskim fetch https://example.org/article --start 2000

  # Length of a page and suggested character windows
  docskim fetch https://example.org/article --info

FORMATS:
  markdown           # / ## / ### headings
  structured_markup  \chapter{..} \section{..} \subsection{..}
  numbered_book      Chapter 1, 1. Title, 1.2 Title
  plain              UPPER CASE lines and Label: lines

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to libpdfium (the file or its directory)
  RUST_LOG           Log filter, overrides --verbose / --quiet
"#;

/// Discover document structure and plan partial reads.
#[derive(Parser, Debug)]
#[command(
    name = "docskim",
    version,
    about = "Discover document structure and plan which parts to read",
    long_about = "Skim large text files, PDFs and web pages: detect headers and sections, \
then recommend beginning, quartile, end and chunk windows to read instead of the whole document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCSKIM_VERBOSE")]
    verbose: bool,

    /// Suppress everything on stderr except errors.
    #[arg(short, long, global = true, env = "DOCSKIM_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse headers, sections and sampling windows of a file.
    Structure(StructureArgs),
    /// Extract text from selected PDF pages.
    Pdf(PdfArgs),
    /// Fetch a URL as plain text.
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct StructureArgs {
    /// Text or PDF file to analyse.
    path: PathBuf,

    /// Format: auto, markdown, structured_markup, numbered_book, plain.
    #[arg(short, long, env = "DOCSKIM_FORMAT", default_value = "auto")]
    format: String,

    /// Output the report as JSON.
    #[arg(short, long, env = "DOCSKIM_JSON")]
    json: bool,

    /// Number of chunks in the even division.
    #[arg(long, env = "DOCSKIM_CHUNKS", default_value_t = docskim::DEFAULT_CHUNK_COUNT)]
    chunks: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCSKIM_PASSWORD")]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct PdfArgs {
    /// PDF file.
    path: PathBuf,

    /// Page ranges, e.g. 1-10,50-60,100. Default: first 10 pages.
    #[arg(short, long, env = "DOCSKIM_PAGES")]
    pages: Option<String>,

    /// Print metadata and a page sampling plan instead of text.
    #[arg(short, long)]
    info: bool,

    /// Approximate output budget in characters.
    #[arg(short, long, env = "DOCSKIM_MAX_CHARS", default_value_t = 10_000)]
    max_chars: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCSKIM_PASSWORD")]
    password: Option<String>,

    /// Output JSON.
    #[arg(short, long, env = "DOCSKIM_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "DOCSKIM_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// http:// or https:// URL.
    url: String,

    /// Print URL info and a character sampling plan instead of content.
    #[arg(short, long)]
    info: bool,

    /// Maximum characters of content to print.
    #[arg(short, long, env = "DOCSKIM_MAX_CHARS", default_value_t = 10_000)]
    max_chars: usize,

    /// Character offset to start from.
    #[arg(short, long, default_value_t = 0)]
    start: usize,

    /// GET timeout in seconds.
    #[arg(long, env = "DOCSKIM_FETCH_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Do not retry with curl when the HTTP client fails.
    #[arg(long, env = "DOCSKIM_NO_CURL")]
    no_curl: bool,

    /// Output JSON.
    #[arg(short, long, env = "DOCSKIM_JSON")]
    json: bool,
}

impl Command {
    fn json(&self) -> bool {
        match self {
            Command::Structure(a) => a.json,
            Command::Pdf(a) => a.json,
            Command::Fetch(a) => a.json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let json = cli.command.json();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("{} {:#}", red("ERROR:"), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Structure(args) => structure(args).await,
        Command::Pdf(args) => pdf(args, cli.quiet).await,
        Command::Fetch(args) => fetch(args, cli.quiet).await,
    }
}

// ── structure ────────────────────────────────────────────────────────────────

async fn structure(args: StructureArgs) -> Result<()> {
    let hint: FormatHint = args.format.parse()?;
    let config = AnalysisConfig::builder()
        .format_hint(hint)
        .chunk_count(args.chunks)
        .build()
        .context("Invalid configuration")?;

    let report = if has_pdf_extension(&args.path) {
        analyze_pdf(&args.path, &config, args.password.as_deref()).await
    } else {
        analyze_path(&args.path, &config).await
    }
    .with_context(|| format!("Failed to analyse {}", args.path.display()))?;

    if args.json {
        let json = report
            .to_json(&config.limits)
            .context("Failed to serialise report")?;
        println!("{json}");
    } else {
        print!("{}", render_report(&report, &config.limits));
    }
    Ok(())
}

// ── pdf ──────────────────────────────────────────────────────────────────────

async fn pdf(args: PdfArgs, quiet: bool) -> Result<()> {
    if args.info {
        let info = pdf_info(&args.path, args.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise metadata")?
            );
        } else {
            print!("{}", render_pdf_info(&info));
        }
        return Ok(());
    }

    let selection = match args.pages {
        Some(ref arg) => {
            let (ranges, rejected) = parse_page_ranges(arg);
            if !quiet {
                for part in &rejected {
                    eprintln!("{} Ignoring invalid page range '{}'", yellow("warning:"), part);
                }
            }
            if ranges.is_empty() {
                PageSelection::default()
            } else {
                PageSelection::Ranges(ranges)
            }
        }
        None => PageSelection::default(),
    };

    let mut builder = ExtractConfig::builder()
        .pages(selection)
        .max_chars(args.max_chars);
    if let Some(ref pwd) = args.password {
        builder = builder.password(pwd.clone());
    }
    if !quiet && !args.no_progress && !args.json {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    let extraction = extract_pdf(&args.path, &config)
        .await
        .with_context(|| format!("Failed to extract {}", args.path.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&extraction).context("Failed to serialise extraction")?
        );
    } else {
        print!("{}", render_extraction(&extraction));
    }
    Ok(())
}

/// Parse `1-10,50-60,7` into windows. Parts that are not a page or an
/// ascending `a-b` range of 1-indexed pages are returned separately.
fn parse_page_ranges(arg: &str) -> (Vec<Window>, Vec<String>) {
    let mut ranges = Vec::new();
    let mut rejected = Vec::new();

    for part in arg.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let parsed = match part.split_once('-') {
            Some((a, b)) => a
                .trim()
                .parse::<usize>()
                .ok()
                .zip(b.trim().parse::<usize>().ok()),
            None => part.parse::<usize>().ok().map(|p| (p, p)),
        };
        match parsed {
            Some((start, end)) if start >= 1 && start <= end => {
                ranges.push(Window::new(start, end))
            }
            _ => rejected.push(part.to_string()),
        }
    }
    (ranges, rejected)
}

// ── fetch ────────────────────────────────────────────────────────────────────

async fn fetch(args: FetchArgs, quiet: bool) -> Result<()> {
    let config = FetchConfig::builder()
        .max_chars(args.max_chars)
        .start(args.start)
        .get_timeout_secs(args.timeout)
        .curl_fallback(!args.no_curl)
        .build()
        .context("Invalid configuration")?;

    let bar = (!quiet && !args.json).then(|| spinner(format!("Fetching {}…", args.url)));

    let result = if args.info {
        inspect_url(&args.url, &config).await.map(|insp| {
            if args.json {
                serde_json::to_string_pretty(&insp).map_err(anyhow::Error::from)
            } else {
                Ok(render_url_inspection(&insp))
            }
        })
    } else {
        fetch_url(&args.url, &config).await.map(|fetched| {
            if args.json {
                serde_json::to_string_pretty(&fetched).map_err(anyhow::Error::from)
            } else {
                Ok(render_fetch(&fetched))
            }
        })
    };

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let output = result
        .with_context(|| format!("Failed to fetch {}", args.url))?
        .context("Failed to serialise output")?;
    if args.json {
        println!("{output}");
    } else {
        print!("{output}");
        if !quiet {
            eprintln!("{}", dim(&format!("fetched {}", args.url)));
        }
    }
    Ok(())
}
