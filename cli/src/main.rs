//! pdfannots CLI - extract PDF annotations grouped by section heading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfannots::render::{self, JsonFormat, OutputFormat};
use pdfannots::{
    detect_headings, extract_file_with_options, sample, ExtractOptions, Extraction,
    HeadingStrategy, PageSelection,
};

#[derive(Parser)]
#[command(name = "pdfannots")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract PDF comments and highlights, grouped by the section heading they fall under",
    long_about = None
)]
struct Cli {
    /// Input PDF file (prints a table and saves <FILE>_annotations.csv)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract annotations in a chosen format
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pages whose annotations are reported (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Heading detection strategy
        #[arg(long, value_enum, default_value = "auto")]
        headings: HeadingMode,

        /// Fail on unreadable pages instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the detected section headings
    Headings {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Heading detection strategy
        #[arg(long, value_enum, default_value = "auto")]
        headings: HeadingMode,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample annotated PDF
    Sample {
        /// Output PDF file
        #[arg(value_name = "OUTPUT", default_value = "sample_annotated.pdf")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Aligned text table
    Table,
    /// Comma-separated values
    Csv,
    /// JSON document
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Table => OutputFormat::Table,
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum HeadingMode {
    /// Outline when declared, font styles otherwise
    Auto,
    /// Declared outline only
    Outline,
    /// Font style heuristic only
    Style,
}

impl From<HeadingMode> for HeadingStrategy {
    fn from(mode: HeadingMode) -> Self {
        match mode {
            HeadingMode::Auto => HeadingStrategy::Auto,
            HeadingMode::Outline => HeadingStrategy::Outline,
            HeadingMode::Style => HeadingStrategy::Style,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            format,
            output,
            pages,
            headings,
            strict,
            compact,
        }) => cmd_extract(
            &input,
            format,
            output.as_deref(),
            pages.as_deref(),
            headings,
            strict,
            compact,
        ),
        Some(Commands::Headings {
            input,
            headings,
            json,
        }) => cmd_headings(&input, headings, json),
        Some(Commands::Sample { output }) => cmd_sample(&output),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: report and save CSV if input is provided
            if let Some(input) = cli.input {
                cmd_report(&input)
            } else {
                println!("{}", "Usage: pdfannots <FILE>".yellow());
                println!("       pdfannots --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(
    pages: Option<&str>,
    headings: HeadingMode,
    strict: bool,
) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    // Lenient by default so one broken page does not hide the rest
    let mut options = ExtractOptions::new()
        .with_heading_strategy(headings.into())
        .with_pages(page_selection);
    if !strict {
        options = options.lenient();
    }
    Ok(options)
}

/// Run an extraction behind a spinner.
fn extract_with_spinner(input: &Path, options: ExtractOptions) -> pdfannots::Result<Extraction> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Reading {}...", input.display()));

    log::debug!("Extracting {} with {:?}", input.display(), options);
    let result = extract_file_with_options(input, options);
    pb.finish_and_clear();
    if let Ok(extraction) = &result {
        log::info!(
            "{} annotations, {} headings ({:?}) across {} pages",
            extraction.len(),
            extraction.headings.len(),
            extraction.heading_source,
            extraction.page_count
        );
    }
    result
}

fn print_notes(extraction: &Extraction) {
    for note in &extraction.notes {
        if note != pdfannots::NO_ANNOTATIONS_NOTE {
            eprintln!("{} {}", "note:".dimmed(), note.dimmed());
        }
    }
}

fn print_empty(input: &Path) {
    println!(
        "{}",
        format!(
            "No text annotations or highlights were found in '{}'.",
            input.display()
        )
        .yellow()
    );
}

fn cmd_report(input: &Path) -> CliResult {
    let options = build_options(None, HeadingMode::Auto, false)?;
    let extraction = extract_with_spinner(input, options)?;
    print_notes(&extraction);

    if extraction.is_empty() {
        print_empty(input);
        return Ok(());
    }

    println!(
        "\n{}",
        format!("--- Found {} Annotations ---", extraction.len())
            .green()
            .bold()
    );
    println!("{}", render::to_table(&extraction.records));

    let csv_path = render::default_csv_path(input);
    render::write_csv(&extraction.records, &csv_path)?;
    println!("{} {}", "Saved to".green(), csv_path.display());

    Ok(())
}

fn cmd_extract(
    input: &Path,
    format: Format,
    output: Option<&Path>,
    pages: Option<&str>,
    headings: HeadingMode,
    strict: bool,
    compact: bool,
) -> CliResult {
    let options = build_options(pages, headings, strict)?;
    let extraction = extract_with_spinner(input, options)?;
    print_notes(&extraction);

    // JSON always carries the (possibly empty) record list
    if extraction.is_empty() && format != Format::Json {
        print_empty(input);
        return Ok(());
    }

    let json_format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let content = render::render(&extraction, format.into(), json_format)?;

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!(
            "{} {} ({} annotations)",
            "Saved to".green(),
            path.display(),
            extraction.len()
        );
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

fn cmd_headings(input: &Path, headings: HeadingMode, json: bool) -> CliResult {
    let options = build_options(None, headings, false)?;
    let outline = detect_headings(input, &options)?;

    if json {
        println!(
            "{}",
            render::headings_to_json(&outline, JsonFormat::Pretty)?
        );
        return Ok(());
    }

    println!(
        "{} ({})",
        "Detected Headings".cyan().bold(),
        outline.source
    );
    println!("{}", "─".repeat(40).dimmed());

    for note in &outline.notes {
        println!("{} {}", "note:".dimmed(), note.dimmed());
    }
    if outline.is_empty() {
        println!("{}", "No headings identified".yellow());
        return Ok(());
    }

    for heading in &outline.headings {
        println!(
            "{:>4}  {}  {}",
            format!("p.{}", heading.page + 1).dimmed(),
            heading.text.bold(),
            format!("(level {}, y {:.1})", heading.level, heading.y).dimmed()
        );
    }

    Ok(())
}

fn cmd_sample(output: &Path) -> CliResult {
    sample::write_sample(output)?;
    println!("{} {}", "Sample written to".green(), output.display());
    println!(
        "Try: {}",
        format!("pdfannots {}", output.display()).cyan()
    );
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfannots".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF annotation extraction tool");
    println!();
    println!("License: MIT");
}
