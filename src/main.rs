//! bm2epub - Markdown to EPUB converter

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use bm2epub::{
    Book, ChapterRule, ConvertConfig, EmphasisPolicy, EpubConfig, EpubExporter, Error, Metadata,
    NavPoint, convert_file, read_package,
};

#[derive(Parser)]
#[command(name = "bm2epub")]
#[command(version, about = "Convert a Markdown document to EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    bm2epub notes.md                Write notes.epub in the current directory
    bm2epub notes.md -o out.epub    Choose the output path
    bm2epub -i notes.epub           Show package metadata")]
struct Cli {
    /// Input file (Markdown, or EPUB with --info)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: <input stem>.epub in the current directory)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show package metadata of an existing EPUB instead of converting
    #[arg(short, long, conflicts_with = "output")]
    info: bool,

    /// Print a JSON summary of the conversion
    #[arg(long)]
    json: bool,

    /// Treat any `*<digit>` line as a chapter marker, not only `*<digit>*`
    #[arg(long)]
    loose_chapters: bool,

    /// Leave emphasis open at end of line instead of closing it
    #[arg(long)]
    leave_emphasis_open: bool,

    /// Package language
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Deflate compression level (0-9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression: Option<u32>,

    /// Suppress output messages
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct ConversionSummary<'a> {
    output: &'a Path,
    metadata: &'a Metadata,
    chapters: &'a [NavPoint],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        convert(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    // Ignore the error if a logger is already installed.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn convert(cli: &Cli) -> Result<(), Error> {
    let output = match &cli.output {
        Some(path) => path.clone(),
        None => default_output(&cli.input)?,
    };

    let config = ConvertConfig::default()
        .with_chapter_rule(if cli.loose_chapters {
            ChapterRule::Loose
        } else {
            ChapterRule::Strict
        })
        .with_emphasis(if cli.leave_emphasis_open {
            EmphasisPolicy::LeaveOpen
        } else {
            EmphasisPolicy::CloseAtEndOfLine
        });
    let book = convert_file(&cli.input, config)?;

    let mut epub_config = EpubConfig::default().with_language(cli.language.as_str());
    if let Some(level) = cli.compression {
        epub_config = epub_config.with_compression_level(level);
    }
    EpubExporter::new()
        .with_config(epub_config)
        .write_to_path(&book, &output)?;

    if cli.json {
        print_summary(&output, &book)?;
    } else if !cli.quiet {
        println!("Generated: {}", output.display());
    }
    Ok(())
}

/// `<input stem>.epub` in the current directory.
fn default_output(input: &Path) -> Result<PathBuf, Error> {
    let stem = input.file_stem().ok_or_else(|| {
        Error::InvalidInvocation(format!(
            "cannot derive an output name from {}",
            input.display()
        ))
    })?;
    let mut name = stem.to_os_string();
    name.push(".epub");
    Ok(PathBuf::from(name))
}

fn print_summary(output: &Path, book: &Book) -> Result<(), Error> {
    let summary = ConversionSummary {
        output,
        metadata: &book.metadata,
        chapters: &book.nav_points,
    };
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    println!("{json}");
    Ok(())
}

fn show_info(path: &Path) -> Result<(), Error> {
    let info = read_package(path)?;

    let meta = &info.metadata;
    println!("File: {}", path.display());
    println!("Title: {}", meta.title);
    println!("Author: {}", meta.author);
    if !meta.year.is_empty() {
        println!("Year: {}", meta.year);
    }
    if !info.language.is_empty() {
        println!("Language: {}", info.language);
    }
    println!("Identifier: {}", meta.identifier);
    println!("Chapters: {}", info.nav_points.len());
    for point in &info.nav_points {
        println!("  {}. {} -> {}", point.play_order, point.label, point.href);
    }

    Ok(())
}
