//! Command-line interface for folderscan.
//!
//! Scans the given paths and writes a single document with the directory
//! trees and the contents of every included file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use folderscan::{
    BinaryDetection, DocumentMode, Export, OutputFormat, ScanBuilder, ScanError, TracingObserver,
    assemble, classify, export, parse_depth_directive, scan,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// folderscan — flatten folders and files into one reviewable document
#[derive(Parser)]
#[command(name = "folderscan", version, about, long_about = None)]
struct Cli {
    /// Paths to scan; a trailing root+N limits the depth, e.g. ./src/root+0
    #[arg(short, long, required = true, num_args = 1..)]
    paths: Vec<String>,

    /// Path prefixes to exclude, relative to each root or absolute
    #[arg(short, long = "exclude", num_args = 1..)]
    exclude: Vec<String>,

    /// Substrings that exclude any path containing them
    #[arg(long = "exclude-patterns", visible_alias = "ep", num_args = 1..)]
    exclude_patterns: Vec<String>,

    /// Additional directory names to exclude
    #[arg(long = "exclude-dir", num_args = 1..)]
    exclude_dirs: Vec<String>,

    /// Additional file names or globs to exclude
    #[arg(long = "exclude-file", num_args = 1..)]
    exclude_files: Vec<String>,

    /// Do not apply the built-in directory and file exclusions
    #[arg(long)]
    no_default_excludes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Txt)]
    format: Format,

    /// Output file path, or - for stdout
    #[arg(short, long, default_value = "scan_output.txt")]
    output: PathBuf,

    /// Depth limit (root+N) for paths without their own
    #[arg(short, long, value_parser = parse_depth)]
    depth: Option<usize>,

    /// Document contents
    #[arg(long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Binary detection strategy
    #[arg(long, default_value = "none", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// File size limit in bytes (larger files have their content omitted)
    #[arg(long)]
    file_size_limit: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Txt,
    Md,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    Full,
    Summary,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_depth(s: &str) -> Result<usize, String> {
    parse_depth_directive(s).map_err(|e| e.to_string())
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

fn init_tracing(verbose: bool, format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose, cli.log_format) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error during execution: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    tracing::debug!("Raw paths received: {:?}", cli.paths);
    let classified = match classify(&cli.paths, &TracingObserver) {
        Ok(classified) => classified,
        Err(ScanError::NoValidPaths) => {
            tracing::warn!("No valid paths found!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Final normalized paths: {:?}", classified.paths);

    let format = match cli.format {
        Format::Txt => OutputFormat::Text,
        Format::Md => OutputFormat::Markdown,
        Format::Json => OutputFormat::Json,
    };
    let mode = match cli.mode {
        Mode::Full => DocumentMode::Full,
        Mode::Summary => DocumentMode::Summary,
    };
    let mut builder = ScanBuilder::new();
    if cli.no_default_excludes {
        builder = builder.no_default_excludes();
    }
    let spec = builder
        .classified(classified)
        .default_depth(cli.depth)
        .exclude_paths(&cli.exclude)
        .exclude_substrings(cli.exclude_patterns)
        .exclude_dir_names(cli.exclude_dirs)
        .exclude_file_patterns(cli.exclude_files)
        .output_format(format)
        .mode(mode)
        .binary_detection(cli.binary_detection)
        .file_size_limit(cli.file_size_limit)
        .build();

    if cli.output.as_os_str() == "-" {
        let snapshot = scan(&spec)?;
        if snapshot.is_empty() {
            tracing::warn!("No files were found that match your criteria.");
            return Ok(());
        }
        let document = assemble(&snapshot, spec.output_format, spec.mode)?;
        io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .context("failed to write to stdout")?;
        return Ok(());
    }

    match export(&spec, &cli.output, Arc::new(TracingObserver))? {
        Export::Written { path, files, words } => {
            tracing::info!("Analysis file saved: {}", path.display());
            tracing::info!(
                "Analysis complete. Found {} files with {} words in total.",
                files,
                words
            );
        }
        Export::Empty => tracing::warn!("No files were found that match your criteria."),
    }
    Ok(())
}
