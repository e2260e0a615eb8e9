//! deskdrop - run drop-target file operations from the command line.
//!
//! Usage:
//!   deskdrop copy PATH... --into DIR       Copy dropped items into DIR
//!   deskdrop move PATH... --into DIR       Move dropped items into DIR
//!   deskdrop shortcut PATH... --into DIR   Create shortcuts in DIR
//!   deskdrop --help                        Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use deskdrop_core::{BatchResult, DropRequest, OutcomeStatus, TransferMode};
use deskdrop_ops::{DropEvent, DropProcessor, start_drop};

#[derive(Parser)]
#[command(
    name = "deskdrop",
    version,
    about = "Copy, move or link dropped files into a folder",
    long_about = "deskdrop runs the file operations behind a desktop drop target.\n\n\
                  Every dropped path is handled on its own: items already in the \
                  destination folder are skipped and failures are reported without \
                  stopping the rest of the batch."
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy dropped items into the target folder
    Copy(DropArgs),

    /// Move dropped items into the target folder
    Move(DropArgs),

    /// Create shortcuts to dropped items in the target folder
    Shortcut(DropArgs),
}

#[derive(Args)]
struct DropArgs {
    /// Dropped files and directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Folder the items are dropped on
    #[arg(short = 't', long = "into")]
    target: PathBuf,

    /// Subfolder of the target that received the drop
    #[arg(short, long)]
    subfolder: Option<PathBuf>,

    /// Fail instead of replacing existing destinations
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (args, mode, as_shortcuts) = match cli.command {
        Command::Copy(args) => (args, TransferMode::Copy, false),
        Command::Move(args) => (args, TransferMode::Move, false),
        Command::Shortcut(args) => (args, TransferMode::Copy, true),
    };

    let request = build_request(args, mode, as_shortcuts)?;
    tracing::debug!(?request, "built drop request");
    let result = run_drop(request, cli.format)?;

    match cli.format {
        OutputFormat::Text => print_result(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_request(args: DropArgs, mode: TransferMode, as_shortcuts: bool) -> Result<DropRequest> {
    let paths = args
        .paths
        .iter()
        .map(|p| absolute(p.as_path()))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = DropRequest::builder();
    builder
        .paths(paths)
        .target_folder(absolute(&args.target)?)
        .mode(mode)
        .as_shortcuts(as_shortcuts)
        .overwrite(!args.no_overwrite);
    if let Some(ref sub) = args.subfolder {
        builder.subfolder(absolute(sub)?);
    }

    builder.build().context("Invalid drop request")
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

/// Run the batch on the blocking pool, reporting each item as it finishes.
fn run_drop(request: DropRequest, format: OutputFormat) -> Result<BatchResult> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let processor = Arc::new(DropProcessor::new());

    runtime.block_on(async move {
        let mut rx = start_drop(processor, request);
        let mut result = None;

        while let Some(event) = rx.recv().await {
            match event {
                DropEvent::Progress(progress) => {
                    if let (OutputFormat::Text, Some(last)) = (format, &progress.last) {
                        eprintln!(
                            "[{}/{}] {}",
                            progress.items_completed,
                            progress.items_total,
                            last.source.display()
                        );
                    }
                }
                DropEvent::Complete(complete) => result = Some(complete),
            }
        }

        result.ok_or_else(|| color_eyre::eyre::eyre!("Drop batch ended without a result"))
    })
}

fn print_result(result: &BatchResult) {
    println!();
    for outcome in &result.outcomes {
        let source = outcome.source.display();
        match outcome.status {
            OutcomeStatus::Succeeded => match outcome.destination {
                Some(ref dest) => println!(" ✓ {} -> {}", source, dest.display()),
                None => println!(" ✓ {}", source),
            },
            OutcomeStatus::Skipped => {
                println!(" - {} (already in destination folder)", source);
            }
            OutcomeStatus::Failed(ref reason) => println!(" ✗ {}: {}", source, reason),
        }
    }
    println!("{}", "─".repeat(60));
    println!(" {}", result.summary());
}
