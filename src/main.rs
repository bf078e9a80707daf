//! Snippet Console - interactive code console in the terminal
//!
//! Usage:
//!   snippet-console [OPTIONS]
//!
//! Examples:
//!   snippet-console                          # Type lines, `:submit` to run
//!   snippet-console --file snippet.txt       # Start from a file
//!   snippet-console --print-config           # Show effective configuration

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use snippet_console::{
    cli::{session, ArithmeticCompiler, StderrWarnings, TerminalPresentation, TerminalResultDisplay},
    Collaborators, ConsoleConfig, ConsoleController, ConsoleEvent,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Rows assumed when the terminal size is unknown
const FALLBACK_ROWS: u16 = 40;

/// Command-line arguments
#[derive(Parser)]
#[command(name = "snippet-console")]
#[command(about = "Interactive code console with highlighting and suggestions")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SNIPPET_CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Load this file into the document before reading input
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Start with suggestions turned off
    #[arg(long)]
    no_suggestions: bool,

    /// Start with auto-indent turned off
    #[arg(long)]
    no_auto_indent: bool,

    /// Never emit ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("snippet_console={}", level.as_str().to_lowercase()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs to stderr, console output on stdout
        .init();

    debug!("snippet-console v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config =
        ConsoleConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.no_suggestions {
        config.suggestions_enabled = false;
    }
    if args.no_auto_indent {
        config.auto_indent_enabled = false;
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let color = !args.no_color && std::io::stdout().is_tty();
    let line_height = config.line_height;
    let collaborators = Collaborators {
        presentation: Box::new(TerminalPresentation::new(std::io::stdout(), color)),
        compiler: Arc::new(ArithmeticCompiler),
        display: Box::new(TerminalResultDisplay::new(std::io::stdout(), args.json, color)),
        warnings: Box::new(StderrWarnings { color }),
    };
    let mut console = ConsoleController::new(config, collaborators)?;

    let rows = crossterm::terminal::size()
        .map(|(_, rows)| rows)
        .unwrap_or(FALLBACK_ROWS);
    console.handle(ConsoleEvent::Resized {
        viewport_height: f32::from(rows) * line_height,
    })?;

    if let Some(path) = args.file {
        debug!("Loading file: {}", path.display());
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        console.handle(ConsoleEvent::Input(content))?;
    }
    console.tick();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session::run(&mut console, stdin, &mut std::io::stdout()).await?;

    Ok(())
}
