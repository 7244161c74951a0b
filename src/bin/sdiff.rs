//! sdiff - structural diff of two JSON/YAML documents.
//!
//! Prints the diff and exits 0 when the documents are equal, 1 when they
//! differ and 2 on errors.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use structdiff::diff::{render, Diff, Differ, RenderError};
use structdiff::value::{self, Value};

#[derive(Debug, Parser)]
#[command(name = "sdiff", version, about = "Structural diff of two JSON/YAML documents")]
struct Cli {
    /// Left-hand document
    lhs: PathBuf,

    /// Right-hand document
    rhs: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Prefix for every JSON line after the first
    #[arg(long, default_value = "")]
    prefix: String,

    /// Indentation unit for JSON output
    #[arg(long, default_value = "  ")]
    indent: String,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sdiff=warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the documents are equal.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let lhs = load(&cli.lhs)?;
    let rhs = load(&cli.rhs)?;

    let outcome = Differ::new().diff(&lhs, &rhs);
    let equal = matches!(outcome, Ok(Diff::Equal));

    let text = match render(outcome, |d| encode(cli, d)) {
        Ok(text) => text,
        Err(RenderError::Diff { text, source }) => {
            warn!(error = %source, "documents are not comparable");
            text
        }
        Err(e) => return Err(e.into()),
    };

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };
    writeln!(output, "{}", text.trim_end())?;

    debug!(equal, "diff complete");
    Ok(equal)
}

fn load(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    debug!(path = %path.display(), "loading document");
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    // YAML is a superset of JSON, so one parser covers both.
    let parsed = value::from_yaml(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;
    Ok(parsed)
}

fn encode(cli: &Cli, diff: &Diff) -> Result<String, RenderError> {
    Ok(match cli.format {
        Format::Yaml => diff.to_yaml()?,
        Format::Json if cli.compact => diff.to_json()?,
        Format::Json => diff.to_json_indented(&cli.prefix, &cli.indent)?,
    })
}
