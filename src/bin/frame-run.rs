//! CLI tool to transform JSON tables with frames-rs.
//!
//! Usage:
//!   frame-run <input.json> [--join other.json --on id --how inner]
//!             [--filter col=value]... [--select a,b] [--sort col [--reverse]]
//!             [--head n] [--distinct col] [-o output.json] [-v]
//!
//! Steps run in the order listed above. If no output file is specified,
//! writes to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use frames_rs::{Chain, FrameError, JoinKind, Value, read_json_file};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Load a JSON table, transform it, and print the result as JSON records.
#[derive(Parser)]
#[command(name = "frame-run")]
struct Cli {
    /// Input table (.json, array of rows or object of columns)
    input: PathBuf,

    /// Declared column list for the input (comma separated)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Second table to join with the input
    #[arg(long, requires = "on")]
    join: Option<PathBuf>,

    /// Join column
    #[arg(long)]
    on: Option<String>,

    /// Join kind: inner, full, outer, left or right
    #[arg(long, default_value = "full")]
    how: String,

    /// Keep rows where column equals value (`col=value`, repeatable)
    #[arg(long)]
    filter: Vec<String>,

    /// Keep only these columns (comma separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Sort by this column
    #[arg(long)]
    sort: Option<String>,

    /// Reverse the sorted order
    #[arg(long, requires = "sort")]
    reverse: bool,

    /// Keep only the first n rows
    #[arg(long)]
    head: Option<usize>,

    /// Print the distinct values of a column instead of rows
    #[arg(long)]
    distinct: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log each step on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parse `col=value`. The value is read as a JSON scalar when possible and
/// as a plain string otherwise.
fn parse_filter(text: &str) -> Option<(String, Value)> {
    let (column, raw) = text.split_once('=')?;
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|json| Value::from_json(&json).ok())
        .unwrap_or_else(|| Value::from(raw));
    Some((column.trim().to_string(), value))
}

fn run(cli: &Cli) -> Result<serde_json::Value, FrameError> {
    let mut df = read_json_file(&cli.input, cli.columns.as_deref())?;
    debug!(input = %cli.input.display(), rows = df.count(), "loaded");

    if let (Some(path), Some(on)) = (&cli.join, &cli.on) {
        let kind: JoinKind = cli.how.parse()?;
        let other = read_json_file(path, None)?;
        df = df.join(&other, on, kind)?;
    }

    if !cli.filter.is_empty() {
        let mut conditions = Vec::with_capacity(cli.filter.len());
        for text in &cli.filter {
            let condition = parse_filter(text).ok_or_else(|| {
                FrameError::input_type(format!("filter '{text}'"), &["col=value"])
            })?;
            conditions.push(condition);
        }
        let chain = conditions.iter().fold(Chain::new(), |chain, (column, value)| {
            chain.filter(move |row| row.get(column) == value)
        });
        let (filtered, trace) = df.chain_traced(&chain);
        debug!(?trace, "filtered");
        df = filtered;
    }

    if let Some(columns) = &cli.select {
        df = df.select(columns);
    }

    if let Some(column) = &cli.sort {
        df = df.sort_by(column, cli.reverse);
    }

    if let Some(n) = cli.head {
        df = df.head(n);
    }

    if let Some(column) = &cli.distinct {
        let values = df
            .distinct(column)
            .iter()
            .map(|v| v.to_json().unwrap_or(serde_json::Value::Null))
            .collect();
        return Ok(serde_json::Value::Array(values));
    }

    debug!(rows = df.count(), columns = df.columns().len(), "done");
    Ok(df.to_json())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match run(&cli) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("frame-run error: {e}");
            process::exit(1);
        }
    };

    let text = match serde_json::to_string_pretty(&result) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error encoding output: {e}");
            process::exit(1);
        }
    };

    if let Some(out_path) = &cli.output {
        if let Some(parent) = Path::new(out_path).parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating output directory for '{}'", out_path.display());
            process::exit(1);
        }
        if let Err(e) = fs::write(out_path, &text) {
            eprintln!("Error writing output file '{}': {e}", out_path.display());
            process::exit(1);
        }
    } else if let Err(e) = writeln!(io::stdout(), "{text}") {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }
}
