//! Command-line interface for serp-pixel.
//!
//! Single-record checks take `--title`/`--desc`; the `batch` subcommand
//! checks a delimited sheet export column by column.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use crate::batch::BatchRunner;
use crate::config::SerpConfig;
use crate::limits::FieldKind;
use crate::report::{BatchSummary, format_measurement, format_summary};
use crate::sheet::{DelimitedSheet, Delimiter, SheetColumns};

/// serp-pixel - SERP title and description pixel-width checker
#[derive(Parser)]
#[command(name = "serp-pixel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Meta title to measure (20px, limit 580px)
    #[arg(long)]
    pub title: Option<String>,

    /// Meta description to measure (14px, limit 990px)
    #[arg(long)]
    pub desc: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log verbosity (overrides RUST_LOG)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every row of a tab- or comma-separated sheet export
    Batch {
        /// Path to the sheet export
        #[arg(long)]
        file: PathBuf,

        /// Column letter for titles (e.g. E)
        #[arg(long)]
        title_col: Option<String>,

        /// Column letter for descriptions (e.g. H)
        #[arg(long)]
        desc_col: Option<String>,

        /// First data row
        #[arg(long, default_value_t = 2)]
        start_row: usize,

        /// Field separator
        #[arg(long, value_enum, default_value_t = Delimiter::Tab)]
        delimiter: Delimiter,
    },
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Route `log` output to stderr. `--log-level` wins over `RUST_LOG`, which
/// wins over the default of `warn`.
pub fn init_logging(level: Option<LogLevel>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level.to_level_filter());
    }
    builder.target(env_logger::Target::Stderr);
    // A logger may already be installed when embedded in another program
    let _ = builder.try_init();
}

/// Run the parsed command line. Returns the process exit code.
pub fn execute(cli: Cli) -> Result<i32> {
    let config = SerpConfig::from_env();
    match cli.command {
        Some(Commands::Batch {
            file,
            title_col,
            desc_col,
            start_row,
            delimiter,
        }) => {
            let columns = SheetColumns::from_letters(title_col.as_deref(), desc_col.as_deref())?;
            if columns.is_empty() {
                bail!("specify at least one of --title-col or --desc-col");
            }
            run_batch(&config, &file, columns, start_row, delimiter, cli.json)?;
            Ok(0)
        }
        None if cli.title.is_some() || cli.desc.is_some() => {
            run_single(&config, cli.title.as_deref(), cli.desc.as_deref(), cli.json)?;
            Ok(0)
        }
        None => {
            Cli::command().print_help()?;
            Ok(1)
        }
    }
}

fn run_single(
    config: &SerpConfig,
    title: Option<&str>,
    desc: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut measurer = config.measurer();
    let mut results = Vec::new();
    if let Some(text) = title {
        results.push(
            measurer
                .measure(text, FieldKind::Title)
                .context("Failed to measure title")?,
        );
    }
    if let Some(text) = desc {
        results.push(
            measurer
                .measure(text, FieldKind::Description)
                .context("Failed to measure description")?,
        );
    }

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        for result in &results {
            writeln!(out, "{}\n", format_measurement(result))?;
        }
    }
    Ok(())
}

fn run_batch(
    config: &SerpConfig,
    file: &Path,
    columns: SheetColumns,
    start_row: usize,
    delimiter: Delimiter,
    json: bool,
) -> Result<()> {
    let sheet = DelimitedSheet::open(file, delimiter, columns, start_row)?;
    let mut runner = BatchRunner::new(config.measurer());

    let mut summary = BatchSummary::new();
    for row in runner.run(sheet) {
        summary.record(&row);
    }

    let mut fields = Vec::new();
    if columns.title.is_some() {
        fields.push(FieldKind::Title);
    }
    if columns.description.is_some() {
        fields.push(FieldKind::Description);
    }

    let mut out = std::io::stdout().lock();
    if json {
        let mut output = serde_json::Map::new();
        output.insert("file".into(), file.display().to_string().into());
        for kind in &fields {
            output.insert(
                kind.name().into(),
                serde_json::to_value(summary.tally(*kind))?,
            );
        }
        output.insert(
            "failed_rows".into(),
            serde_json::to_value(&summary.failed_rows)?,
        );
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        writeln!(out, "File:  {}\n", file.display())?;
        write!(out, "{}", format_summary(&summary, &fields))?;
    }
    Ok(())
}
