//! CLI argument definitions for csvgate.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use csvgate_report::ReportFormat;
use csvgate_runner::ThreadCount;
use csvgate_schema::DocumentFormat;

#[derive(Parser)]
#[command(
    name = "csvgate",
    version,
    about = "CSV quality gate - validate CSV files against declarative schemas",
    long_about = "Validate CSV files against YAML or JSON schemas.\n\n\
                  Schemas describe the CSV dialect, column presence and order, \
                  per-cell rules and per-column aggregate rules. Reports render \
                  as text, tables, or CI-native formats."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate CSV files against schemas.
    ValidateCsv(ValidateCsvArgs),

    /// Check schema files for authoring errors.
    ValidateSchema(ValidateSchemaArgs),

    /// Print a schema with presets resolved and every default filled in.
    DebugSchema(DebugSchemaArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Report format.
    #[arg(long = "report", short = 'r', value_enum, default_value = "table")]
    pub report: ReportArg,

    /// Stop at the first file with issues, and at the first failing stage within a file.
    #[arg(long = "quick", short = 'Q')]
    pub quick: bool,

    /// Worker threads: a positive number, or "auto" for one per CPU.
    #[arg(
        long = "parallel",
        short = 'P',
        value_name = "N|auto",
        num_args = 0..=1,
        default_value = "1",
        default_missing_value = "auto",
        value_parser = parse_threads
    )]
    pub parallel: ThreadCount,

    /// Print every resolved schema before validating.
    #[arg(long = "dump-schema")]
    pub dump_schema: bool,
}

#[derive(Args)]
pub struct ValidateCsvArgs {
    /// CSV files or glob patterns.
    #[arg(long = "csv", short = 'c', value_name = "GLOB", required = true, num_args = 1..)]
    pub csv: Vec<String>,

    /// Schema files or glob patterns.
    #[arg(long = "schema", short = 's', value_name = "GLOB", required = true, num_args = 1..)]
    pub schema: Vec<String>,

    /// Skip the schema lint that normally runs before CSV validation.
    #[arg(long = "skip-schema", short = 'S')]
    pub skip_schema: bool,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args)]
pub struct ValidateSchemaArgs {
    /// Schema files or glob patterns.
    #[arg(long = "schema", short = 's', value_name = "GLOB", required = true, num_args = 1..)]
    pub schema: Vec<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args)]
pub struct DebugSchemaArgs {
    /// Schema file to resolve.
    #[arg(long = "schema", short = 's', value_name = "FILE")]
    pub schema: PathBuf,

    /// Output document format.
    #[arg(long = "format", value_enum, default_value = "yaml")]
    pub format: DumpFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportArg {
    Text,
    Table,
    Github,
    Gitlab,
    Teamcity,
    Junit,
}

impl From<ReportArg> for ReportFormat {
    fn from(value: ReportArg) -> Self {
        match value {
            ReportArg::Text => ReportFormat::Text,
            ReportArg::Table => ReportFormat::Table,
            ReportArg::Github => ReportFormat::Github,
            ReportArg::Gitlab => ReportFormat::Gitlab,
            ReportArg::Teamcity => ReportFormat::Teamcity,
            ReportArg::Junit => ReportFormat::Junit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DumpFormatArg {
    Yaml,
    Json,
}

impl From<DumpFormatArg> for DocumentFormat {
    fn from(value: DumpFormatArg) -> Self {
        match value {
            DumpFormatArg::Yaml => DocumentFormat::Yaml,
            DumpFormatArg::Json => DocumentFormat::Json,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_threads(raw: &str) -> Result<ThreadCount, String> {
    raw.parse()
}
