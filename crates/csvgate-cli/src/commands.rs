use std::io::{self, IsTerminal};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use csvgate_ingest::find_files;
use csvgate_model::IssueSuite;
use csvgate_report::{ReportFormat, render, render_all};
use csvgate_runner::TaskRunner;
use csvgate_schema::{DocumentFormat, dump_schema, load_schema};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, info_span, warn};

use csvgate_cli::pairing::{SchemaEntry, pair_files};
use csvgate_cli::tasks::{
    VALIDATE_CSV, VALIDATE_SCHEMA, bootstrap, csv_args, failure_suite, operations, pair_key,
};

use crate::cli::{DebugSchemaArgs, RunArgs, ValidateCsvArgs, ValidateSchemaArgs};

/// Issue counts collected over one command run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<(String, usize)>,
    pub schemas_found: usize,
    pub stopped_early: bool,
}

impl RunSummary {
    fn new(schemas_found: usize) -> Self {
        Self {
            schemas_found,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.files.iter().map(|(_, count)| count).sum()
    }

    pub fn exit_code(&self) -> i32 {
        if self.schemas_found == 0 || self.total() > 0 {
            1
        } else {
            0
        }
    }
}

/// Prints suites as they arrive, or collects them for single-document formats.
struct Reporter {
    format: ReportFormat,
    held: Vec<IssueSuite>,
}

impl Reporter {
    fn new(format: ReportFormat) -> Self {
        Self {
            format,
            held: Vec::new(),
        }
    }

    fn emit(&mut self, suite: IssueSuite) {
        if !self.format.is_streaming() {
            self.held.push(suite);
            return;
        }
        match render(&suite, self.format) {
            Ok(text) => print!("{text}"),
            Err(err) => error!(%err, "failed to render report"),
        }
    }

    fn finish(self) -> Result<()> {
        if !self.format.is_streaming() {
            let text = render_all(&self.held, self.format)
                .with_context(|| format!("render {} report", self.format))?;
            print!("{text}");
        }
        Ok(())
    }
}

struct Job {
    key: String,
    operation: &'static str,
    args: Vec<String>,
}

pub fn run_validate_csv(args: &ValidateCsvArgs) -> Result<RunSummary> {
    let csvs = find_files(&args.csv).context("discover CSV files")?;
    let schemas = find_files(&args.schema).context("discover schema files")?;
    let mut summary = RunSummary::new(schemas.len());
    if schemas.is_empty() {
        warn!("no schema files found");
        return Ok(summary);
    }
    let mut reporter = Reporter::new(args.run.report.into());

    if !args.skip_schema {
        execute(schema_jobs(&schemas), &args.run, &mut reporter, &mut summary)?;
        if summary.stopped_early {
            reporter.finish()?;
            return Ok(summary);
        }
    }
    if args.run.dump_schema {
        dump_schemas(&schemas);
    }

    let entries: Vec<SchemaEntry> = schemas.iter().map(|path| SchemaEntry::load(path)).collect();
    let pairing = pair_files(&csvs, &entries);
    if csvs.is_empty() {
        warn!("no CSV files found");
    }
    info!(
        csv_files = csvs.len(),
        schemas = schemas.len(),
        pairs = pairing.pairs.len(),
        unpaired = pairing.unpaired.len(),
        "validating"
    );

    let jobs: Vec<Job> = pairing
        .pairs
        .iter()
        .map(|(csv, schema)| Job {
            key: pair_key(csv, schema),
            operation: VALIDATE_CSV,
            args: csv_args(csv, schema, args.run.quick),
        })
        .collect();
    execute(jobs, &args.run, &mut reporter, &mut summary)?;
    reporter.finish()?;
    Ok(summary)
}

pub fn run_validate_schema(args: &ValidateSchemaArgs) -> Result<RunSummary> {
    let schemas = find_files(&args.schema).context("discover schema files")?;
    let mut summary = RunSummary::new(schemas.len());
    if schemas.is_empty() {
        warn!("no schema files found");
        return Ok(summary);
    }
    if args.run.dump_schema {
        dump_schemas(&schemas);
    }
    let mut reporter = Reporter::new(args.run.report.into());
    execute(schema_jobs(&schemas), &args.run, &mut reporter, &mut summary)?;
    reporter.finish()?;
    Ok(summary)
}

pub fn run_debug_schema(args: &DebugSchemaArgs) -> Result<()> {
    let schema = load_schema(&args.schema)
        .with_context(|| format!("load schema {}", args.schema.display()))?;
    let text = dump_schema(&schema, args.format.into()).context("serialize schema")?;
    print!("{text}");
    Ok(())
}

fn schema_jobs(schemas: &[PathBuf]) -> Vec<Job> {
    schemas
        .iter()
        .map(|path| Job {
            key: path.display().to_string(),
            operation: VALIDATE_SCHEMA,
            args: vec![path.display().to_string()],
        })
        .collect()
}

fn dump_schemas(schemas: &[PathBuf]) {
    for path in schemas {
        match load_schema(path).and_then(|schema| dump_schema(&schema, DocumentFormat::Yaml)) {
            Ok(text) => println!("# {}\n{text}", path.display()),
            Err(err) => warn!(schema = %path.display(), %err, "cannot dump schema"),
        }
    }
}

fn execute(
    jobs: Vec<Job>,
    run: &RunArgs,
    reporter: &mut Reporter,
    summary: &mut RunSummary,
) -> Result<()> {
    if jobs.is_empty() {
        return Ok(());
    }
    let span = info_span!("execute", tasks = jobs.len(), threads = %run.parallel);
    let _guard = span.enter();
    let start = Instant::now();

    let mut runner = TaskRunner::new(operations(), run.parallel).with_bootstrap(bootstrap);
    for job in jobs {
        runner
            .add_task(job.key, job.operation, job.args)
            .context("queue task")?;
    }
    let progress = progress_bar(runner.pending());

    runner
        .run(|key, result| {
            let suite = result.unwrap_or_else(|err| failure_suite(&key, err.to_string()));
            let count = suite.len();
            progress.inc(1);
            progress.suspend(|| reporter.emit(suite));
            summary.files.push((key, count));
            if run.quick && count > 0 {
                summary.stopped_early = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
        .context("run tasks")?;

    progress.finish_and_clear();
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        issues = summary.total(),
        "tasks finished"
    );
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {elapsed}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
