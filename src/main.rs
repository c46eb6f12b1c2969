use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use energy_report::config::{parse_delimiter, ReportConfig};
use energy_report::ingestion::{
    ingest_many, CompositeObserver, FileObserver, HourlyFile, IngestionObserver, IngestionOptions, IngestionSeverity,
    Layout, TracingObserver,
};
use energy_report::inputs::resolve_inputs;
use energy_report::parse::{parse_fi_date, NumericPolicy};
use energy_report::processing::{
    aggregate_daily, group_by_week, summarize_month, summarize_range, summarize_week, summarize_year, PeriodSummary,
};
use energy_report::report::{to_json, OutputFormat, ReportFormatter};
use energy_report::types::HourlyRecord;

/// Environment variable holding the log filter (falls back to `RUST_LOG`).
const LOG_ENV: &str = "ENERGY_REPORT_LOG";

#[derive(Parser)]
#[command(name = "energy-report")]
#[command(author, version, about = "Daily kWh reports from hourly three-phase meter CSV files")]
#[command(
    long_about = "Reads hourly three-phase consumption/production meter exports (comma, semicolon or tab\n\
    separated, with or without header), sums them per day and prints a kWh report using\n\
    Finnish conventions (dd.mm.yyyy, decimal comma).\n\
    \nInputs may be files, directories (all .csv/.tsv/.txt files below them) or glob patterns.\n\
    \nExamples:\n  \
    energy-report weekly week41.csv week42.csv week43.csv -o summary.txt\n  \
    energy-report daily 'data/*.csv'\n  \
    energy-report range --from 13.10.2025 --to 19.10.2025 data/\n  \
    energy-report monthly --year 2025 --month 10 data/ --format json"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (default: $ENERGY_REPORT_CONFIG, then ./energy-report.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write the report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Field delimiter (single character or 'tab'); sniffed when omitted
    #[arg(long, global = true, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Column layout
    #[arg(long, global = true, value_enum)]
    layout: Option<Layout>,

    /// Replace invalid numeric fields with zero instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Do not echo the report to stdout when writing it to a file
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// One section per input file (ISO week of its first record), with overall totals
    Weekly(InputArgs),

    /// All inputs merged into one day table, split by ISO week
    Daily(InputArgs),

    /// Totals and days of an inclusive date range
    Range {
        /// First day, dd.mm.yyyy
        #[arg(long, value_parser = parse_fi_date)]
        from: NaiveDate,

        /// Last day, dd.mm.yyyy
        #[arg(long, value_parser = parse_fi_date)]
        to: NaiveDate,

        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Totals and days of a calendar month
    Monthly {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Totals and days of a calendar year
    Yearly {
        #[arg(long)]
        year: i32,

        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,
}

impl Command {
    fn inputs(&self) -> &[String] {
        match self {
            Self::Weekly(a) | Self::Daily(a) => &a.inputs,
            Self::Range { inputs, .. } | Self::Monthly { inputs, .. } | Self::Yearly { inputs, .. } => &inputs.inputs,
        }
    }

    /// Whether the report is a sequence of week sections.
    fn is_weekly(&self) -> bool {
        matches!(self, Self::Weekly(_) | Self::Daily(_))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ReportConfig::load(cli.global.config.as_deref()).context("loading configuration")?;
    let options = ingestion_options(&cli.global, &config)?;

    let paths = resolve_inputs(cli.command.inputs())?;
    tracing::info!(files = paths.len(), "reading input files");
    let files = ingest_many(&paths, &options)?;

    let periods = build_periods(&cli.command, &files)?;

    let format = cli.global.format.unwrap_or(config.report.format);
    let text = match format {
        OutputFormat::Json => to_json(&periods).context("serializing report")? + "\n",
        OutputFormat::Text => {
            let formatter = ReportFormatter::new(config.report.weekday_names.clone());
            match periods.as_slice() {
                [single] if !cli.command.is_weekly() => formatter.period(single).to_string(),
                _ => formatter.weekly(&periods).to_string(),
            }
        }
    };

    let output = cli.global.output.clone().or(config.report.output.clone());
    if let Some(path) = &output {
        fs::write(path, &text).with_context(|| format!("writing report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }
    if output.is_none() || !cli.global.quiet {
        io::stdout().lock().write_all(text.as_bytes())?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("energy_report=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Config values overridden by command-line flags.
fn ingestion_options(args: &GlobalArgs, config: &ReportConfig) -> Result<IngestionOptions> {
    let mut read = config.read_options()?;
    if args.delimiter.is_some() {
        read.delimiter = args.delimiter;
    }
    if let Some(layout) = args.layout {
        read.layout = layout;
    }
    if args.lenient {
        read.numeric_policy = NumericPolicy::Lenient;
    }

    let mut observers: Vec<Arc<dyn IngestionObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(log_file) = &config.ingestion.log_file {
        observers.push(Arc::new(FileObserver::new(log_file)));
    }

    Ok(IngestionOptions {
        read,
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        alert_at_or_above: IngestionSeverity::Critical,
    })
}

fn build_periods(command: &Command, files: &[HourlyFile]) -> Result<Vec<PeriodSummary>> {
    if let Command::Weekly(_) = command {
        let mut weeks = Vec::with_capacity(files.len());
        for file in files {
            match summarize_week(&file.records) {
                Some(week) => weeks.push(week),
                None => tracing::warn!(path = %file.path.display(), "no records, skipped"),
            }
        }
        return Ok(weeks);
    }

    let records: Vec<HourlyRecord> = files.iter().flat_map(|f| f.records.iter().copied()).collect();
    let days = aggregate_daily(&records);
    tracing::info!(records = records.len(), days = days.len(), "aggregated");

    Ok(match *command {
        Command::Weekly(_) | Command::Daily(_) => group_by_week(&days),
        Command::Range { from, to, .. } => vec![summarize_range(&days, from, to)],
        Command::Monthly { year, month, .. } => vec![
            summarize_month(&days, year, month).with_context(|| format!("invalid month {month}"))?,
        ],
        Command::Yearly { year, .. } => vec![summarize_year(&days, year)],
    })
}
