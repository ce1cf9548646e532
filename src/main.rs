use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pilotlog::config::Config;
use pilotlog::feeds::{self, CsvSource, FileSource, StdinSource};
use pilotlog::sample::{self, SampleSpec};
use pilotlog::{validate, DateRange, LogRecord, RatingFilter, Session};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pilotlog", about = "Text-to-SQL pilot log analytics")]
struct Cli {
    /// Verbose logs on stderr (RUST_LOG overrides the level).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/pilotlog/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a CSV upload and print every dashboard view as JSON.
    Report {
        /// CSV file, or `-` for stdin.
        input: String,
        /// Range start (YYYY-MM-DD). Defaults to the upload's first date.
        #[arg(long)]
        start: Option<String>,
        /// Range end (YYYY-MM-DD). Defaults to the upload's last date.
        #[arg(long)]
        end: Option<String>,
        /// Log table rating filter: ALL, 5, 4, 1-3 or NULL.
        #[arg(long, default_value = "ALL")]
        rating: RatingFilter,
        /// Number of log table pages to include.
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Drop rows with unparseable numbers instead of defaulting them.
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        pretty: bool,
    },
    /// Report rows the normalizer drops or patches, and records missing
    /// required fields. Exits non-zero when anything is found.
    Validate {
        /// CSV file, or `-` for stdin.
        input: String,
        #[arg(long)]
        strict: bool,
    },
    /// Write a synthetic pilot-period upload.
    Generate {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "2025-12-17")]
        start: NaiveDate,
        #[arg(long, default_value = "2025-12-24")]
        end: NaiveDate,
        #[arg(long, default_value_t = 15)]
        per_day: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    range: &'a DateRange,
    #[serde(flatten)]
    views: &'a pilotlog::DashboardViews,
    logs: Vec<&'a LogRecord>,
    issues: &'a [pilotlog::RowIssue],
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config; using defaults");
            Config::defaults()
        }),
    };

    match cli.command {
        Command::Report { input, start, end, rating, pages, strict, pretty } => {
            config.ingest.strict_numbers |= strict;
            let mut session = Session::new(&config);
            let summary = load(&input, &mut session).await?;

            if start.is_some() || end.is_some() {
                let current = session.snapshot().range().clone();
                session.set_range(DateRange {
                    start: start.or(current.start),
                    end: end.or(current.end),
                });
            }
            session.set_rating(rating);
            for _ in 1..pages {
                session.load_more();
            }

            let snapshot = session.snapshot();
            let report = Report {
                range: snapshot.range(),
                views: snapshot.views(),
                logs: snapshot.visible_logs(),
                issues: &summary.issues,
            };
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        Command::Validate { input, strict } => {
            config.ingest.strict_numbers |= strict;
            let text = read(&input).await?;
            let report = validate::validate(&text, config.ingest.numeric_policy());
            print!("{report}");
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Generate { out, start, end, per_day, seed } => {
            anyhow::ensure!(start <= end, "--start {start} is after --end {end}");
            let text = sample::generate(&SampleSpec { start, end, per_day, seed });
            match out {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("wrote {} records to {}", text.lines().count() - 1, path.display());
                }
                None => println!("{text}"),
            }
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

async fn load(input: &str, session: &mut Session) -> anyhow::Result<pilotlog::UploadSummary> {
    let summary = if input == "-" {
        feeds::upload(&StdinSource, session).await
    } else {
        feeds::upload(&FileSource::new(input), session).await
    };
    summary.with_context(|| format!("loading {input}"))
}

async fn read(input: &str) -> anyhow::Result<String> {
    let text = if input == "-" {
        StdinSource.read_text().await
    } else {
        FileSource::new(input).read_text().await
    };
    Ok(text?)
}
