//! Counts the lines of the given files (or stdin) and reports, for every
//! distinct line, how often it occurred and in which files.
//!
//! Run with:
//! ```bash
//! cargo run --features cli -- --min-count 2 a.txt b.txt
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use freqtag::ingest::{count_lines, count_sources, IngestConfig, IngestError, STDIN_SOURCE};
use freqtag::observers::json::JsonObserver;
use freqtag::observers::table::{TableObserver, TableStyle};
use freqtag::observers::text::TextObserver;
use freqtag::observers::{RecordOrder, Selection};
use freqtag::store::locked::TaggedCounterStore;
use freqtag::store::sharded::ShardedTaggedCounterStore;
use freqtag::store::TagCounter;
use tracing_subscriber::EnvFilter;

/// Output format for the report.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One `line count [files]` per line
    Text,
    /// Pretty ASCII table
    Table,
    /// JSON format
    Json,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Dots,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Dots => TableStyle::Dots,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Record order selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OrderChoice {
    /// Ascending by line
    #[default]
    Key,
    /// Most frequent first
    Count,
    /// Unspecified order
    None,
}

impl From<OrderChoice> for RecordOrder {
    fn from(choice: OrderChoice) -> Self {
        match choice {
            OrderChoice::Key => RecordOrder::Key,
            OrderChoice::Count => RecordOrder::CountDesc,
            OrderChoice::None => RecordOrder::Unordered,
        }
    }
}

/// Count duplicated lines across files, tracking which files contain them.
///
/// Reads standard input when no file is given. Files that cannot be read are
/// reported and skipped.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Table style (for the table format)
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Hide the table header
    #[arg(long)]
    no_header: bool,

    /// Add a title to the table
    #[arg(long)]
    title: Option<String>,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Wrap JSON output in a timestamped snapshot
    #[arg(long)]
    timestamp: bool,

    /// Record order
    #[arg(short, long, value_enum, default_value = "key")]
    order: OrderChoice,

    /// Only report lines seen at least this many times
    #[arg(short = 'm', long, default_value = "1")]
    min_count: u64,

    /// Maximum number of files read in parallel (defaults to the CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Use the sharded store (one lock per shard)
    #[arg(long)]
    sharded: bool,
}

/// Fills `counter` from the files, or from `stdin` when there are none.
///
/// Unreadable files are logged and skipped; only a failure to read stdin is
/// returned.
fn ingest(
    args: &Args,
    counter: &dyn TagCounter,
    stdin: impl BufRead,
) -> Result<(), IngestError> {
    if args.files.is_empty() {
        let lines = count_lines(stdin, STDIN_SOURCE, counter)?;
        tracing::debug!(lines, keys = counter.len(), "stdin counted");
        return Ok(());
    }

    let mut config = IngestConfig::new();
    if let Some(workers) = args.workers {
        config = config.workers(workers);
    }

    let summary = count_sources(&args.files, counter, &config);
    for failure in &summary.failures {
        tracing::error!("{}", failure);
    }
    tracing::info!(
        sources = summary.sources_read,
        failed = summary.failures.len(),
        lines = summary.lines,
        keys = counter.len(),
        "input counted"
    );
    Ok(())
}

/// Writes the report in the requested format to `out`.
fn report<W: Write>(
    args: &Args,
    counter: &dyn TagCounter,
    out: &mut W,
) -> freqtag::observers::Result<()> {
    let selection = Selection::new()
        .order(args.order.into())
        .min_count(args.min_count);

    match args.format {
        OutputFormat::Text => TextObserver::new()
            .with_selection(selection)
            .write_to(counter, &mut *out),

        OutputFormat::Table => {
            let mut observer = TableObserver::new()
                .with_style(args.style.into())
                .with_header(!args.no_header)
                .with_selection(selection);

            if let Some(ref title) = args.title {
                observer = observer.with_title(title.clone());
            }

            writeln!(out, "{}", observer.render(counter))?;
            out.flush()?;
            Ok(())
        }

        OutputFormat::Json => JsonObserver::new()
            .pretty(args.pretty)
            .wrap_in_snapshot(args.timestamp)
            .include_timestamp(args.timestamp)
            .with_selection(selection)
            .write_to(counter, &mut *out),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "freqtag=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let counter: Box<dyn TagCounter> = if args.sharded {
        Box::new(ShardedTaggedCounterStore::new())
    } else {
        Box::new(TaggedCounterStore::new())
    };

    if let Err(err) = ingest(&args, counter.as_ref(), io::stdin().lock()) {
        tracing::error!("{}", err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = report(&args, counter.as_ref(), &mut io::stdout().lock()) {
        tracing::error!("cannot write report: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
