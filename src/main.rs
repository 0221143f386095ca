use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use sheet_unify::align::DuplicatePolicy;
use sheet_unify::inspect::{SheetSummary, inspect_sheets};
use sheet_unify::merge;
use sheet_unify::model::InputFile;
use sheet_unify::options::HeaderStyle;
use sheet_unify::{ExcelCodec, MergeError, MergeOptions, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbose).and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| MergeError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge(args) => execute_merge(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_merge(args: MergeArgs) -> Result<()> {
    let inputs = read_inputs(&args.inputs)?;
    let options = args.options();

    let merged = merge::merge_workbooks(&inputs, &ExcelCodec, &options)?;
    fs::write(&args.output, &merged.bytes)?;

    for warning in &merged.report.warnings {
        eprintln!("warning: {warning}");
    }
    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&merged.report)?)?;
    }

    println!(
        "merged {} rows from {} files into {}",
        merged.report.total_rows,
        merged.report.files.len(),
        args.output.display()
    );
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    let inputs = read_inputs(&args.inputs)?;
    let sheets = merge::decode_all(&inputs, &ExcelCodec)?;
    let summaries = inspect_sheets(&sheets, &MergeOptions::default());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            print_summary(summary);
        }
    }
    Ok(())
}

fn print_summary(summary: &SheetSummary) {
    println!("{} (sheet: {})", summary.file, summary.sheet_name);
    println!("  header row: {}", summary.header_row + 1);
    println!("  headers: {}", summary.headers.join(" | "));
    println!("  rows (header included): {}", summary.row_count);
}

/// Reads every input path, failing on the first one that does not exist.
fn read_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        return Err(MergeError::MissingInput(missing.clone()));
    }

    paths
        .iter()
        .map(|path| -> Result<InputFile> { Ok(InputFile::new(file_label(path), fs::read(path)?)) })
        .collect()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge spreadsheets whose headers drift in position, order, and spelling."
)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the first sheet of every input into a single workbook.
    Merge(MergeArgs),
    /// Show the header each input would contribute to a merge.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Input workbooks; the first one defines the reference columns.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output workbook path.
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the sheet in the output workbook.
    #[arg(long, default_value = sheet_unify::options::SHEET_LABEL)]
    sheet_name: String,

    /// Name of the appended provenance column.
    #[arg(long, default_value = sheet_unify::options::SOURCE_COLUMN)]
    source_column: String,

    /// Header text written to the output.
    #[arg(long, value_enum, default_value_t = HeaderStyleKind::Normalized)]
    header_style: HeaderStyleKind,

    /// Which column wins when a file repeats a header.
    #[arg(long, value_enum, default_value_t = DuplicateKind::Last)]
    duplicates: DuplicateKind,

    /// Reject files missing more than this share of the reference columns.
    #[arg(long, default_value_t = 0.5, value_parser = parse_ratio)]
    max_missing_ratio: f64,

    /// Write a JSON merge report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl MergeArgs {
    fn options(&self) -> MergeOptions {
        MergeOptions {
            max_missing_ratio: self.max_missing_ratio,
            duplicate_policy: self.duplicates.into(),
            header_style: self.header_style.into(),
            source_column: self.source_column.clone(),
            sheet_label: self.sheet_name.clone(),
            ..MergeOptions::default()
        }
    }
}

fn parse_ratio(value: &str) -> std::result::Result<f64, String> {
    let ratio: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("'{value}' is not between 0 and 1"))
    }
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Input workbooks.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Print the summaries as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeaderStyleKind {
    Normalized,
    Original,
}

impl From<HeaderStyleKind> for HeaderStyle {
    fn from(kind: HeaderStyleKind) -> Self {
        match kind {
            HeaderStyleKind::Normalized => HeaderStyle::Normalized,
            HeaderStyleKind::Original => HeaderStyle::Original,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DuplicateKind {
    First,
    Last,
}

impl From<DuplicateKind> for DuplicatePolicy {
    fn from(kind: DuplicateKind) -> Self {
        match kind {
            DuplicateKind::First => DuplicatePolicy::FirstWins,
            DuplicateKind::Last => DuplicatePolicy::LastWins,
        }
    }
}
