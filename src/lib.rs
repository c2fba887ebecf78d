//! Periochart: periodontal chart series from radiograph annotations.
//!
//! Periochart reads the line-oriented annotation files produced when
//! outlining teeth, bone levels and cemento-enamel junctions on dental
//! radiographs, and turns them into arch-ordered, chart-ready series of
//! normalized bone levels, CEJ levels, tooth long-axis positions and
//! relative bone loss.
//!
//! # Modules
//!
//! - [`ir`]: Typed document model and readers (annotation files, status sheets)
//! - [`metrics`]: Normalization and chart-series derivation
//! - [`config`]: Metric configuration loaded from YAML
//! - [`session`]: Last-write-wins holder of the current document
//! - [`discover`]: Companion-file discovery next to a selected image
//! - [`validation`]: Document validation and issue reporting
//! - [`inspect`]: Per-document summary reports
//! - [`error`]: Error types for periochart operations

pub mod config;
pub mod discover;
pub mod error;
pub mod inspect;
pub mod ir;
pub mod metrics;
pub mod session;
pub mod validation;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use config::MetricsConfig;
use ir::Arch;
use metrics::{ChartSeries, SeriesKind, StatusCell};

pub use error::PeriochartError;

/// The periochart CLI application.
#[derive(Parser)]
#[command(name = "periochart")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG is respected otherwise).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse an annotation file and print the document as JSON.
    Parse(ParseArgs),
    /// Derive one chart series from an annotation file.
    Chart(ChartArgs),
    /// Summarize the contents of an annotation file.
    Inspect(InspectArgs),
    /// Validate an annotation file for errors and warnings.
    Validate(ValidateArgs),
    /// Print the arch-ordered tooth statuses from a status sheet.
    Status(StatusArgs),
    /// Find the annotation, status and image files for a selected file.
    Discover(DiscoverArgs),
}

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Series output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeriesFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArchArg {
    Maxillary,
    Mandibular,
}

impl From<ArchArg> for Arch {
    fn from(arch: ArchArg) -> Self {
        match arch {
            ArchArg::Maxillary => Arch::Maxillary,
            ArchArg::Mandibular => Arch::Mandibular,
        }
    }
}

/// The chart families that can be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    /// Normalized bone-level distances.
    Bone,
    /// Normalized CEJ distances.
    Cej,
    /// Normalized long-axis position for one arch.
    Tla,
    /// Normalized long-axis position for both arches (ignores --arch).
    TlaFull,
    /// Relative bone loss in percent.
    Rbl,
    /// Bone-level y mapped into the tooth outline span.
    RelativeBone,
    /// CEJ y mapped into the tooth outline span.
    RelativeCej,
}

impl ChartKind {
    fn uses_tla_normalization(self) -> bool {
        matches!(self, ChartKind::Tla | ChartKind::TlaFull)
    }

    /// Percent-loss and outline-relative charts are never normalized.
    fn is_normalized(self) -> bool {
        !matches!(
            self,
            ChartKind::Rbl | ChartKind::RelativeBone | ChartKind::RelativeCej
        )
    }
}

/// Arguments for the parse subcommand.
#[derive(clap::Args)]
struct ParseArgs {
    /// Annotation file to parse.
    input: PathBuf,

    /// Write the document JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Normalization overrides shared by chart-producing commands.
#[derive(clap::Args)]
struct MetricsArgs {
    /// YAML file with normalization parameters.
    #[arg(long, env = "PERIOCHART_CONFIG")]
    config: Option<PathBuf>,

    /// Override the scale factor of the normalization this chart uses
    /// (bone, cej, tla and tla-full only).
    #[arg(long)]
    scale: Option<f64>,

    /// Override the clamp threshold of the normalization this chart uses
    /// (bone, cej, tla and tla-full only).
    #[arg(long)]
    threshold: Option<f64>,
}

/// Arguments for the chart subcommand.
#[derive(clap::Args)]
struct ChartArgs {
    /// Annotation file to chart.
    input: PathBuf,

    /// Arch to chart.
    #[arg(long, value_enum, default_value = "maxillary")]
    arch: ArchArg,

    /// Series to derive.
    #[arg(long, value_enum, default_value = "bone")]
    kind: ChartKind,

    /// Output format for the series.
    #[arg(long, value_enum, default_value = "text")]
    output: SeriesFormat,

    #[command(flatten)]
    metrics: MetricsArgs,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Annotation file to inspect.
    input: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Annotation file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the status subcommand.
#[derive(clap::Args)]
struct StatusArgs {
    /// Tooth status sheet (JSON).
    input: PathBuf,

    /// Output format for the rows.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the discover subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Folder to search.
    dir: PathBuf,

    /// The selected file whose stem companions must contain.
    selected: PathBuf,

    /// Output format for the result.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Run the periochart CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PeriochartError> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Some(Commands::Parse(args)) => run_parse(args),
        Some(Commands::Chart(args)) => run_chart(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Status(args)) => run_status(args),
        Some(Commands::Discover(args)) => run_discover(args),
        None => {
            println!("periochart {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Periodontal chart series from radiograph annotations.");
            println!();
            println!("Run 'periochart --help' for usage information.");
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn load_document(path: &Path) -> Result<ir::ParsedDocument, PeriochartError> {
    let mut session = session::AnalysisSession::new();
    session.load(path).cloned()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PeriochartError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the parse subcommand.
fn run_parse(args: ParseArgs) -> Result<(), PeriochartError> {
    let doc = load_document(&args.input)?;

    match args.output {
        Some(path) => {
            ir::io_json::write_document_json(&path, &doc)?;
            log::info!("wrote document JSON to {}", path.display());
        }
        None => println!("{}", ir::io_json::to_json_string(&doc)?),
    }
    Ok(())
}

/// Builds the metric configuration for one chart: file, then flags.
fn metrics_config(args: &MetricsArgs, kind: ChartKind) -> Result<MetricsConfig, PeriochartError> {
    let mut config = match &args.config {
        Some(path) => MetricsConfig::from_file(path)?,
        None => MetricsConfig::default(),
    };

    if !kind.is_normalized() && (args.scale.is_some() || args.threshold.is_some()) {
        return Err(PeriochartError::InvalidConfig(format!(
            "--scale and --threshold do not apply to {kind:?} charts"
        )));
    }

    let target = if kind.uses_tla_normalization() {
        &mut config.tla
    } else {
        &mut config.distance
    };
    if let Some(scale) = args.scale {
        target.scale_factor = scale;
    }
    if let Some(threshold) = args.threshold {
        target.threshold = threshold;
    }

    config.check()?;
    Ok(config)
}

/// Chart series plus its suggested value-axis ceiling.
#[derive(Serialize)]
struct ChartOutput<'a> {
    #[serde(flatten)]
    series: &'a ChartSeries,
    axis_max: Option<f64>,
}

#[derive(Serialize)]
struct SeriesRow<'a> {
    label: &'a str,
    value: Option<f64>,
}

/// Execute the chart subcommand.
fn run_chart(args: ChartArgs) -> Result<(), PeriochartError> {
    let config = metrics_config(&args.metrics, args.kind)?;
    let doc = load_document(&args.input)?;
    let arch = Arch::from(args.arch);

    let series = match args.kind {
        ChartKind::Bone => metrics::build_arch_series(&doc, arch, SeriesKind::Bone, &config),
        ChartKind::Cej => metrics::build_arch_series(&doc, arch, SeriesKind::Cej, &config),
        ChartKind::Tla => metrics::build_arch_series(&doc, arch, SeriesKind::Tla, &config),
        ChartKind::TlaFull => metrics::build_tla_series(&doc, &config),
        ChartKind::Rbl => metrics::build_rbl_series(&doc, arch),
        ChartKind::RelativeBone => metrics::build_relative_series(&doc, arch, SeriesKind::Bone),
        ChartKind::RelativeCej => metrics::build_relative_series(&doc, arch, SeriesKind::Cej),
    };
    let axis_max = metrics::axis_max(&series.values);
    log::info!(
        "{}: {} of {} slots populated",
        series.name,
        series.present_count(),
        series.values.len()
    );

    match args.output {
        SeriesFormat::Text => {
            print!("{}", series);
            if let Some(max) = axis_max {
                println!("axis max: {:.1}", max);
            }
        }
        SeriesFormat::Json => print_json(&ChartOutput {
            series: &series,
            axis_max,
        })?,
        SeriesFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            for (label, value) in series.iter() {
                writer.serialize(SeriesRow { label, value })?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), PeriochartError> {
    let doc = load_document(&args.input)?;
    let report = inspect::inspect_document(&doc, &inspect::InspectOptions::default());

    match args.output {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => print_json(&report)?,
    }
    Ok(())
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), PeriochartError> {
    let doc = load_document(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_document(&doc, &opts);

    match args.output {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => print_json(&ValidationOutput {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            issues: &report.issues,
        })?,
    }

    // Determine exit status
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(PeriochartError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusOutput {
    maxillary: Vec<StatusCell>,
    mandibular: Vec<StatusCell>,
}

/// Execute the status subcommand.
fn run_status(args: StatusArgs) -> Result<(), PeriochartError> {
    let statuses = ir::io_tooth_status::read_tooth_status(&args.input)?;
    let output = StatusOutput {
        maxillary: metrics::build_status_row(&statuses, Arch::Maxillary),
        mandibular: metrics::build_status_row(&statuses, Arch::Mandibular),
    };

    match args.output {
        ReportFormat::Text => {
            let mut stdout = io::stdout().lock();
            for (arch, row) in [
                (Arch::Maxillary, &output.maxillary),
                (Arch::Mandibular, &output.mandibular),
            ] {
                writeln!(stdout, "{}:", arch)?;
                for cell in row {
                    let status = cell.status.map_or("-", |s| s.as_str());
                    writeln!(stdout, "  {:<4} {}", cell.tooth.to_string(), status)?;
                }
            }
        }
        ReportFormat::Json => print_json(&output)?,
    }
    Ok(())
}

/// Execute the discover subcommand.
fn run_discover(args: DiscoverArgs) -> Result<(), PeriochartError> {
    let companions = discover::discover_companions(&args.dir, &args.selected)?;

    match args.output {
        ReportFormat::Text => {
            let show = |path: &Option<PathBuf>| {
                path.as_ref()
                    .map_or_else(|| "(not found)".to_string(), |p| p.display().to_string())
            };
            println!("stem: {}", companions.stem);
            println!("ini:  {}", show(&companions.ini));
            println!("json: {}", show(&companions.json));
            println!("dcm:  {}", show(&companions.dcm));
        }
        ReportFormat::Json => print_json(&companions)?,
    }

    companions.require_ini(&args.dir)?;
    Ok(())
}
