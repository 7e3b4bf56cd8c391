mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use config::{CliConfig, load_config};
use logging::init_logging;
use serde::Serialize;
use thiserror::Error;
use vbrief_core::{
    DumpOptions, VBriefDocument, VBriefError, ValidationReport, load_file, validate,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("vbrief error: {0}")]
    VBrief(#[from] VBriefError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "vbrief", version, about = "vBRIEF document tools")]
struct Cli {
    /// Config file (defaults to ./vbrief.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check documents for vBRIEF v0.5 conformance.
    Validate(ValidateArgs),
    /// Re-serialize a document through the document model.
    Fmt(FmtArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Documents to validate.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
    /// Print the reports as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct FmtArgs {
    /// Document to format.
    #[arg(value_name = "PATH")]
    path: PathBuf,
    /// Keep the source key order.
    #[arg(long, overrides_with = "no_preserve_format")]
    preserve_format: bool,
    /// Emit in model order even when the config asks to preserve it.
    #[arg(long, overrides_with = "preserve_format")]
    no_preserve_format: bool,
    /// Sort keys at every level.
    #[arg(long, overrides_with = "no_canonical")]
    canonical: bool,
    /// Do not sort keys.
    #[arg(long, overrides_with = "canonical")]
    no_canonical: bool,
    /// Refuse documents that fail validation.
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,
    /// Accept invalid documents even when the config is strict.
    #[arg(long, overrides_with = "strict")]
    no_strict: bool,
    /// Write the result to this path instead of stdout.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["write", "check"])]
    out: Option<PathBuf>,
    /// Rewrite the input file in place.
    #[arg(long, conflicts_with = "check")]
    write: bool,
    /// Exit with status 1 when the file is not already formatted.
    #[arg(long)]
    check: bool,
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    report: Option<&'a ValidationReport>,
}

/// Result of checking one path; load failures do not stop the run.
#[derive(Debug)]
struct ValidateOutcome {
    path: PathBuf,
    report: Result<ValidationReport, VBriefError>,
}

impl ValidateOutcome {
    fn is_valid(&self) -> bool {
        self.report.as_ref().is_ok_and(ValidationReport::is_valid)
    }
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.log_json {
        config.logging.json = true;
    }
    init_logging(&config.logging)?;

    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Fmt(args) => run_fmt(args, &config),
    }
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode, CliError> {
    let outcomes = validate_paths(&args.paths);
    let all_valid = outcomes.iter().all(ValidateOutcome::is_valid);

    if args.json {
        let rendered: Vec<_> = outcomes
            .iter()
            .map(|outcome| DocumentReport {
                path: outcome.path.display().to_string(),
                valid: outcome.is_valid(),
                error: outcome.report.as_ref().err().map(ToString::to_string),
                report: outcome.report.as_ref().ok(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for outcome in &outcomes {
            match &outcome.report {
                Ok(report) => print_report(&outcome.path, report),
                Err(err) => println!("{}: error {err}", outcome.path.display()),
            }
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn validate_paths(paths: &[PathBuf]) -> Vec<ValidateOutcome> {
    paths
        .iter()
        .map(|path| {
            let report = load_file(path, false).map(|document| validate(&document));
            match &report {
                Ok(report) => tracing::info!(
                    event = "document_validated",
                    path = %path.display(),
                    errors = report.errors.len(),
                    warnings = report.warnings.len()
                ),
                Err(err) => tracing::warn!(
                    event = "document_unreadable",
                    path = %path.display(),
                    error = %err
                ),
            }
            ValidateOutcome {
                path: path.clone(),
                report,
            }
        })
        .collect()
}

fn run_fmt(args: FmtArgs, config: &CliConfig) -> Result<ExitCode, CliError> {
    let options = args.dump_options(config);
    let strict = args.strict(config);

    let source = fs::read_to_string(&args.path)?;
    let document = VBriefDocument::from_json(&source, strict)?;
    let rendered = document.to_json(options)?;

    if args.check {
        let formatted = rendered == source;
        tracing::info!(event = "format_checked", path = %args.path.display(), formatted);
        if !formatted {
            eprintln!("{} is not formatted", args.path.display());
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let target = if args.write {
        Some(args.path.as_path())
    } else {
        args.out.as_deref()
    };
    match target {
        Some(path) => write_document(&document, path, options)?,
        None => print!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}

impl FmtArgs {
    fn dump_options(&self, config: &CliConfig) -> DumpOptions {
        DumpOptions {
            canonical: flag_or(self.canonical, self.no_canonical, config.format.canonical),
            preserve_format: flag_or(
                self.preserve_format,
                self.no_preserve_format,
                config.format.preserve_format,
            ),
        }
    }

    fn strict(&self, config: &CliConfig) -> bool {
        flag_or(self.strict, self.no_strict, config.validate.strict)
    }
}

/// Resolve an `--x`/`--no-x` pair against the configured value.
fn flag_or(on: bool, off: bool, configured: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        configured
    }
}

fn write_document(
    document: &VBriefDocument,
    path: &Path,
    options: DumpOptions,
) -> Result<(), CliError> {
    document.to_file(path, options)?;
    tracing::info!(event = "document_written", path = %path.display());
    Ok(())
}

fn print_report(path: &Path, report: &ValidationReport) {
    for issue in &report.errors {
        println!(
            "{}: error {} {}: {}",
            path.display(),
            issue.code(),
            issue.path(),
            issue.message()
        );
    }
    for issue in &report.warnings {
        println!(
            "{}: warning {} {}: {}",
            path.display(),
            issue.code(),
            issue.path(),
            issue.message()
        );
    }
    if report.is_valid() {
        println!("{}: ok", path.display());
    }
}
