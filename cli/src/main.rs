use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pim_show_core::{CommandKind, Record};
use pim_show_parser::{
    BatchManifest, BatchOutcome, EngineConfig, Outcome, OutputFormat, ParseRun, ProcessSource,
    ScanReport, ShowParser, format_record, format_report, parse_batch,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "pim-show")]
#[command(about = "Parse PIM show-command output into structured records")]
#[command(version)]
struct Cli {
    /// YAML engine configuration (extra error banners, output source, jobs).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse captured output from a file.
    ParseFile(ParseFileArgs),
    /// Parse captured output from stdin.
    ParseStdin(ParseStdinArgs),
    /// Run a show command through an external program and parse its output.
    Exec(ExecArgs),
    /// Parse every job of a YAML batch manifest in parallel.
    Batch(BatchArgs),
    /// List supported command kinds and the command text they issue.
    Commands(CommandsArgs),
}

#[derive(Debug, Args)]
struct ParseOptions {
    /// Command kind (e.g. rp-mapping, bsr-router, ipv6-interface).
    #[arg(long)]
    kind: CommandKind,
    /// VRF the output was captured for (default: "default").
    #[arg(long)]
    vrf: Option<String>,
    /// Output both the record and the scan report.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    #[command(flatten)]
    options: ParseOptions,
    /// Path to file containing the raw output.
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    options: ParseOptions,
}

#[derive(Debug, Args)]
struct ExecArgs {
    #[command(flatten)]
    options: ParseOptions,
    /// Program that prints the output of the command given as its last
    /// argument (overrides `source` in --config).
    #[arg(long)]
    program: Option<String>,
    /// Argument passed to --program before the command; repeatable.
    #[arg(long = "arg", allow_hyphen_values = true)]
    args: Vec<String>,
    /// Timeout for the external program in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Path to the batch manifest YAML.
    #[arg(long)]
    manifest: PathBuf,
    /// Number of parallel jobs (default: config value or number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CommandsArgs {
    /// Show the VRF-scoped form of each command.
    #[arg(long)]
    vrf: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::ParseFile(args) => run_parse_file(args, &config),
        Command::ParseStdin(args) => run_parse_stdin(args, &config),
        Command::Exec(args) => run_exec(args, &config),
        Command::Batch(args) => run_batch(args, config),
        Command::Commands(args) => run_commands(args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    match path {
        Some(path) => EngineConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn build_parser(config: &EngineConfig) -> Result<ShowParser, String> {
    ShowParser::with_config(config).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// parse-file / parse-stdin / exec
// ---------------------------------------------------------------------------

fn run_parse_file(args: ParseFileArgs, config: &EngineConfig) -> Result<(), String> {
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let parser = build_parser(config)?;
    let options = &args.options;
    let run = parser.parse_text_with_report(options.kind, options.vrf.as_deref(), &raw);
    emit_run(run, options)
}

fn run_parse_stdin(args: ParseStdinArgs, config: &EngineConfig) -> Result<(), String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    let parser = build_parser(config)?;
    let options = &args.options;
    let run = parser.parse_text_with_report(options.kind, options.vrf.as_deref(), &raw);
    emit_run(run, options)
}

fn run_exec(args: ExecArgs, config: &EngineConfig) -> Result<(), String> {
    let mut source = match (&args.program, &config.source) {
        (Some(program), _) => ProcessSource::new(program).args(args.args.iter().cloned()),
        (None, Some(source)) => ProcessSource::from_config(source),
        (None, None) => {
            return Err(
                "No output source: pass --program or set `source` in --config".to_string(),
            );
        }
    };
    if let Some(timeout_ms) = args.timeout_ms {
        source = source.timeout(Duration::from_millis(timeout_ms));
    }

    let parser = build_parser(config)?;
    let options = &args.options;
    let run = parser.parse_with_report(options.kind, &source, options.vrf.as_deref());
    emit_run(run, options)
}

fn emit_run(run: ParseRun, options: &ParseOptions) -> Result<(), String> {
    let format = options.format;

    if !options.with_report {
        let record = run.result.map_err(|e| e.to_string())?;
        println!("{}", format_record(&record, format)?);
        return Ok(());
    }

    #[derive(Serialize)]
    struct ParseOutput<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<&'a Record>,
        report: &'a ScanReport,
    }

    let output = ParseOutput {
        record: run.result.as_ref().ok(),
        report: &run.report,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{yaml}");
        }
        OutputFormat::Table => {
            if let Some(record) = output.record {
                print!("{}", format_record(record, format)?);
                println!();
            }
            print!("{}", format_report(&run.report, format)?);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// batch
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BatchEntry<'a> {
    kind: CommandKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    vrf: Option<&'a str>,
    input: &'a Path,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a BatchOutcome> for BatchEntry<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        Self {
            kind: outcome.job.kind,
            vrf: outcome.job.vrf.as_deref(),
            input: &outcome.job.input,
            outcome: outcome.run.report.outcome,
            record: outcome.run.result.as_ref().ok(),
            error: outcome.run.result.as_ref().err().map(ToString::to_string),
        }
    }
}

fn run_batch(args: BatchArgs, mut config: EngineConfig) -> Result<(), String> {
    let manifest = BatchManifest::load(&args.manifest).map_err(|e| {
        format!(
            "Failed to load batch manifest '{}': {e}",
            args.manifest.display()
        )
    })?;
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }

    let outcomes = parse_batch(&manifest.jobs, &config).map_err(|e| e.to_string())?;
    let entries: Vec<BatchEntry<'_>> = outcomes.iter().map(BatchEntry::from).collect();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&entries)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{yaml}");
        }
        OutputFormat::Table => {
            for entry in &entries {
                println!(
                    "== {} ({}, vrf {}): {}",
                    entry.input.display(),
                    entry.kind,
                    entry.vrf.unwrap_or("default"),
                    entry.outcome
                );
                if let Some(record) = entry.record {
                    print!("{}", format_record(record, OutputFormat::Table)?);
                }
                if let Some(ref error) = entry.error {
                    println!("{error}");
                }
            }
        }
    }

    let parsed = entries
        .iter()
        .filter(|entry| entry.outcome == Outcome::Parsed)
        .count();
    let failed = entries
        .iter()
        .filter(|entry| matches!(entry.outcome, Outcome::MissingKey | Outcome::SourceFailed))
        .count();
    debug!(jobs = entries.len(), parsed, failed, "Batch finished");
    eprintln!("Parsed {parsed} of {} job(s).", entries.len());

    if failed > 0 {
        return Err(format!("{failed} job(s) failed"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// commands
// ---------------------------------------------------------------------------

fn run_commands(args: CommandsArgs) -> Result<(), String> {
    let width = CommandKind::ALL
        .iter()
        .map(|kind| kind.label().len())
        .max()
        .unwrap_or(0);
    for kind in CommandKind::ALL {
        println!(
            "{:<width$}  {}",
            kind.label(),
            kind.command(args.vrf.as_deref())
        );
    }
    Ok(())
}
