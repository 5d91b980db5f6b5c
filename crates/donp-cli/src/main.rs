use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use donp_core::{Protocol, RunReport, SimulatedTransport, load_schema_file};
use glob::glob;
use log::{LevelFilter, debug};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DONP_BUILD_COMMIT"),
    " ",
    env!("DONP_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  donp run modbus_rtu.json -o report.json\n  donp simulate modbus_ascii.json --stdout --pretty --iterations 3\n  donp frames modbus_rtu.json";

#[derive(Parser, Debug)]
#[command(name = "donp")]
#[command(version = VERSION)]
#[command(
    about = "Schema-driven protocol message encoder and transaction simulator.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run simulated transactions and write a versioned JSON report.
    #[command(alias = "simulate")]
    #[command(after_help = EXAMPLES)]
    Run {
        /// Path to a .json protocol schema
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Passes over every device and message
        #[arg(long, default_value_t = 10)]
        iterations: u32,

        /// Seed for synthesized payload bytes (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any transaction failed
        #[arg(long)]
        strict: bool,

        /// List failed transactions per message after the run
        #[arg(long)]
        list_failures: bool,
    },
    /// Print the transmit frame of every device message as hex.
    #[command(alias = "build")]
    Frames {
        /// Path to a .json protocol schema
        input: PathBuf,

        /// Seed for synthesized payload bytes (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            report,
            stdout,
            pretty,
            compact,
            iterations,
            seed,
            quiet,
            strict,
            list_failures,
        } => {
            init_logging(cli.verbose, quiet);
            cmd_run(RunArgs {
                input,
                report,
                stdout,
                pretty,
                compact,
                iterations,
                seed,
                quiet,
                strict,
                list_failures,
            })
        }
        Commands::Frames { input, seed } => {
            init_logging(cli.verbose, false);
            cmd_frames(&input, seed)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

struct RunArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    iterations: u32,
    seed: Option<u64>,
    quiet: bool,
    strict: bool,
    list_failures: bool,
}

fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report = if args.stdout {
        None
    } else {
        let report = args.report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&report, &input_abs)?;
        Some(report)
    };

    let mut protocol = load_protocol(&resolved_input, args.seed)?;
    let engine = protocol.engine();
    let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());
    let mut rep = protocol.run(&mut transport, args.iterations);
    rep.schema = Some(args.input.display().to_string());
    debug!(
        "Run finished: {} of {} transactions succeeded",
        rep.transactions_succeeded, rep.transactions_total
    );
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if args.list_failures && !args.quiet {
        print_failures(&rep);
    }
    if args.strict && rep.transactions_failed > 0 {
        return Err(CliError::new(
            format!(
                "transaction failures detected ({} of {})",
                rep.transactions_failed, rep.transactions_total
            ),
            Some("use --list-failures to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_frames(input: &Path, seed: Option<u64>) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;

    let mut protocol = load_protocol(&resolved_input, seed)?;
    protocol.freeze_transmit_frames();
    let engine = protocol.engine();
    for device in protocol.devices() {
        for message in device.messages() {
            let frame = if message.is_frozen() {
                engine
                    .transcoder()
                    .to_display_hex(message.raw_bytes(), engine.markers())
            } else {
                "(not built)".to_string()
            };
            println!("{}/{}: {}", device.name(), message.name(), frame);
        }
    }
    Ok(())
}

fn load_protocol(input: &Path, seed: Option<u64>) -> Result<Protocol, CliError> {
    let definition = load_schema_file(input).map_err(|err| {
        CliError::new(
            format!("invalid schema '{}': {}", input.display(), err),
            Some("expected a top-level \"protocol\" with \"prototype\" and \"device\" arrays".to_string()),
        )
    })?;
    Ok(Protocol::with_seed(definition, seed))
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    // A report in a directory that does not exist yet cannot be the input.
    if report_path
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty() && !parent.exists())
    {
        return Ok(());
    }
    let report_dir = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    if let Some(report_dir) = report_dir {
        let file_name = report_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
        if report_dir.join(file_name) == input_abs {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn serialize_report(rep: &RunReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let json = if pretty {
        serde_json::to_string_pretty(rep)
    } else {
        serde_json::to_string(rep)
    };
    Ok(json.context("JSON serialization failed")?)
}

fn print_failures(rep: &RunReport) {
    eprintln!("Transaction failures:");
    for summary in &rep.messages {
        for (outcome, count) in &summary.failures {
            eprintln!(
                "  {}/{} {} ({})",
                summary.device, summary.message, outcome, count
            );
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .json protocol schema".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .json protocol schema".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }
    let invalid = |detail: String| {
        CliError::new(
            format!("invalid input pattern '{pattern}'"),
            Some(format!("pattern error: {detail}")),
        )
    };

    let mut matches = Vec::new();
    for entry in glob(&pattern).map_err(|err| invalid(err.msg.to_string()))? {
        let path = entry.map_err(|err| invalid(err.to_string()))?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{pattern}'"),
            Some("check the path or quote the pattern; expected a .json schema".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed: Vec<String> = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect();
            if count > 3 {
                listed.push("...".to_string());
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{pattern}' ({count} matches): {}",
                    listed.join(", ")
                ),
                Some("pass a single schema file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
