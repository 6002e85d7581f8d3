#![warn(missing_docs)]
//! memband CLI Library
//!
//! Parses the command line, layers it over `memband.toml`, validates the
//! run, commits the buffers and drives the run controller.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = memband_cli::run() {
//!         eprintln!("Error: {e:#}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod executor;
mod signal;

pub use config::*;
pub use executor::{Executor, RunOutcome, build_report, build_report_meta};
pub use signal::install_interrupt_handler;

use clap::{CommandFactory, Parser};
use memband_core::{BenchContext, CancelToken, ELEMENT_BYTES, RunConfig, Selection, registry};
use memband_report::{OutputFormat, generate_csv_report, generate_json_report};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// memband CLI arguments
#[derive(Parser, Debug)]
#[command(name = "memband")]
#[command(version, about = "memband - memory copy and fill bandwidth benchmark")]
#[command(disable_help_flag = true, allow_negative_numbers = true)]
#[command(after_help = "'Bandwidth' is the amount of data copied over the time the operation took.\n\
The default is to run all tests available (uses two arrays, watch out for swapping).")]
pub struct Cli {
    /// Array size in MiB
    #[arg(value_name = "ARRAY_SIZE_MIB")]
    pub array_size: Option<u64>,

    /// Number of runs per test (0 to run until interrupted)
    #[arg(short = 'n', value_name = "COUNT")]
    pub runs: Option<u64>,

    /// Don't display average
    #[arg(short = 'a')]
    pub no_average: bool,

    /// Block size in bytes for the batched (-c) and 2-pass tests
    #[arg(short = 'b', value_name = "BYTES")]
    pub block_size: Option<u64>,

    /// Run only the test with this index (see --list); negative runs all
    #[arg(short = 't', value_name = "INDEX")]
    pub test: Option<i64>,

    /// Batched mode: copy block by block with the library copy, whatever the test
    #[arg(short = 'c')]
    pub cached: bool,

    /// Quiet (print statistics only)
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Print one line per timed run as well as the average
    #[arg(long)]
    pub show_runs: bool,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the available tests and exit
    #[arg(long)]
    pub list: bool,

    /// Print a default memband.toml and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print usage and exit with a non-zero status
    #[arg(short = 'h', long)]
    pub help: bool,
}

/// Run the memband CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if the configuration is
/// invalid, memory cannot be committed, or output cannot be written.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the memband CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.help {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    init_logging(cli.verbose);

    if cli.print_config {
        print!("{}", MembandConfig::default_toml());
        return Ok(());
    }
    if cli.list {
        list_kernels();
        return Ok(());
    }

    let file_config = MembandConfig::discover().unwrap_or_default();
    run_benchmarks(&cli, &file_config)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "memband=debug" } else { "memband=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_kernels() {
    println!("memband tests:");
    for (index, def) in registry().iter().enumerate() {
        let staging = if def.needs_staging { "  [2-pass]" } else { "" };
        println!("  {:>2}  {}{}", index, def.name, staging);
    }
    println!("{} tests available.", registry().len());
}

/// Build a RunConfig by layering: built-in defaults → memband.toml → CLI flags.
pub fn build_run_config(cli: &Cli, config: &MembandConfig) -> anyhow::Result<RunConfig> {
    let array_mib = cli
        .array_size
        .ok_or_else(|| anyhow::anyhow!("no array size given!"))?;

    Ok(RunConfig {
        array_mib,
        block_bytes: cli.block_size.unwrap_or(config.run.block_size),
        repeat: cli.runs.unwrap_or(config.run.repeat),
        cached: cli.cached || config.run.cached,
        selection: Selection::from_index(cli.test),
        show_average: config.run.show_average && !cli.no_average,
        show_runs: cli.show_runs || config.run.show_runs,
    })
}

fn resolve_format(cli: &Cli, config: &MembandConfig) -> anyhow::Result<OutputFormat> {
    let raw = cli.format.as_deref().unwrap_or(&config.output.format);
    raw.parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!(e))
}

fn run_benchmarks(cli: &Cli, file_config: &MembandConfig) -> anyhow::Result<()> {
    let run_config = build_run_config(cli, file_config)?;
    let format = resolve_format(cli, file_config)?;
    let quiet = cli.quiet || file_config.run.quiet;

    // Reject before anything is allocated
    run_config.validate()?;

    if !quiet {
        let info = startup_lines(&run_config);
        for line in &info {
            if format == OutputFormat::Human {
                println!("{}", line);
            } else {
                eprintln!("{}", line);
            }
        }
    }

    let mut context = BenchContext::prepare(run_config.clone())?;

    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel);

    let output_path = cli
        .output
        .clone()
        .or_else(|| file_config.output.path.as_ref().map(PathBuf::from));
    let mut out: Box<dyn Write> = match &output_path {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let start_time = Instant::now();
    let executor = Executor::new(run_config.clone(), cancel);
    let outcome = if format == OutputFormat::Human {
        executor.execute(&mut context, &mut out)?
    } else {
        executor.execute(&mut context, &mut std::io::sink())?
    };
    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    match format {
        OutputFormat::Human => {}
        OutputFormat::Json => {
            let report = build_report(&outcome, &run_config, total_duration_ms);
            writeln!(out, "{}", generate_json_report(&report)?)?;
        }
        OutputFormat::Csv => {
            let report = build_report(&outcome, &run_config, total_duration_ms);
            write!(out, "{}", generate_csv_report(&report))?;
        }
    }
    out.flush()?;

    if let Some(path) = &output_path {
        if !quiet {
            eprintln!("Report written to: {}", path.display());
        }
    }
    if outcome.interrupted {
        eprintln!(
            "Interrupted after {} test(s); averages cover completed runs only",
            outcome.results.len()
        );
    }

    Ok(())
}

/// Informational lines printed before buffers are committed
fn startup_lines(config: &RunConfig) -> Vec<String> {
    let elements = config.array_elements();
    let runs = if config.repeat == 0 {
        "Running each test until interrupted.".to_string()
    } else {
        format!("Doing {} runs per test.", config.repeat)
    };
    vec![
        format!(
            "Elements are {} bytes wide. Allocating 2*{} elements = {} bytes of memory.",
            ELEMENT_BYTES,
            elements,
            2 * elements * ELEMENT_BYTES
        ),
        format!(
            "Using {} bytes as blocks for the batched and 2-pass tests.",
            config.block_bytes
        ),
        format!("Getting down to business... {}", runs),
    ]
}
