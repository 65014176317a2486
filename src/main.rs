//! fake-log-generator - emit synthetic log lines at a fixed rate.
//!
//! Lines go to stdout and/or a file; diagnostics go to stderr. Ctrl-C stops
//! the generator after the line in flight has been written.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::Level;

use fake_log_generator::core::config::{
    DEFAULT_LINES_PER_SECOND, DEFAULT_MAX_LOG_LENGTH, DEFAULT_MIN_LOG_LENGTH,
};
use fake_log_generator::prelude::*;

/// Fake log generator with format and output options.
#[derive(Parser, Debug)]
#[command(name = "fake-log-generator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Minimum log message length.
    #[arg(long = "min_log_length", visible_alias = "min-log-length", env = "FAKE_LOG_MIN_LENGTH", default_value_t = DEFAULT_MIN_LOG_LENGTH)]
    min_log_length: usize,

    /// Maximum log message length.
    #[arg(long = "max_log_length", visible_alias = "max-log-length", env = "FAKE_LOG_MAX_LENGTH", default_value_t = DEFAULT_MAX_LOG_LENGTH)]
    max_log_length: usize,

    /// Log lines per second.
    #[arg(long = "lines_per_second", visible_alias = "lines-per-second", env = "FAKE_LOG_LINES_PER_SECOND", default_value_t = DEFAULT_LINES_PER_SECOND)]
    lines_per_second: f64,

    /// Include the process id in trace ids (true, false, yes, no).
    #[arg(long, env = "FAKE_LOG_PID", default_value = "true", action = ArgAction::Set, value_parser = parse_flag)]
    pid: bool,

    /// Time zone for timestamps (local or UTC).
    #[arg(long = "time_zone", visible_alias = "time-zone", env = "FAKE_LOG_TIME_ZONE", default_value = "local")]
    time_zone: ZoneMode,

    /// Log format: logfmt, JSON, Apache common, Apache combined, Apache error,
    /// BSD syslog (rfc3164), Syslog (rfc5424). Unknown names produce JSON.
    #[arg(long = "log_format", visible_alias = "log-format", env = "FAKE_LOG_FORMAT", default_value = "JSON")]
    log_format: String,

    /// Output: stdout or file.
    #[arg(long, env = "FAKE_LOG_OUTPUT", default_value = "stdout")]
    output: String,

    /// File path for log output (implies file output).
    #[arg(long, env = "FAKE_LOG_FILE")]
    file: Option<PathBuf>,

    /// Number of concurrent producer threads sharing the rate.
    #[arg(long, env = "FAKE_LOG_PRODUCERS", default_value_t = 1)]
    producers: usize,

    /// Stop after this many lines.
    #[arg(long, env = "FAKE_LOG_COUNT")]
    count: Option<u64>,

    /// Increase diagnostic verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(format!("expected true, false, yes or no, got '{}'", value)),
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn build_generator(cli: &Cli) -> Result<Generator> {
    let format = match OutputFormat::recognize(&cli.log_format) {
        Some(format) => format,
        None => {
            tracing::info!(requested = %cli.log_format, "unrecognized log format, using json");
            OutputFormat::Json
        }
    };

    let config = GeneratorConfig::new()
        .with_length_range(cli.min_log_length, cli.max_log_length)
        .with_lines_per_second(cli.lines_per_second)
        .with_include_pid(cli.pid)
        .with_zone_mode(cli.time_zone)
        .with_format(format)
        .with_producers(cli.producers);

    let targets = OutputTargets::resolve(&cli.output, cli.file.clone())?;
    let mut builder = Generator::builder().config(config);
    if targets.stdout {
        builder = builder.appender(ConsoleAppender::new());
    }
    if let Some(path) = targets.file {
        tracing::debug!(path = %path.display(), "writing to file");
        builder = builder.appender(FileAppender::new(path)?);
    }
    builder.build()
}

/// Run the generator until it finishes or Ctrl-C arrives.
///
/// Returns `true` when stopped by an interrupt.
async fn generate(generator: Generator, limit: Option<u64>) -> Result<bool> {
    let shutdown = generator.shutdown_handle();
    let mut worker = tokio::task::spawn_blocking(move || generator.run(limit));

    let finished = tokio::select! {
        joined = &mut worker => Ok(joined),
        signal = tokio::signal::ctrl_c() => Err(signal),
    };

    let (joined, interrupted) = match finished {
        Ok(joined) => (joined, false),
        Err(Ok(())) => {
            shutdown.trigger();
            (worker.await, true)
        }
        Err(Err(e)) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            (worker.await, false)
        }
    };
    joined.map_err(|e| GeneratorError::other(format!("generator thread failed: {}", e)))??;
    Ok(interrupted)
}

fn run(cli: Cli) -> Result<()> {
    let generator = build_generator(&cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GeneratorError::io_operation("starting runtime", "cannot build runtime", e))?;

    if runtime.block_on(generate(generator, cli.count))? {
        println!("\nLog generation stopped.");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
