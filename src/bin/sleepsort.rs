//! Command-line driver for the sleep sorter.
//!
//! ```bash
//! sleepsort 5 3 9 1
//! sleepsort --file numbers.txt --speed 2ms
//! sleepsort --random 64 --max 100 --seed 7 --search
//! ```

use clap::{ArgAction, Parser};
use sleepsort::input::{parse_values, read_values};
use sleepsort::time::{exponent_step, parse_duration};
use sleepsort::{ArraySource, BoundedRandomSource, SleepSorter, SorterConfig, TimeStepSearch};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sleepsort",
    version,
    about = "Sort integers by sleeping on them",
    long_about = "Spawns one thread per value, releases them together, and lets each\n\
        sleep for value × time step. Values are printed in the order they wake.\n\n\
        Input comes from VALUES, --file, --random, or standard input."
)]
struct Cli {
    /// Non-negative integers to sort
    values: Vec<u64>,

    /// Read whitespace-separated integers from a file
    #[arg(long, conflicts_with = "values")]
    file: Option<PathBuf>,

    /// Sort N generated values instead of reading input
    #[arg(long, value_name = "N", conflicts_with_all = ["values", "file"])]
    random: Option<usize>,

    /// Exclusive upper bound for generated values
    #[arg(
        long,
        value_name = "M",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max: u64,

    /// Seed for generated values (default: derived from the clock)
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Sleep per unit of value, e.g. "1ms" or "250us"
    #[arg(long, value_parser = parse_duration, conflicts_with = "speed_exp")]
    speed: Option<Duration>,

    /// Sleep per unit of value as a power of two in nanoseconds
    #[arg(long, value_name = "N")]
    speed_exp: Option<u32>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Double the time step until a run succeeds
    #[arg(long, action = ArgAction::SetTrue)]
    search: bool,

    /// Upper bound for --search
    #[arg(long, value_parser = parse_duration, default_value = "1s")]
    search_max: Duration,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "sleepsort=info",
        2 => "sleepsort=debug",
        _ => "sleepsort=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_thread_names(true)
        .init();
}

fn load_values(cli: &Cli) -> Result<Vec<u64>, String> {
    if let Some(size) = cli.random {
        let mut source = match cli.seed {
            Some(seed) => BoundedRandomSource::with_seed(size, cli.max, seed),
            None => BoundedRandomSource::from_time(size, cli.max),
        };
        if let Some(seed) = source.seed() {
            tracing::info!(seed, size, max = cli.max, "generated input");
        }
        return Ok(source.to_array_source().into_inner());
    }
    if let Some(path) = &cli.file {
        let file = File::open(path)
            .map_err(|e| format!("couldn't read input file {}: {e}", path.display()))?;
        return read_values(file)
            .map_err(|e| format!("couldn't parse input file {}: {e}", path.display()));
    }
    if !cli.values.is_empty() {
        return Ok(cli.values.clone());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err("no input: pass VALUES, --file, --random, or pipe numbers on stdin".into());
    }
    let mut text = String::new();
    io::Read::read_to_string(&mut stdin.lock(), &mut text)
        .map_err(|e| format!("couldn't read standard input: {e}"))?;
    parse_values(&text).map_err(|e| format!("couldn't parse standard input: {e}"))
}

fn build_config(cli: &Cli) -> Result<SorterConfig, String> {
    let mut config = sleepsort::config::load(cli.config.as_deref()).map_err(|e| {
        let mut msg = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            msg.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        msg
    })?;
    if let Some(step) = cli.speed {
        config.time_step = step;
    } else if let Some(exp) = cli.speed_exp {
        config.time_step = exponent_step(exp);
    }
    Ok(config)
}

fn print_values(values: &[u64]) -> Result<(), String> {
    let line = values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").map_err(|e| format!("couldn't write output: {e}"))
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = build_config(cli)?;
    let values = load_values(cli)?;

    if cli.search {
        let search = TimeStepSearch::new(config.time_step, cli.search_max).with_config(config);
        let outcome = search
            .find(|| ArraySource::new(values.clone()))
            .map_err(|e| e.to_string())?;
        eprintln!(
            "time step {:?} succeeded after {} attempts",
            outcome.time_step, outcome.attempts_run
        );
        return print_values(outcome.source.as_slice());
    }

    let mut sorter = SleepSorter::with_config(ArraySource::new(values), config);
    sorter.run().map_err(|e| e.to_string())?;
    print_values(sorter.source().as_slice())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}
