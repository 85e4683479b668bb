//! gridmax CLI
//!
//! Generates a random `nx` x `ny` grid of `(v1, v2)` samples into a scratch
//! file, then repeatedly loads, annotates, and scans it for the positions of
//! the largest `v1` and `v2`.
//!
//! # Output Format
//!
//! Per repetition, on stdout:
//! `Max v1: x=<x>, y=<y>, v1=<value>` and `Max v2: x=<x>, y=<y>, v2=<value>`
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! per-stage events.
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `1`: Generation, load, or output failure
//! - `2`: Invalid arguments or configuration error

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use gridmax::driver::run;
use gridmax::{RunConfig, ScanStrategy};
use tracing_subscriber::EnvFilter;

fn print_usage(exe: &std::ffi::OsStr) {
    eprintln!(
        "usage: {} [OPTIONS] <repetitions> <nx> <ny>

OPTIONS:
    --fused                 Scan v1 and v2 in one pass (default: two passes)
    --reuse                 Load once, repeat only the scan
    --seed=<N>              Fixed generator seed (default: from entropy)
    --file=<PATH>           Intermediate value file (default: values.txt)
    --keep                  Keep the value file after the run
    --config=<FILE>         Read settings from a JSON file; later flags override it
    --help, -h              Show this help message

Recommended starting point: 1 2000 3000",
        exe.to_string_lossy()
    );
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(RunConfig),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Command, String> {
    let mut config = RunConfig::default();
    let mut positional: Vec<u32> = Vec::new();
    let mut overrides: Vec<Box<dyn FnOnce(&mut RunConfig)>> = Vec::new();

    for arg in args {
        let Some(flag) = arg.to_str() else {
            return Err(format!(
                "argument is not valid UTF-8: {}",
                arg.to_string_lossy()
            ));
        };
        if let Some(value) = flag.strip_prefix("--seed=") {
            let seed: u64 = value
                .parse()
                .map_err(|_| format!("invalid --seed value: {value}"))?;
            overrides.push(Box::new(move |c| c.seed = Some(seed)));
            continue;
        }
        if let Some(value) = flag.strip_prefix("--file=") {
            let path = PathBuf::from(value);
            overrides.push(Box::new(move |c| c.data_path = path));
            continue;
        }
        if let Some(value) = flag.strip_prefix("--config=") {
            config = RunConfig::from_json_file(value.as_ref()).map_err(|err| err.to_string())?;
            continue;
        }
        match flag {
            "--fused" => overrides.push(Box::new(|c| c.strategy = ScanStrategy::Fused)),
            "--reuse" => overrides.push(Box::new(|c| c.reuse_grid = true)),
            "--keep" => overrides.push(Box::new(|c| c.keep_data = true)),
            "--help" | "-h" => return Ok(Command::Help),
            _ if flag.starts_with('-') => return Err(format!("unknown flag: {flag}")),
            _ => {
                let n: u32 = flag
                    .parse()
                    .map_err(|_| format!("expected an unsigned integer, got: {flag}"))?;
                positional.push(n);
            }
        }
    }

    match positional.as_slice() {
        [] => {}
        [repetitions, nx, ny] => {
            config.repetitions = *repetitions;
            config.nx = *nx;
            config.ny = *ny;
        }
        _ => return Err("expected <repetitions> <nx> <ny>".to_string()),
    }
    for apply in overrides {
        apply(&mut config);
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(Command::Run(config))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "gridmax".into());

    let config = match parse_args(args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_usage(&exe);
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            print_usage(&exe);
            return ExitCode::from(2);
        }
    };

    init_tracing();

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = run(&config, &mut out).and_then(|report| {
        out.flush().map_err(gridmax::driver::DriverError::Output)?;
        Ok(report)
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
