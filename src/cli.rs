//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Default API port when neither `--port` nor the config sets one.
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed CLI arguments.
#[derive(Debug, Default, PartialEq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub input: Option<PathBuf>,
    pub location: Option<String>,
    pub out: Option<PathBuf>,
    pub serve: bool,
    pub port: Option<u16>,
    pub store_root: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--input" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --input (expected a CSV file path)")?;
                opts.input = Some(PathBuf::from(path));
            }
            "--location" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --location (expected a name)")?;
                opts.location = Some(name.to_string());
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                opts.out = Some(PathBuf::from(path));
            }
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            "--store-root" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --store-root (expected a directory)")?;
                opts.store_root = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.input.is_none() && !opts.serve {
        return Err("nothing to do: pass --input <csv> and/or --serve".to_string());
    }
    if opts.out.is_some() && opts.input.is_none() {
        return Err("--out requires --input".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("dispatch-sim: battery dispatch simulator");
    eprintln!();
    eprintln!("Usage: dispatch-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (default, community)");
    eprintln!("  --seed <u64>             Seed the consumption draws");
    eprintln!("  --input <path>           Simulate one local production CSV");
    eprintln!("  --location <name>        Location label for --input (default: file stem)");
    eprintln!("  --out <path>             Write --input results to CSV");
    eprintln!("  --serve                  Start the HTTP API");
    eprintln!("  --port <u16>             API port (default: {DEFAULT_PORT})");
    eprintln!("  --store-root <dir>       Blob store root for --serve");
    eprintln!("  --help                   Show this help message");
}
