use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use finger_core::HashAlgorithm;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finger::{Config, Walker};

#[derive(Parser)]
#[command(name = "finger")]
#[command(version)]
#[command(about = "Fingerprint static assets by embedding a content hash in their file names")]
struct Cli {
    #[arg(help = "Files or directories to fingerprint")]
    sources: Vec<PathBuf>,
    #[arg(short, long, help = "Fingerprint directories recursively")]
    recursive: bool,
    #[arg(long, overrides_with = "recursive", help = "Top level only, even if the config recurses")]
    no_recursive: bool,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        help = "Output directory [default: alongside each source]"
    )]
    output: Option<PathBuf>,
    #[arg(short, long, help = "Hash algorithm: md5 or blake3 [default: md5]")]
    algorithm: Option<HashAlgorithm>,
    #[arg(short, long, help = "Fingerprint length in hex characters [default: 10]")]
    length: Option<usize>,
    #[arg(short = 'j', long, help = "Hash and write each directory's files in parallel")]
    parallel: bool,
    #[arg(long, overrides_with = "parallel", help = "Write files one at a time, even if the config says parallel")]
    no_parallel: bool,
    #[arg(short, long, env = "FINGER_CONFIG", help = "JSON config file [default: ./finger.json]")]
    config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, help = "More logging (-v info, -vv debug)")]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.sources.is_empty() {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("finger: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = Config::load_or_default(cli.config.as_deref(), &cwd)?;
    apply_overrides(&mut config, &cli);

    let compiler = config.compiler()?;
    let destination = config.destination();
    let walker = Walker::new(&compiler, config.recursive);

    let mut total = 0;
    for source in &cli.sources {
        total += walker.compile_source(source, &destination)?.len();
    }

    info!(
        files = total,
        algorithm = %config.algorithm,
        length = config.length,
        "fingerprinting complete"
    );
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(recursive) = flag_override(cli.recursive, cli.no_recursive) {
        config.recursive = recursive;
    }
    if let Some(parallel) = flag_override(cli.parallel, cli.no_parallel) {
        config.parallel = parallel;
    }
    if let Some(output) = &cli.output {
        config.dest_dir = Some(output.clone());
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(length) = cli.length {
        config.length = length;
    }
}

/// `--flag` / `--no-flag` pair; `None` leaves the config value alone.
fn flag_override(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
