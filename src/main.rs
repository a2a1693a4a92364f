//! Reanchor CLI
//!
//! Usage:
//!   reanchor [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!   -v, --verbose        Log constraint rewrites to stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reanchor::{run_with_config, RunError, SceneConfig};

#[derive(Parser)]
#[command(name = "reanchor")]
#[command(about = "Move subviews into wrapper views without breaking their constraints")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log constraint rewrites and anchor changes to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("reanchor=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match SceneConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match run_with_config(&source, &config) {
        Ok(output) => print!("{}", output),
        Err(RunError::Parse(errors)) => {
            for error in errors {
                eprint!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(RunError::Scene(error)) => {
            eprint!("{}", error.format(&source, &filename));
            std::process::exit(1);
        }
    }
}
