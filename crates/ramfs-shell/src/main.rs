//! ramfs-shell binary
//!
//! Drives named in-memory filesystems from a script or stdin.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive, on a fresh "scratch" namespace
//! ramfs-shell
//!
//! # Pre-register namespaces from RON and run a script
//! ramfs-shell --config namespaces.ron --namespace fixtures setup.txt
//! ```

mod session;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ramfs_core::{Registry, RegistryConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use session::{HELP, Session};

/// Command interpreter for in-memory filesystems.
#[derive(Parser, Debug)]
#[command(name = "ramfs-shell")]
#[command(about = "Command interpreter for named in-memory filesystems", after_help = HELP)]
struct Args {
    /// RON file listing namespaces to register at startup
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Namespace to start in (registered if missing)
    #[arg(short, long, default_value = "scratch")]
    namespace: String,

    /// Script to run instead of reading stdin
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            tracing::warn!(failed, "some commands failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run every command line, returning how many failed.
fn run(args: &Args) -> Result<usize> {
    let registry = match &args.config {
        Some(path) => {
            let config = RegistryConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            Registry::from_config(&config)?
        }
        None => Registry::new(),
    };
    let mut session = Session::new(registry, &args.namespace)?;
    tracing::info!(namespace = session.namespace(), "session started");

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut stdout = io::stdout().lock();
    let mut failed = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match session.execute(line) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(e) => {
                failed += 1;
                eprintln!("line {}: {e:#}", index + 1);
            }
        }
    }
    Ok(failed)
}
